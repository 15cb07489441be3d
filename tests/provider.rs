//! End-to-end flows through the public provider surface: validate,
//! configure, and derive the token resource, the way a plugin host would.

use azidentity_provider::{AzIdentityProvider, DEFAULT_CREDENTIAL_TYPES, Env, TokenEphemeralResource};
use plugin::{EphemeralResource, Provider, Value};

fn client_secret_block() -> Value {
    Value::object([
        ("tenant_id", Value::string("72f988bf-86f1-41af-91ab-2d7cd011db47")),
        ("client_id", Value::string("client-1")),
        ("client_secret", Value::string("secret-1")),
    ])
}

#[test]
fn explicit_chain_preserves_configured_order() {
    let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
    let config = Value::object([
        ("cloud", Value::string("AzurePublic")),
        (
            "credentials",
            Value::strings(["azure_cli_credential", "client_secret_credential"]),
        ),
        ("client_secret_credential", client_secret_block()),
    ]);

    let diagnostics = provider.validate(&config);
    assert!(!diagnostics.has_error(), "validation should pass: {diagnostics:?}");

    let (chain, diagnostics) = provider.configure(&config);
    assert!(!diagnostics.has_error(), "configure should pass: {diagnostics:?}");
    let chain = chain.expect("should build chain");
    let names: Vec<_> = chain.source_names().collect();
    assert_eq!(names, ["azure_cli_credential", "client_secret_credential"]);
}

#[test]
fn default_chain_when_credentials_unset() {
    let env = Env::from_slice(&[
        ("AZURE_TENANT_ID", "72f988bf-86f1-41af-91ab-2d7cd011db47"),
        ("AZURE_CLIENT_ID", "client-1"),
        ("AZURE_CLIENT_SECRET", "secret-1"),
    ]);
    let provider = AzIdentityProvider::with_env(env);
    let entries: [(&str, Value); 0] = [];
    let config = Value::object(entries);

    let (chain, diagnostics) = provider.configure(&config);
    assert!(!diagnostics.has_error(), "configure should pass: {diagnostics:?}");
    let chain = chain.expect("should build chain");

    let names: Vec<_> = chain.source_names().collect();
    assert!(names.contains(&"environment_credential"), "got {names:?}");
    assert!(names.contains(&"azure_cli_credential"), "got {names:?}");
    assert!(
        is_ordered_subsequence(&names, DEFAULT_CREDENTIAL_TYPES),
        "{names:?} should follow default order {DEFAULT_CREDENTIAL_TYPES:?}"
    );
}

#[test]
fn validation_rejects_credential_without_its_block() {
    let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
    let config = Value::object([(
        "credentials",
        Value::strings(["client_secret_credential"]),
    )]);

    let diagnostics = provider.validate(&config);
    assert!(diagnostics.has_error());
}

#[test]
fn validation_rejects_unknown_credential_type() {
    let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
    let config = Value::object([("credentials", Value::strings(["password_credential"]))]);

    let diagnostics = provider.validate(&config);
    assert!(diagnostics.has_error());
}

#[test]
fn unrecognized_cloud_warns_but_configures() {
    let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
    let config = Value::object([
        ("cloud", Value::string("AzureStack")),
        ("credentials", Value::strings(["azure_cli_credential"])),
    ]);

    let (chain, diagnostics) = provider.configure(&config);
    assert!(!diagnostics.has_error());
    assert!(diagnostics.warnings().any(|d| d.summary == "Invalid cloud value"));
    assert!(chain.is_some());
}

#[test]
fn token_resource_name_derives_from_provider() {
    let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
    let config = Value::object([("credentials", Value::strings(["azure_cli_credential"]))]);

    let (chain, _) = provider.configure(&config);
    let resource = TokenEphemeralResource::new(chain.expect("should build chain"));
    assert_eq!(resource.type_name(provider.type_name()), "azidentity_token");
}

fn is_ordered_subsequence(sub: &[&str], full: &[&str]) -> bool {
    let mut iter = full.iter();
    sub.iter().all(|name| iter.any(|candidate| candidate == name))
}
