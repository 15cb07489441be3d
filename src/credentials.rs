//! Credential selection: maps requested credential-type names onto identity
//! SDK constructors and assembles the resulting chain.

use std::sync::Arc;

use azure_core::credentials::{Secret, TokenCredential};
use azure_identity::{
    AzurePipelinesCredential, ClientCertificateCredential, ClientSecretCredential,
    DeveloperToolsCredential, ManagedIdentityCredential, ManagedIdentityCredentialOptions,
    UserAssignedId, WorkloadIdentityCredential, WorkloadIdentityCredentialOptions,
};
use plugin::{AttributePath, Diagnostic, Diagnostics, Value};

use crate::chain::ChainedTokenCredential;
use crate::cloud::select_cloud;
use crate::env::Env;
use crate::models::{
    AzurePipelinesSettings, ClientCertificateSettings, ClientSecretSettings, EnvironmentSettings,
    ManagedIdentitySettings, WorkloadIdentitySettings,
};

/// Every credential type the provider recognizes.
pub const CREDENTIAL_TYPES: &[&str] = &[
    "environment_credential",
    "azure_pipelines_credential",
    "workload_identity_credential",
    "managed_identity_credential",
    "azure_cli_credential",
    "client_secret_credential",
    "client_certificate_credential",
];

/// Chain used when `credentials` is unset, mirroring the conventional default
/// Azure credential resolution order.
pub const DEFAULT_CREDENTIAL_TYPES: &[&str] = &[
    "environment_credential",
    "azure_pipelines_credential",
    "workload_identity_credential",
    "managed_identity_credential",
    "azure_cli_credential",
];

/// Builds the provider's credential chain from its configuration.
///
/// Chain construction failures and malformed certificate files are fatal;
/// individually unavailable credentials only warn and are excluded.
pub fn setup_credential_chain(
    config: &Value, env: &Env,
) -> (Option<Arc<ChainedTokenCredential>>, Diagnostics) {
    let mut diags = Diagnostics::new();

    let (cloud, warning) = select_cloud(config.attr("cloud").as_str().unwrap_or_default());
    if let Some(warning) = warning {
        diags.push(warning);
    }

    let requested = match config.attr("credentials") {
        value if !value.is_set() => {
            DEFAULT_CREDENTIAL_TYPES.iter().map(ToString::to_string).collect()
        }
        value => match value.string_items() {
            Some(items) => items,
            None => {
                diags.push(Diagnostic::attribute_error(
                    AttributePath::root("credentials"),
                    "Invalid credentials value",
                    "'credentials' must be a set of credential type names",
                ));
                return (None, diags);
            }
        },
    };

    let sources = select_credentials(&requested, config, env, &mut diags);
    if diags.has_error() {
        return (None, diags);
    }

    match ChainedTokenCredential::new(cloud, sources) {
        Ok(chain) => {
            tracing::info!(
                cloud = chain.cloud().name(),
                authority_host = chain.cloud().authority_host(),
                sources = chain.source_names().count(),
                "credential chain assembled"
            );
            (Some(Arc::new(chain)), diags)
        }
        Err(error) => {
            diags.push(Diagnostic::error("Failed setting up credential chain", error.to_string()));
            (None, diags)
        }
    }
}

/// Constructs a token source for each requested credential type, in user
/// order. A type that fails to construct is excluded with a warning so the
/// rest of the chain still stands.
fn select_credentials(
    requested: &[String], config: &Value, env: &Env, diags: &mut Diagnostics,
) -> Vec<(String, Arc<dyn TokenCredential>)> {
    let mut sources: Vec<(String, Arc<dyn TokenCredential>)> = Vec::with_capacity(requested.len());

    for (index, name) in requested.iter().enumerate() {
        let entry_path = AttributePath::root("credentials").index(index);
        let block_path = AttributePath::root(name.clone());
        let block = config.attr(name);

        let built = match name.as_str() {
            "environment_credential" => build_environment(env, &entry_path, diags),
            "azure_pipelines_credential" => {
                Some(build_azure_pipelines(block, env, &block_path, diags))
            }
            "workload_identity_credential" => {
                Some(build_workload_identity(block, env, &block_path, diags))
            }
            "managed_identity_credential" => {
                Some(build_managed_identity(block, env, &block_path, diags))
            }
            "azure_cli_credential" => Some(build_azure_cli()),
            "client_secret_credential" => build_client_secret(block, env, &block_path, diags),
            "client_certificate_credential" => {
                build_client_certificate(block, env, &block_path, diags)
            }
            other => {
                // normally pre-empted by schema validation
                diags.push(Diagnostic::attribute_error(
                    entry_path.clone(),
                    "Invalid credential type",
                    format!("unknown type '{other}'; check for a misspelled credential type"),
                ));
                None
            }
        };

        match built {
            Some(Ok(credential)) => {
                tracing::info!("appending credential: {name}");
                sources.push((name.clone(), credential));
            }
            Some(Err(error)) => {
                tracing::warn!("skipping credential {name}: {error}");
                diags.push(Diagnostic::attribute_warning(
                    entry_path,
                    format!("Error setting up credential '{name}'"),
                    error.to_string(),
                ));
            }
            None => {}
        }
    }

    sources
}

/// Service principal from `AZURE_TENANT_ID`/`AZURE_CLIENT_ID`/
/// `AZURE_CLIENT_SECRET`. The SDK has no environment credential of its own,
/// so one is composed here.
fn build_environment(
    env: &Env, entry_path: &AttributePath, diags: &mut Diagnostics,
) -> Option<azure_core::Result<Arc<dyn TokenCredential>>> {
    let settings = EnvironmentSettings::parse(env, entry_path, diags);
    if !settings.is_complete() {
        diags.push(Diagnostic::attribute_warning(
            entry_path.clone(),
            "Error setting up credential 'environment_credential'",
            "AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET must all be set",
        ));
        return None;
    }
    Some(client_secret_source(&settings.tenant_id, settings.client_id, settings.client_secret))
}

fn build_azure_pipelines(
    block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics,
) -> azure_core::Result<Arc<dyn TokenCredential>> {
    let settings = AzurePipelinesSettings::parse(block, env, path, diags);
    Ok(AzurePipelinesCredential::new(
        settings.tenant_id,
        settings.client_id,
        &settings.service_connection_id,
        Secret::new(settings.system_access_token),
        None,
    )?)
}

fn build_workload_identity(
    block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics,
) -> azure_core::Result<Arc<dyn TokenCredential>> {
    let settings = WorkloadIdentitySettings::parse(block, env, path, diags);
    // remaining detail (federated token file, defaults) resolved by the SDK
    let options = WorkloadIdentityCredentialOptions {
        tenant_id: none_if_empty(settings.tenant_id),
        client_id: none_if_empty(settings.client_id),
        ..Default::default()
    };
    Ok(WorkloadIdentityCredential::new(Some(options))?)
}

fn build_managed_identity(
    block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics,
) -> azure_core::Result<Arc<dyn TokenCredential>> {
    let settings = ManagedIdentitySettings::parse(block, env, path, diags);
    let options = ManagedIdentityCredentialOptions {
        user_assigned_id: none_if_empty(settings.client_id).map(UserAssignedId::ClientId),
        ..Default::default()
    };
    Ok(ManagedIdentityCredential::new(Some(options))?)
}

/// Developer-tools credential covering the Azure CLI and Azure Developer CLI.
fn build_azure_cli() -> azure_core::Result<Arc<dyn TokenCredential>> {
    Ok(DeveloperToolsCredential::new(None)?)
}

fn build_client_secret(
    block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics,
) -> Option<azure_core::Result<Arc<dyn TokenCredential>>> {
    if !block.is_set() {
        diags.push(missing_block(path, "client_secret_credential"));
        return None;
    }
    let settings = ClientSecretSettings::parse(block, env, path, diags);
    Some(client_secret_source(&settings.tenant_id, settings.client_id, settings.client_secret))
}

fn build_client_certificate(
    block: &Value, env: &Env, path: &AttributePath, diags: &mut Diagnostics,
) -> Option<azure_core::Result<Arc<dyn TokenCredential>>> {
    if !block.is_set() {
        diags.push(missing_block(path, "client_certificate_credential"));
        return None;
    }
    let settings = ClientCertificateSettings::parse(block, env, path, diags);

    let pem = match std::fs::read_to_string(&settings.certificate_path) {
        Ok(pem) => pem,
        Err(error) => {
            // a requested certificate that cannot be read is fatal
            diags.push(Diagnostic::attribute_error(
                path.clone().attribute("certificate_path"),
                "Failed to read certificate file",
                error.to_string(),
            ));
            return None;
        }
    };
    if !settings.certificate_password.is_empty() {
        diags.push(Diagnostic::attribute_warning(
            path.clone().attribute("certificate_password"),
            "Certificate password not supported",
            "the identity SDK expects a PEM bundle with an unencrypted key; the password is ignored",
        ));
    }

    Some(
        ClientCertificateCredential::new(
            settings.tenant_id,
            settings.client_id,
            Secret::new(pem),
            None,
        )
        .map(|credential| credential as Arc<dyn TokenCredential>),
    )
}

fn client_secret_source(
    tenant_id: &str, client_id: String, client_secret: String,
) -> azure_core::Result<Arc<dyn TokenCredential>> {
    Ok(ClientSecretCredential::new(
        tenant_id,
        client_id,
        Secret::new(client_secret),
        None,
    )?)
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn missing_block(path: &AttributePath, block: &str) -> Diagnostic {
    Diagnostic::attribute_warning(
        path.clone(),
        "Missing configuration",
        format!("missing {block} configuration; provide the necessary details or disable the credential"),
    )
}
