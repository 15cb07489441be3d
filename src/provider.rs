use std::sync::Arc;

use plugin::{
    Attribute, Diagnostics, OneOf, Provider, RequiresBlock, Schema, Value, ValueBased,
};
use tracing::instrument;

use crate::chain::ChainedTokenCredential;
use crate::credentials::{self, CREDENTIAL_TYPES};
use crate::env::Env;

/// Provider for authenticating with resources supporting Entra ID
/// authentication.
///
/// Configuration selects and orders credential sources; the single ephemeral
/// resource fetches tokens from the assembled chain.
#[derive(Clone, Debug, Default)]
pub struct AzIdentityProvider {
    env: Env,
}

impl AzIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self { env: Env::real() }
    }

    /// Provider reading a fixed environment, for tests.
    #[must_use]
    pub fn with_env(env: Env) -> Self {
        Self { env }
    }
}

impl Provider for AzIdentityProvider {
    type Data = Arc<ChainedTokenCredential>;

    fn type_name(&self) -> &'static str {
        "azidentity"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Authenticates against Entra ID and exposes ephemeral access tokens. \
             The main use is generating a token with workload federation in IaC \
             pipelines while falling back to azure_cli for local runs.",
            [
                (
                    "cloud",
                    Attribute::string().description(
                        "Cloud environment to target: AzurePublic (default), AzureGovernment or AzureChina.",
                    ),
                ),
                (
                    "credentials",
                    Attribute::string_set()
                        .description(
                            "Credential types to try, in the given order. Unset selects the \
                             default chain: environment_credential, azure_pipelines_credential, \
                             workload_identity_credential, managed_identity_credential, \
                             azure_cli_credential.",
                        )
                        .validator(OneOf::new(CREDENTIAL_TYPES))
                        .validator(
                            ValueBased::new()
                                .on(
                                    "client_secret_credential",
                                    RequiresBlock::new("client_secret_credential"),
                                )
                                .on(
                                    "client_certificate_credential",
                                    RequiresBlock::new("client_certificate_credential"),
                                ),
                        ),
                ),
                (
                    "azure_pipelines_credential",
                    Attribute::single_nested([
                        (
                            "tenant_id",
                            Attribute::string().description(
                                "Tenant override; falls back to ARM_TENANT_ID or AZURE_TENANT_ID.",
                            ),
                        ),
                        (
                            "client_id",
                            Attribute::string().description(
                                "Client override; falls back to ARM_CLIENT_ID or AZURE_CLIENT_ID.",
                            ),
                        ),
                        (
                            "service_connection_id",
                            Attribute::string().description(
                                "Service connection override; falls back to \
                                 ARM_OIDC_AZURE_SERVICE_CONNECTION_ID or \
                                 AZURESUBSCRIPTION_SERVICE_CONNECTION_ID.",
                            ),
                        ),
                        (
                            "system_access_token",
                            Attribute::string().sensitive().description(
                                "OIDC request token; falls back to ARM_OIDC_REQUEST_TOKEN or \
                                 SYSTEM_ACCESSTOKEN.",
                            ),
                        ),
                    ])
                    .description(
                        "Azure Pipelines workload federation. With the standard pipeline tasks \
                         no configuration is needed beyond the environment they provide.",
                    ),
                ),
                (
                    "workload_identity_credential",
                    Attribute::single_nested([
                        ("tenant_id", Attribute::string()),
                        ("client_id", Attribute::string()),
                    ])
                    .description(
                        "Workload identity; set tenant_id/client_id when a pod carries more \
                         than one identity.",
                    ),
                ),
                (
                    "managed_identity_credential",
                    Attribute::single_nested([(
                        "client_id",
                        Attribute::string()
                            .description("Client id of a user-assigned identity."),
                    )])
                    .description("Managed identity configuration."),
                ),
                (
                    "client_secret_credential",
                    Attribute::single_nested([
                        ("tenant_id", Attribute::string().required()),
                        ("client_id", Attribute::string().required()),
                        ("client_secret", Attribute::string().required().sensitive()),
                    ])
                    .description(
                        "Service principal with a client secret. All properties are required; \
                         environment_credential covers the env-variable variant.",
                    ),
                ),
                (
                    "client_certificate_credential",
                    Attribute::single_nested([
                        ("tenant_id", Attribute::string().required()),
                        ("client_id", Attribute::string().required()),
                        ("certificate_path", Attribute::string().required()),
                        (
                            "certificate_password",
                            Attribute::string().sensitive().description(
                                "Accepted for compatibility; the identity SDK expects an \
                                 unencrypted PEM bundle.",
                            ),
                        ),
                    ])
                    .description("Service principal with a client certificate."),
                ),
            ],
        )
    }

    #[instrument(skip_all)]
    fn configure(&self, config: &Value) -> (Option<Self::Data>, Diagnostics) {
        tracing::info!("configuring provider");

        let (chain, diags) = credentials::setup_credential_chain(config, &self.env);
        if diags.has_error() {
            return (None, diags);
        }
        (chain, diags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_validation_demands_block_for_requested_type() {
        let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
        let config = Value::object([("credentials", Value::strings(["client_secret_credential"]))]);

        let diags = provider.validate(&config);
        assert!(diags.has_error());
        let error = diags.errors().next().unwrap();
        assert_eq!(error.summary, "Missing configuration");
        assert_eq!(error.path.as_ref().unwrap().to_string(), "credentials[0]");
    }

    #[test]
    fn schema_validation_rejects_misspelled_credential_type() {
        let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
        let config = Value::object([("credentials", Value::strings(["azure_cil_credential"]))]);

        assert!(provider.validate(&config).has_error());
    }

    #[test]
    fn schema_validation_rejects_repeated_credential_types() {
        let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
        let config = Value::object([(
            "credentials",
            Value::strings(["azure_cli_credential", "azure_cli_credential"]),
        )]);

        let diags = provider.validate(&config);
        assert!(diags.has_error());
        let error = diags.errors().next().unwrap();
        assert_eq!(error.path.as_ref().unwrap().to_string(), "credentials[1]");
    }

    #[test]
    fn configure_produces_shared_chain() {
        let provider = AzIdentityProvider::with_env(Env::from_slice(&[]));
        let config = Value::object([
            ("credentials", Value::strings(["azure_cli_credential"])),
        ]);

        assert!(provider.validate(&config).is_empty());
        let (chain, diags) = provider.configure(&config);
        assert!(!diags.has_error());
        assert!(chain.is_some());
    }
}
