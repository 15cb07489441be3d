use std::sync::Arc;

use async_trait::async_trait;
use azure_core::credentials::{TokenCredential, TokenRequestOptions};
use plugin::{
    Attribute, AttributePath, Diagnostic, EphemeralResource, OpenRequest, OpenResponse, Schema,
    Value,
};
use tracing::instrument;

use crate::chain::ChainedTokenCredential;

/// Ephemeral resource fetching an Entra ID access token for a set of scopes,
/// using the credential chain configured on the provider.
///
/// Stateless per open: every read is an independent token request delegated
/// to the SDK, which owns retry and caching behavior.
#[derive(Debug)]
pub struct TokenEphemeralResource {
    credential: Arc<ChainedTokenCredential>,
}

impl TokenEphemeralResource {
    #[must_use]
    pub fn new(credential: Arc<ChainedTokenCredential>) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl EphemeralResource for TokenEphemeralResource {
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_token")
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Fetches a Microsoft login access token for use with resources \
             supporting Entra ID authentication, for example databases.",
            [
                (
                    "claims",
                    Attribute::string().description(
                        "Additional claims required for the token, such as those returned in a \
                         claims challenge following an authorization failure.",
                    ),
                ),
                (
                    "enable_cae",
                    Attribute::bool().description(
                        "Request a token usable for Continuous Access Evaluation. Defaults to \
                         false.",
                    ),
                ),
                (
                    "scopes",
                    Attribute::string_set().required().description(
                        "Permission scopes for the token, for example \
                         `https://ossrdbms-aad.database.windows.net/.default`. Prefer separate \
                         tokens over multiple scopes.",
                    ),
                ),
                (
                    "token",
                    Attribute::string()
                        .computed()
                        .sensitive()
                        .description("The issued access token."),
                ),
            ],
        )
    }

    #[instrument(skip_all)]
    async fn open(&self, request: OpenRequest) -> OpenResponse {
        let config = &request.config;

        let diagnostics = self.schema().validate(config);
        if diagnostics.has_error() {
            return OpenResponse {
                result: Value::Null,
                diagnostics,
            };
        }

        let Some(scopes) = config.attr("scopes").string_items() else {
            return OpenResponse::error(Diagnostic::attribute_error(
                AttributePath::root("scopes"),
                "Invalid scopes value",
                "'scopes' must be a set of strings",
            ));
        };
        let claims = config.attr("claims").as_str().map(ToString::to_string);
        let enable_cae = config.attr("enable_cae").as_bool().unwrap_or_default();

        tracing::debug!(scopes = scopes.len(), enable_cae, "requesting token");

        let scope_refs: Vec<&str> = scopes.iter().map(AsRef::as_ref).collect();
        let options = TokenRequestOptions {
            claims: claims.as_deref(),
            enable_cae,
            ..Default::default()
        };

        match self.credential.get_token(&scope_refs, Some(options)).await {
            Ok(token) => {
                let mut result = config
                    .as_object()
                    .cloned()
                    .unwrap_or_default();
                result.insert("token".to_string(), Value::string(token.token.secret()));
                OpenResponse {
                    result: Value::Object(result),
                    diagnostics,
                }
            }
            Err(error) => {
                OpenResponse::error(Diagnostic::error("Unable to get token", error.to_string()))
            }
        }
    }
}
