use async_trait::async_trait;

use crate::{Diagnostic, Diagnostics, Schema, Value};

/// Implemented by a provider plugin.
///
/// The host drives the lifecycle: declare the schema, validate user
/// configuration against it, then configure once. Configuration produces the
/// provider's shared data — handed read-only to every resource the provider
/// exposes for the lifetime of the configured instance.
pub trait Provider: Send + Sync {
    /// Data shared with the provider's resources after configuration.
    type Data: Send + Sync;

    /// The provider type name; resource type names are derived from it.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Validates configuration before [`Provider::configure`] runs.
    fn validate(&self, config: &Value) -> Diagnostics {
        self.schema().validate(config)
    }

    /// Translates configuration into the provider's shared data.
    ///
    /// Returns `None` alongside at least one error diagnostic when
    /// configuration fails.
    fn configure(&self, config: &Value) -> (Option<Self::Data>, Diagnostics);
}

/// A host request to open an ephemeral resource.
pub struct OpenRequest {
    pub config: Value,
}

/// The outcome of one ephemeral open: a result value on success and any
/// diagnostics either way.
#[derive(Debug, Default)]
pub struct OpenResponse {
    pub result: Value,
    pub diagnostics: Diagnostics,
}

impl OpenResponse {
    /// A failed open carrying a single fatal diagnostic.
    #[must_use]
    pub fn error(diagnostic: Diagnostic) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(diagnostic);
        Self {
            result: Value::Null,
            diagnostics,
        }
    }
}

/// A plugin-defined object whose value is fetched fresh on each open and
/// never persisted in state.
#[async_trait]
pub trait EphemeralResource: Send + Sync {
    /// The resource type name, derived from the provider type name.
    fn type_name(&self, provider_type_name: &str) -> String;

    fn schema(&self) -> Schema;

    /// Fetches a fresh value. Stateless per invocation; the host may issue
    /// concurrent opens against the same resource.
    async fn open(&self, request: OpenRequest) -> OpenResponse;
}
