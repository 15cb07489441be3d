use std::collections::HashMap;
use std::sync::Arc;

use crate::{AttributePath, Diagnostic, Diagnostics, Value};

/// Context handed to a string validator.
pub struct ValidateRequest<'a> {
    /// The concrete string value under validation.
    pub value: &'a str,
    /// Path to the value, including any list index.
    pub path: AttributePath,
    /// The whole configuration, for cross-attribute checks.
    pub root: &'a Value,
}

/// Validates a single string attribute value (or set element) at schema
/// validation time, before the provider is configured.
pub trait StringValidator: Send + Sync {
    /// Plain-text description of the validator's behavior, suitable for a
    /// practitioner to understand its impact.
    fn description(&self) -> String;

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics);
}

/// Requires the value to be one of a fixed set of identifiers.
pub struct OneOf {
    allowed: &'static [&'static str],
}

impl OneOf {
    #[must_use]
    pub const fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }
}

impl StringValidator for OneOf {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.allowed.join(", "))
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        if !self.allowed.contains(&req.value) {
            diags.push(Diagnostic::attribute_error(
                req.path.clone(),
                "Invalid value",
                format!(
                    "unknown value '{}'; must be one of: {}",
                    req.value,
                    self.allowed.join(", ")
                ),
            ));
        }
    }
}

/// Requires a named top-level block to be present in the configuration.
///
/// Attached via [`ValueBased`] so a requested credential type can demand its
/// parameter block.
pub struct RequiresBlock {
    block: &'static str,
}

impl RequiresBlock {
    #[must_use]
    pub const fn new(block: &'static str) -> Self {
        Self { block }
    }
}

impl StringValidator for RequiresBlock {
    fn description(&self) -> String {
        format!("requires the '{}' block to be configured", self.block)
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        if req.root.attr(self.block).is_null() {
            diags.push(Diagnostic::attribute_error(
                req.path.clone(),
                "Missing configuration",
                format!(
                    "'{}' requires the '{}' block; provide it or remove the entry",
                    req.value, self.block
                ),
            ));
        }
    }
}

/// Dispatches to a validator selected by the value itself.
///
/// Values without a registered validator pass untouched, so this composes
/// with [`OneOf`] for closed identifier sets.
#[derive(Default)]
pub struct ValueBased {
    validators: HashMap<&'static str, Arc<dyn StringValidator>>,
}

impl ValueBased {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(mut self, value: &'static str, validator: impl StringValidator + 'static) -> Self {
        self.validators.insert(value, Arc::new(validator));
        self
    }
}

impl StringValidator for ValueBased {
    fn description(&self) -> String {
        "uses validators registered for specific values".to_string()
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        if let Some(validator) = self.validators.get(req.value) {
            validator.validate(req, diags);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(value: &'a str, root: &'a Value) -> ValidateRequest<'a> {
        ValidateRequest {
            value,
            path: AttributePath::root("credentials").index(0),
            root,
        }
    }

    fn empty_object() -> Value {
        Value::Object(std::collections::BTreeMap::new())
    }

    #[test]
    fn one_of_rejects_unknown_identifiers() {
        let validator = OneOf::new(&["azure_cli", "client_secret"]);
        let root = empty_object();

        let mut diags = Diagnostics::new();
        validator.validate(&request("azure_cli", &root), &mut diags);
        assert!(diags.is_empty());

        validator.validate(&request("azure_cil", &root), &mut diags);
        assert!(diags.has_error());
    }

    #[test]
    fn value_based_dispatches_on_value() {
        let validator =
            ValueBased::new().on("client_secret", RequiresBlock::new("client_secret_credential"));
        let root = empty_object();

        // no validator registered for this value
        let mut diags = Diagnostics::new();
        validator.validate(&request("azure_cli", &root), &mut diags);
        assert!(diags.is_empty());

        validator.validate(&request("client_secret", &root), &mut diags);
        assert!(diags.has_error());

        // block present: requirement satisfied
        let root = Value::object([("client_secret_credential", empty_object())]);
        let mut diags = Diagnostics::new();
        validator.validate(&request("client_secret", &root), &mut diags);
        assert!(diags.is_empty());
    }
}
