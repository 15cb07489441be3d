use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::{AttributePath, Diagnostic, Diagnostics, StringValidator, ValidateRequest, Value};

pub type Attributes = BTreeMap<&'static str, Attribute>;

/// The shape of a single schema attribute.
#[derive(Clone)]
pub enum AttributeType {
    String,
    Bool,
    /// A set of strings. Element order is preserved as supplied by the user.
    StringSet,
    /// A nested block of named attributes.
    SingleNested(Attributes),
}

/// Declares one attribute of a provider or resource schema.
#[derive(Clone)]
pub struct Attribute {
    pub kind: AttributeType,
    pub required: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub description: &'static str,
    pub validators: Vec<Arc<dyn StringValidator>>,
}

impl Attribute {
    #[must_use]
    pub fn string() -> Self {
        Self::new(AttributeType::String)
    }

    #[must_use]
    pub fn bool() -> Self {
        Self::new(AttributeType::Bool)
    }

    #[must_use]
    pub fn string_set() -> Self {
        Self::new(AttributeType::StringSet)
    }

    #[must_use]
    pub fn single_nested(attributes: impl IntoIterator<Item = (&'static str, Self)>) -> Self {
        Self::new(AttributeType::SingleNested(attributes.into_iter().collect()))
    }

    fn new(kind: AttributeType) -> Self {
        Self {
            kind,
            required: false,
            computed: false,
            sensitive: false,
            description: "",
            validators: Vec::new(),
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Attaches a validator run against the attribute's string value, or
    /// against each element for string sets.
    #[must_use]
    pub fn validator(mut self, validator: impl StringValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }
}

/// Static description of a configuration shape, declared once per provider or
/// resource and validated against host-supplied values before they are used.
pub struct Schema {
    pub description: &'static str,
    pub attributes: Attributes,
}

impl Schema {
    #[must_use]
    pub fn new(
        description: &'static str, attributes: impl IntoIterator<Item = (&'static str, Attribute)>,
    ) -> Self {
        Self {
            description,
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Validates a configuration value against this schema.
    ///
    /// Checks attribute presence and types, rejects attributes the schema does
    /// not declare, and runs any attached validators. Validators see the whole
    /// configuration so they can enforce cross-attribute requirements.
    #[must_use]
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();
        validate_object(&self.attributes, config, None, config, &mut diags);
        diags
    }
}

fn validate_object(
    attributes: &Attributes, value: &Value, prefix: Option<&AttributePath>, root: &Value,
    diags: &mut Diagnostics,
) {
    if let Value::Object(entries) = value {
        for name in entries.keys() {
            if !attributes.contains_key(name.as_str()) {
                diags.push(Diagnostic::attribute_error(
                    path_for(prefix, name),
                    "Unexpected attribute",
                    format!("'{name}' is not declared in the schema"),
                ));
            }
        }
    } else if value.is_set() {
        diags.push(Diagnostic::error(
            "Invalid configuration",
            "expected a block of named attributes",
        ));
        return;
    }

    for (name, attribute) in attributes {
        let path = path_for(prefix, name);
        validate_attribute(attribute, value.attr(name), &path, root, diags);
    }
}

fn validate_attribute(
    attribute: &Attribute, value: &Value, path: &AttributePath, root: &Value,
    diags: &mut Diagnostics,
) {
    if value.is_null() {
        if attribute.required && !attribute.computed {
            diags.push(Diagnostic::attribute_error(
                path.clone(),
                "Missing required attribute",
                format!("'{path}' must be set"),
            ));
        }
        return;
    }
    if value.is_unknown() {
        return;
    }

    match &attribute.kind {
        AttributeType::String => match value.as_str() {
            Some(s) => run_validators(attribute, s, path, root, diags),
            None => diags.push(type_mismatch(path, "a string")),
        },
        AttributeType::Bool => {
            if value.as_bool().is_none() {
                diags.push(type_mismatch(path, "a bool"));
            }
        }
        AttributeType::StringSet => match value.as_list() {
            Some(items) => {
                let mut seen = BTreeSet::new();
                for (i, item) in items.iter().enumerate() {
                    let element_path = path.clone().index(i);
                    match item.as_str() {
                        Some(s) if !seen.insert(s) => {
                            diags.push(Diagnostic::attribute_error(
                                element_path,
                                "Duplicate value",
                                format!("'{s}' appears more than once in '{path}'"),
                            ));
                        }
                        Some(s) => run_validators(attribute, s, &element_path, root, diags),
                        None => diags.push(type_mismatch(&element_path, "a string")),
                    }
                }
            }
            None => diags.push(type_mismatch(path, "a set of strings")),
        },
        AttributeType::SingleNested(nested) => {
            if value.as_object().is_some() {
                validate_object(nested, value, Some(path), root, diags);
            } else {
                diags.push(type_mismatch(path, "a block"));
            }
        }
    }
}

fn run_validators(
    attribute: &Attribute, value: &str, path: &AttributePath, root: &Value,
    diags: &mut Diagnostics,
) {
    for validator in &attribute.validators {
        validator.validate(
            &ValidateRequest {
                value,
                path: path.clone(),
                root,
            },
            diags,
        );
    }
}

fn path_for(prefix: Option<&AttributePath>, name: &str) -> AttributePath {
    match prefix {
        Some(prefix) => prefix.clone().attribute(name),
        None => AttributePath::root(name),
    }
}

fn type_mismatch(path: &AttributePath, expected: &str) -> Diagnostic {
    Diagnostic::attribute_error(
        path.clone(),
        "Invalid attribute value",
        format!("'{path}' must be {expected}"),
    )
}
