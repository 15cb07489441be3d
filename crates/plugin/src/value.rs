use std::collections::BTreeMap;

/// A configuration value supplied by the host.
///
/// Hosts distinguish between an attribute the user never set (`Null`), one
/// whose value is not yet known during planning (`Unknown`), and a concrete
/// value. The distinction matters: environment-variable fallback applies to
/// `Null` fields only, never to an explicitly configured empty string.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Unknown,
    String(String),
    Bool(bool),
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub const NULL: Self = Self::Null;

    /// Builds a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Builds a list of string values.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(|s| Self::String(s.into())).collect())
    }

    /// Builds an object value from `(name, value)` pairs.
    pub fn object<'a>(entries: impl IntoIterator<Item = (&'a str, Self)>) -> Self {
        Self::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// True when the value is neither null nor unknown.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::Null | Self::Unknown)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a named attribute on an object value.
    ///
    /// An absent attribute and an attribute explicitly set to null are
    /// indistinguishable to a provider, so both return [`Value::Null`].
    #[must_use]
    pub fn attr(&self, name: &str) -> &Self {
        match self {
            Self::Object(entries) => entries.get(name).unwrap_or(&Self::NULL),
            _ => &Self::NULL,
        }
    }

    /// Collects the elements of a string list.
    ///
    /// Returns `None` when the value is not a list or any element is not a
    /// concrete string.
    #[must_use]
    pub fn string_items(&self) -> Option<Vec<String>> {
        let items = self.as_list()?;
        items.iter().map(|v| v.as_str().map(ToString::to_string)).collect()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
