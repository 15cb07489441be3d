use std::collections::HashMap;
use std::sync::Arc;

/// Process environment access for environment-variable fallback.
///
/// Credential parameter parsing consults the environment through this shim so
/// tests can supply a fixed map instead of mutating process state.
#[derive(Clone, Debug, Default)]
pub struct Env(Inner);

#[derive(Clone, Debug, Default)]
enum Inner {
    #[default]
    Real,
    Fake(Arc<HashMap<String, String>>),
}

impl Env {
    /// The real process environment.
    #[must_use]
    pub fn real() -> Self {
        Self(Inner::Real)
    }

    /// A fixed environment for tests.
    #[must_use]
    pub fn from_slice(vars: &[(&str, &str)]) -> Self {
        let map = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Self(Inner::Fake(Arc::new(map)))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        match &self.0 {
            Inner::Real => std::env::var(name).ok(),
            Inner::Fake(map) => map.get(name).cloned(),
        }
    }

    /// Returns the first value found among an ordered list of variable names.
    #[must_use]
    pub fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.get(name))
    }
}
