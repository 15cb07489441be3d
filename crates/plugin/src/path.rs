use std::fmt::{self, Display};

/// A single step in an attribute path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Attribute(String),
    Index(usize),
}

/// Points at the configuration attribute a diagnostic refers to, so the host
/// can render the offending location to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributePath {
    steps: Vec<Step>,
}

impl AttributePath {
    /// Starts a path at a top-level attribute.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![Step::Attribute(name.into())],
        }
    }

    /// Extends the path with a nested attribute name.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Attribute(name.into()));
        self
    }

    /// Extends the path with a list index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(Step::Index(index));
        self
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Attribute(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Step::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_steps() {
        let path = AttributePath::root("credentials").index(2);
        assert_eq!(path.to_string(), "credentials[2]");

        let path = AttributePath::root("client_secret_credential").attribute("client_id");
        assert_eq!(path.to_string(), "client_secret_credential.client_id");
    }
}
