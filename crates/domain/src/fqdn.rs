use crate::errors::DomainError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A canonical fully-qualified name: lower-cased, exactly one trailing dot.
///
/// The root name is represented as `"."`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fqdn(Arc<str>);

impl Fqdn {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim().trim_end_matches('.');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        if trimmed.len() > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "{} exceeds {} characters",
                name, MAX_NAME_LEN
            )));
        }

        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "{} contains an empty label",
                    name
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' exceeds {} characters",
                    label, MAX_LABEL_LEN
                )));
            }
            if label.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' contains whitespace",
                    label
                )));
            }
        }

        Ok(Self(Arc::from(format!("{}.", trimmed.to_ascii_lowercase()))))
    }

    pub fn root() -> Self {
        Self(Arc::from("."))
    }

    pub fn is_root(&self) -> bool {
        &*self.0 == "."
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its trailing dot (`"www.example.com"`).
    pub fn trimmed(&self) -> &str {
        if self.is_root() {
            ""
        } else {
            self.0.trim_end_matches('.')
        }
    }
}

impl FromStr for Fqdn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fqdn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
