use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnerRefError {
    #[error("owner reference must not be empty")]
    Empty,
}

/// Opaque, stable owner/context string (for example a DID).
///
/// Used as worker-derivation input and, after sanitization, as a storage
/// path component. Never interpreted beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerRef(String);

impl OwnerRef {
    pub fn new(value: impl Into<String>) -> Result<Self, OwnerRefError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(OwnerRefError::Empty);
        }
        Ok(OwnerRef(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OwnerRef> for String {
    fn from(value: OwnerRef) -> Self {
        value.0
    }
}

impl TryFrom<String> for OwnerRef {
    type Error = OwnerRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        OwnerRef::new(value)
    }
}

impl TryFrom<&str> for OwnerRef {
    type Error = OwnerRefError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        OwnerRef::new(value)
    }
}
