use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors emitted when parsing identifiers from their textual form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierParseError {
    #[error("identifier must not be empty")]
    Empty,
    #[error("identifier must be an unsigned decimal integer: {0}")]
    InvalidDigits(String),
}

/// Time-ordered asset identifier.
///
/// The inner value is a bit-packed snowflake (timestamp, datacenter, worker,
/// sequence). It serializes as a decimal string so that consumers limited to
/// 53-bit floats never round it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(u64);

impl Identifier {
    /// Wrap a raw integer.
    pub const fn new(value: u64) -> Self {
        Identifier(value)
    }

    /// Raw integer value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier(value)
    }
}

impl From<Identifier> for u64 {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.to_string()
    }
}

impl FromStr for Identifier {
    type Err = IdentifierParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(IdentifierParseError::Empty);
        }
        // u64::from_str accepts a leading '+', which is not a canonical rendering.
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierParseError::InvalidDigits(value.to_string()));
        }
        value
            .parse::<u64>()
            .map(Identifier)
            .map_err(|_| IdentifierParseError::InvalidDigits(value.to_string()))
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
