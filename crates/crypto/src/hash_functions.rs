//! Cryptographic digests used as content-addressing keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for fixed-width digest functions
pub trait HashFunction: Send + Sync {
    /// Hash input data into a 32-byte digest
    fn hash_fixed(&self, data: &[u8]) -> [u8; 32];

    /// Get the name of the hash function
    fn name(&self) -> &'static str;
}

/// Blake3 hash implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

impl HashFunction for Blake3 {
    fn hash_fixed(&self, data: &[u8]) -> [u8; 32] {
        *blake3::hash(data).as_bytes()
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// SHA256 hash implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

impl HashFunction for Sha256 {
    fn hash_fixed(&self, data: &[u8]) -> [u8; 32] {
        use sha2::Digest;
        sha2::Sha256::digest(data).into()
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// Selectable digest algorithm for dedup keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => Blake3.name(),
            HashAlgorithm::Sha256 => Sha256.name(),
        }
    }

    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            HashAlgorithm::Blake3 => Blake3.hash_fixed(data),
            HashAlgorithm::Sha256 => Sha256.hash_fixed(data),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
