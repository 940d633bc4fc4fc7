//! Content hasher: dedup digest plus perceptual triple.

use cairn_types::{ContentHash, PerceptualHashes};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hash_functions::HashAlgorithm;
use crate::perceptual::{self, REFERENCE_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    pub algorithm: HashAlgorithm,
    pub reference_width: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Blake3,
            reference_width: REFERENCE_WIDTH,
        }
    }
}

/// Stateless and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct ContentHasher {
    config: HasherConfig,
}

impl ContentHasher {
    pub fn new(config: HasherConfig) -> Self {
        Self { config }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.config.algorithm
    }

    /// Deterministic digest of `bytes`, the primary dedup key.
    pub fn cryptographic_hash(&self, bytes: &[u8]) -> ContentHash {
        ContentHash::from_bytes(self.config.algorithm.digest(bytes))
    }

    /// `(coarse, medium, fine)` descriptors. Only defined for raster images;
    /// anything else yields `HashError::UnsupportedContentType`.
    pub fn perceptual_hashes(&self, bytes: &[u8]) -> Result<PerceptualHashes> {
        perceptual::perceptual_hashes(bytes, self.config.reference_width)
    }

    /// Perceptual hashes when the content is an image, `None` when it is not.
    /// Decode failures on image-looking bytes still propagate.
    pub fn perceptual_hashes_if_image(&self, bytes: &[u8]) -> Result<Option<PerceptualHashes>> {
        match self.perceptual_hashes(bytes) {
            Ok(hashes) => Ok(Some(hashes)),
            Err(err) if err.is_unsupported() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
