use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors emitted when comparing perceptual hashes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PerceptualHashError {
    #[error("perceptual hash is not valid hex: {0}")]
    InvalidHex(String),
    #[error("perceptual hash lengths differ: {left} vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },
}

/// Blockhash descriptors of a normalized raster at three grid resolutions.
///
/// Each field is the lowercase hex rendering of a bit vector (row-major, one
/// bit per block). Similar images land within a small Hamming distance at the
/// same resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptualHashes {
    pub coarse: String,
    pub medium: String,
    pub fine: String,
}

impl PerceptualHashes {
    /// Hamming distance per resolution: `[coarse, medium, fine]`.
    pub fn distance(&self, other: &PerceptualHashes) -> Result<[u32; 3], PerceptualHashError> {
        Ok([
            hamming_hex(&self.coarse, &other.coarse)?,
            hamming_hex(&self.medium, &other.medium)?,
            hamming_hex(&self.fine, &other.fine)?,
        ])
    }
}

/// Hamming distance between two hex-encoded bit vectors of equal length.
pub fn hamming_hex(left: &str, right: &str) -> Result<u32, PerceptualHashError> {
    let left = hex::decode(left).map_err(|e| PerceptualHashError::InvalidHex(e.to_string()))?;
    let right = hex::decode(right).map_err(|e| PerceptualHashError::InvalidHex(e.to_string()))?;
    if left.len() != right.len() {
        return Err(PerceptualHashError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(left
        .iter()
        .zip(right.iter())
        .map(|(a, b)| (a ^ b).count_ones())
        .sum())
}
