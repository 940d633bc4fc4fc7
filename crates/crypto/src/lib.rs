//! Cairn content hashing.
//!
//! Provides the cryptographic digest used as the deduplication key and the
//! coarse/medium/fine perceptual hashes used for similarity grouping.

pub mod error;
pub mod hash_functions;
pub mod hasher;
pub mod perceptual;

pub use error::{HashError, Result};
pub use hash_functions::{Blake3, HashAlgorithm, HashFunction, Sha256};
pub use hasher::{ContentHasher, HasherConfig};
pub use perceptual::{detect_format, GRID_SIZES, MAX_ASPECT_RATIO, REFERENCE_WIDTH};
