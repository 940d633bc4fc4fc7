use thiserror::Error;

/// Hashing failures.
///
/// `UnsupportedContentType` means the bytes are not a raster image this
/// build can read; callers fall back to digest-only dedup. `Decode` means
/// the bytes claim to be an image but are damaged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("perceptual hashing unsupported for content type {}", .detected.as_deref().unwrap_or("unknown"))]
    UnsupportedContentType { detected: Option<String> },

    #[error("image decode failed: {0}")]
    Decode(String),
}

impl HashError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, HashError::UnsupportedContentType { .. })
    }
}

pub type Result<T> = std::result::Result<T, HashError>;
