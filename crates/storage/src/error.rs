/// Blob store errors
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Invalid blob key: {0:?}")]
    InvalidKey(String),
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Keys are relative, `/`-separated paths with no empty or dot segments.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_relative_paths() {
        assert!(validate_key("identities/abc.json").is_ok());
        assert!(validate_key("a").is_ok());
    }

    #[test]
    fn rejects_traversal_and_empty_segments() {
        for key in ["", "/abs", "a//b", "a/../b", "./a", "trailing/"] {
            assert!(
                matches!(validate_key(key), Err(StoreError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
