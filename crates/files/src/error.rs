use cairn_storage::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Identity record not found: {path}")]
    NotFound { path: String },

    #[error("Record at {path} vanished between claim and read")]
    Vanished { path: String },
}

pub type Result<T> = std::result::Result<T, IndexError>;
