use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Identifier error: {0}")]
    Id(#[from] cairn_ids::IdError),

    #[error("Mnemonic error: {0}")]
    Codec(#[from] cairn_mnemonic::CodecError),

    #[error("Hashing error: {0}")]
    Hash(#[from] cairn_crypto::HashError),

    #[error("Index error: {0}")]
    Index(#[from] cairn_files::IndexError),

    #[error("Store error: {0}")]
    Store(#[from] cairn_storage::StoreError),

    #[error("Identity record not found for content hash {0}")]
    UnknownContent(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
