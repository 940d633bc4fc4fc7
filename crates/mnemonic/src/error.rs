use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unknown word {word:?} at position {position}")]
    UnknownWord { word: String, position: usize },

    #[error("mnemonic must have between 1 and {max} words, got {count}")]
    InvalidLength { count: usize, max: usize },

    #[error("mnemonic is not canonical: leading word encodes only padding")]
    NonCanonical,

    #[error("mnemonic encodes a value wider than 64 bits")]
    Overflow,

    #[error("invalid wordlist: {0}")]
    InvalidWordlist(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
