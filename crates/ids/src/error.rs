use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("invalid generator configuration: {0}")]
    Configuration(String),

    #[error("clock moved backwards: last issued at {last_ms} ms, clock reads {now_ms} ms")]
    ClockRegression { last_ms: u64, now_ms: u64 },

    #[error("timestamp {elapsed_ms} ms since epoch exceeds the identifier range")]
    TimestampOverflow { elapsed_ms: u64 },
}

pub type Result<T> = std::result::Result<T, IdError>;
