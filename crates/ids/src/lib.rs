//! Cairn identifier generation.
//!
//! Snowflake-style identifiers: 41 bits of milliseconds since a configured
//! epoch, 5 bits of datacenter id, 5 bits of worker id and a 12-bit
//! per-millisecond sequence.
//!
//! # Features
//! - Strictly increasing ids per generator instance
//! - Deterministic worker derivation from an owner context
//! - Spin-wait on sequence exhaustion, hard failure on clock regression
//! - Injectable clock for deterministic tests

pub mod clock;
pub mod error;
pub mod generator;
pub mod layout;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{IdError, Result};
pub use generator::{
    derive_worker_id, GeneratorConfig, IdGenerator, CLOCK_REGRESSION_TOLERANCE_MS,
    DEFAULT_EPOCH_MS,
};
pub use layout::{SnowflakeParts, MAX_DATACENTER_ID, MAX_SEQUENCE, MAX_WORKER_ID};
