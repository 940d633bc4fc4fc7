//! Cairn identity service.
//!
//! Wires the generator, mnemonic codec, content hasher and identity index
//! into the upload flow an HTTP layer calls: hash, look up, mint on miss,
//! claim, record the owner's pointer, render the shareable phrase.

pub mod error;
pub mod service;
pub mod settings;
pub mod telemetry;

pub use error::{Result, ServiceError};
pub use service::{IdentityService, UploadReceipt};
pub use settings::{LoggingConfig, ServiceConfig, StoreBackend, StoreConfig};
pub use telemetry::init_tracing;
