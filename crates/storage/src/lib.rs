//! Cairn blob store collaborator.
//!
//! The identity index talks to durable storage only through [`BlobStore`]:
//! `get`, `put` and `exists`, plus an optional atomic `put_if_absent`.
//! Durability and replication belong to the backend.

use async_trait::async_trait;

pub mod error;
pub mod memory;
pub mod sled_store;

pub use error::{validate_key, Result, StoreError};
pub use memory::MemoryBlobStore;
pub use sled_store::SledBlobStore;

/// Abstract blob store
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `bytes` under `key`, replacing any previous value.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Write only when `key` is vacant; returns whether the write happened.
    ///
    /// The default is a plain `exists` then `put` and is not atomic.
    /// Backends able to compare-and-set override it.
    async fn put_if_absent(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<bool> {
        if self.exists(key).await? {
            return Ok(false);
        }
        self.put(key, bytes, content_type).await?;
        Ok(true)
    }
}
