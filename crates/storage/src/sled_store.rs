//! Sled-backed blob store.

use async_trait::async_trait;
use sled::{Db, Tree};
use std::path::Path;
use tracing::debug;

use crate::error::{validate_key, Result};
use crate::BlobStore;

pub struct SledBlobStore {
    db: Db,
    blobs: Tree,
    content_types: Tree,
}

impl SledBlobStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Throwaway store that lives only as long as the handle.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        let blobs = db.open_tree("blobs")?;
        let content_types = db.open_tree("content_types")?;
        Ok(Self {
            db,
            blobs,
            content_types,
        })
    }

    pub fn content_type(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .content_types
            .get(key.as_bytes())?
            .map(|v| String::from_utf8_lossy(&v).into_owned()))
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for SledBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.blobs.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        validate_key(key)?;
        self.blobs.insert(key.as_bytes(), bytes)?;
        self.content_types
            .insert(key.as_bytes(), content_type.as_bytes())?;
        debug!(key, "blob written");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.blobs.contains_key(key.as_bytes())?)
    }

    async fn put_if_absent(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<bool> {
        validate_key(key)?;
        let swapped = self
            .blobs
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(bytes))?;
        if swapped.is_err() {
            debug!(key, "blob already present, write skipped");
            return Ok(false);
        }
        self.content_types
            .insert(key.as_bytes(), content_type.as_bytes())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_roundtrip_and_overwrite() {
        let store = SledBlobStore::temporary().unwrap();
        store.put("a/b.json", b"{}".to_vec(), "application/json").await.unwrap();
        store.put("a/b.json", b"[]".to_vec(), "application/json").await.unwrap();
        assert_eq!(store.get("a/b.json").await.unwrap(), Some(b"[]".to_vec()));
        assert_eq!(
            store.content_type("a/b.json").unwrap().as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_put_if_absent_is_compare_and_swap() {
        let store = SledBlobStore::temporary().unwrap();
        assert!(store.put_if_absent("k", b"first".to_vec(), "x").await.unwrap());
        assert!(!store.put_if_absent("k", b"second".to_vec(), "x").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some(b"first".to_vec()));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = SledBlobStore::open(dir.path()).unwrap();
            store.put("persist/me", b"bytes".to_vec(), "application/octet-stream").await.unwrap();
            store.flush().unwrap();
        }
        let store = SledBlobStore::open(dir.path()).unwrap();
        assert!(store.exists("persist/me").await.unwrap());
        assert_eq!(store.get("persist/me").await.unwrap(), Some(b"bytes".to_vec()));
    }
}
