//! Identity index over a blob store.
//!
//! A mechanical index: each call issues independent reads and writes with
//! no cross-call atomicity. `lookup_by_content_hash` followed by
//! `upsert_identity` can race with a concurrent first upload of the same
//! content; `claim_identity` narrows that window to whatever atomicity the
//! store's `put_if_absent` provides.

use cairn_storage::BlobStore;
use cairn_types::{ContentHash, Identifier, OwnerRef};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::paths::{file_map_path, identity_path};
use crate::records::{FileMapRecord, IdentityRecord};

/// Content type of every record written by the index.
pub const RECORD_CONTENT_TYPE: &str = "application/json";

/// Outcome of [`IdentityIndex::claim_identity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The record was written; carries its key.
    Created(String),
    /// Another record already holds this content hash.
    Existing(IdentityRecord),
}

/// Display fields denormalized into a file-map pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct IdentityIndex {
    store: Arc<dyn BlobStore>,
}

impl IdentityIndex {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    pub async fn lookup_by_content_hash(&self, hash: &ContentHash) -> Result<Option<IdentityRecord>> {
        self.read(&identity_path(hash)).await
    }

    /// Write `record` under the key derived from its content hash,
    /// overwriting any previous record for that hash. Returns the key.
    pub async fn upsert_identity(&self, record: &IdentityRecord) -> Result<String> {
        let path = identity_path(&record.content_hash);
        self.write(&path, record).await?;
        debug!(%path, id = %record.id, status = ?record.status, "identity upserted");
        Ok(path)
    }

    /// Write `record` only if no record exists for its content hash.
    pub async fn claim_identity(&self, record: &IdentityRecord) -> Result<Claim> {
        let path = identity_path(&record.content_hash);
        let bytes = serde_json::to_vec(record)?;
        if self
            .store
            .put_if_absent(&path, bytes, RECORD_CONTENT_TYPE)
            .await?
        {
            debug!(%path, id = %record.id, "identity claimed");
            return Ok(Claim::Created(path));
        }

        debug!(%path, "identity already claimed, returning existing record");
        match self.read(&path).await? {
            Some(existing) => Ok(Claim::Existing(existing)),
            None => Err(IndexError::Vanished { path }),
        }
    }

    /// Move the record for `hash` to `complete`.
    pub async fn complete_identity(
        &self,
        hash: &ContentHash,
        public_path: Option<String>,
    ) -> Result<IdentityRecord> {
        let path = identity_path(hash);
        let mut record: IdentityRecord = self
            .read(&path)
            .await?
            .ok_or(IndexError::NotFound { path })?;
        record.mark_complete(public_path);
        self.upsert_identity(&record).await?;
        Ok(record)
    }

    /// Write the `(owner, id)` pointer to `identity_path`. Returns the record.
    pub async fn record_file_map(
        &self,
        owner: &OwnerRef,
        id: Identifier,
        identity_path: &str,
        details: FileDetails,
    ) -> Result<FileMapRecord> {
        let record = FileMapRecord {
            owner: owner.clone(),
            id,
            identity_path: identity_path.to_string(),
            file_name: details.file_name,
            uploaded_at: details.uploaded_at,
        };
        let path = file_map_path(owner, id);
        self.write(&path, &record).await?;
        debug!(%path, %id, "file map recorded");
        Ok(record)
    }

    pub async fn lookup_file_map(
        &self,
        owner: &OwnerRef,
        id: Identifier,
    ) -> Result<Option<FileMapRecord>> {
        self.read(&file_map_path(owner, id)).await
    }

    /// Follow a file-map pointer to its identity record.
    pub async fn resolve_file_map(&self, pointer: &FileMapRecord) -> Result<Option<IdentityRecord>> {
        self.read(&pointer.identity_path).await
    }

    async fn read<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.store.get(path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize>(&self, path: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store.put(path, bytes, RECORD_CONTENT_TYPE).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::IdentityStatus;
    use cairn_storage::MemoryBlobStore;

    fn record(hash_byte: u8, id: u64) -> IdentityRecord {
        IdentityRecord::pending(
            Identifier::new(id),
            OwnerRef::new("did:key:owner").unwrap(),
            ContentHash::from_bytes([hash_byte; 32]),
            None,
            format!("assets/private/{id}"),
        )
    }

    #[tokio::test]
    async fn test_upsert_then_lookup() {
        let index = IdentityIndex::new(Arc::new(MemoryBlobStore::new()));
        let rec = record(1, 10);
        index.upsert_identity(&rec).await.unwrap();

        let found = index.lookup_by_content_hash(&rec.content_hash).await.unwrap();
        assert_eq!(found, Some(rec));
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let index = IdentityIndex::new(Arc::new(MemoryBlobStore::new()));
        let missing = ContentHash::from_bytes([9; 32]);
        assert_eq!(index.lookup_by_content_hash(&missing).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_per_hash() {
        let store = MemoryBlobStore::new();
        let index = IdentityIndex::new(Arc::new(store.clone()));

        let first = record(2, 20);
        let mut second = record(2, 21);
        second.status = IdentityStatus::Complete;

        let p1 = index.upsert_identity(&first).await.unwrap();
        let p2 = index.upsert_identity(&second).await.unwrap();
        assert_eq!(p1, p2);
        assert_eq!(store.len(), 1);

        let found = index
            .lookup_by_content_hash(&first.content_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, Identifier::new(21));
    }

    #[tokio::test]
    async fn test_claim_keeps_first_record() {
        let index = IdentityIndex::new(Arc::new(MemoryBlobStore::new()));
        let first = record(3, 30);
        let second = record(3, 31);

        assert!(matches!(
            index.claim_identity(&first).await.unwrap(),
            Claim::Created(_)
        ));
        match index.claim_identity(&second).await.unwrap() {
            Claim::Existing(existing) => assert_eq!(existing.id, first.id),
            other => panic!("expected existing record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_identity() {
        let index = IdentityIndex::new(Arc::new(MemoryBlobStore::new()));
        let rec = record(4, 40);
        index.upsert_identity(&rec).await.unwrap();

        let done = index
            .complete_identity(&rec.content_hash, Some("assets/public/40".into()))
            .await
            .unwrap();
        assert!(done.is_complete());

        let stored = index
            .lookup_by_content_hash(&rec.content_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.public_path.as_deref(), Some("assets/public/40"));
    }

    #[tokio::test]
    async fn test_complete_missing_identity() {
        let index = IdentityIndex::new(Arc::new(MemoryBlobStore::new()));
        let err = index
            .complete_identity(&ContentHash::from_bytes([5; 32]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::NotFound { .. }));
    }
}
