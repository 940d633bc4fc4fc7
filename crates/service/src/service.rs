//! Upload flow: hash, dedup lookup, mint, claim, map.

use cairn_crypto::{detect_format, ContentHasher};
use cairn_files::{
    private_asset_path, public_asset_path, Claim, FileDetails, FileMapRecord, IdentityIndex,
    IdentityRecord,
};
use cairn_ids::{Clock, IdGenerator, SystemClock};
use cairn_mnemonic::{Mnemonic, MnemonicCodec};
use cairn_storage::{BlobStore, MemoryBlobStore, SledBlobStore};
use cairn_types::{ContentHash, Identifier, OwnerRef};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::settings::{ServiceConfig, StoreBackend};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Result of [`IdentityService::register_upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub record: IdentityRecord,
    pub file_map: FileMapRecord,
    pub mnemonic: Mnemonic,
    /// True when the content was already indexed (including a lost claim race).
    pub deduplicated: bool,
}

pub struct IdentityService<C: Clock = SystemClock> {
    generator: IdGenerator<C>,
    codec: MnemonicCodec,
    hasher: ContentHasher,
    index: IdentityIndex,
}

impl IdentityService<SystemClock> {
    /// Build every component from configuration, failing on invalid values.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ServiceError::Config(e.to_string()))?;

        let store: Arc<dyn BlobStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryBlobStore::new()),
            StoreBackend::Sled => {
                let path = config.store.path.as_ref().ok_or_else(|| {
                    ServiceError::Config("store.path is required for the sled backend".into())
                })?;
                Arc::new(SledBlobStore::open(path)?)
            }
        };

        Ok(Self::new(
            IdGenerator::new(config.generator.clone())?,
            MnemonicCodec::default(),
            ContentHasher::new(config.hasher.clone()),
            IdentityIndex::new(store),
        ))
    }
}

impl<C: Clock> IdentityService<C> {
    pub fn new(
        generator: IdGenerator<C>,
        codec: MnemonicCodec,
        hasher: ContentHasher,
        index: IdentityIndex,
    ) -> Self {
        Self {
            generator,
            codec,
            hasher,
            index,
        }
    }

    pub fn index(&self) -> &IdentityIndex {
        &self.index
    }

    pub fn hasher(&self) -> &ContentHasher {
        &self.hasher
    }

    /// Index an upload of `bytes` by `owner`.
    ///
    /// Identical content resolves to the existing identity; novel content
    /// gets a fresh identifier. Either way the owner gets a file-map pointer.
    pub async fn register_upload(
        &self,
        owner: &OwnerRef,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<UploadReceipt> {
        let content_hash = self.hasher.cryptographic_hash(bytes);

        let (record, path, deduplicated) =
            match self.index.lookup_by_content_hash(&content_hash).await? {
                Some(existing) => {
                    debug!(hash = %content_hash, id = %existing.id, "dedup hit");
                    let path = cairn_files::identity_path(&content_hash);
                    (existing, path, true)
                }
                None => self.create_identity(owner, content_hash, bytes).await?,
            };

        let file_map = self
            .index
            .record_file_map(
                owner,
                record.id,
                &path,
                FileDetails {
                    file_name: file_name.to_string(),
                    uploaded_at: Utc::now(),
                },
            )
            .await?;

        let mnemonic = self.codec.encode(record.id);
        info!(
            id = %record.id,
            %mnemonic,
            deduplicated,
            "upload registered"
        );
        Ok(UploadReceipt {
            record,
            file_map,
            mnemonic,
            deduplicated,
        })
    }

    async fn create_identity(
        &self,
        owner: &OwnerRef,
        content_hash: ContentHash,
        bytes: &[u8],
    ) -> Result<(IdentityRecord, String, bool)> {
        let perceptual_hashes = self.hasher.perceptual_hashes_if_image(bytes)?;
        let content_type = detect_format(bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        let private_path = private_asset_path(&content_hash);
        self.index
            .store()
            .put(&private_path, bytes.to_vec(), content_type)
            .await?;

        let id = self.generator.generate(owner.as_str())?;
        let record = IdentityRecord::pending(
            id,
            owner.clone(),
            content_hash,
            perceptual_hashes,
            private_path,
        );

        match self.index.claim_identity(&record).await? {
            Claim::Created(path) => Ok((record, path, false)),
            Claim::Existing(existing) => {
                debug!(hash = %content_hash, winner = %existing.id, "lost first-upload race");
                let path = cairn_files::identity_path(&content_hash);
                Ok((existing, path, true))
            }
        }
    }

    /// Mark the identity for `hash` complete without publishing it.
    pub async fn complete(&self, hash: &ContentHash) -> Result<IdentityRecord> {
        Ok(self.index.complete_identity(hash, None).await?)
    }

    /// Copy the private asset to its public path and mark the identity complete.
    pub async fn publish(&self, hash: &ContentHash) -> Result<IdentityRecord> {
        let record = self
            .index
            .lookup_by_content_hash(hash)
            .await?
            .ok_or_else(|| ServiceError::UnknownContent(hash.to_hex()))?;

        let store = self.index.store();
        let bytes = store
            .get(&record.private_path)
            .await?
            .ok_or_else(|| ServiceError::UnknownContent(hash.to_hex()))?;
        let content_type = detect_format(&bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        let public_path = public_asset_path(record.id);
        store.put(&public_path, bytes, content_type).await?;
        Ok(self.index.complete_identity(hash, Some(public_path)).await?)
    }

    pub fn mnemonic_for(&self, id: Identifier) -> Mnemonic {
        self.codec.encode(id)
    }

    pub fn resolve_mnemonic(&self, phrase: &str) -> Result<Identifier> {
        Ok(self.codec.decode_phrase(phrase)?)
    }
}
