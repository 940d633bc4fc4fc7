//! Identity and file-map record data model.

use cairn_types::{ContentHash, Identifier, OwnerRef, PerceptualHashes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityStatus {
    Pending,
    Complete,
}

/// Canonical record, one per distinct content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: Identifier,

    /// Owner of the first upload of this content.
    pub owner: OwnerRef,

    pub content_hash: ContentHash,

    /// Present only for raster images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceptual_hashes: Option<PerceptualHashes>,

    pub status: IdentityStatus,

    pub private_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Fresh record for newly seen content.
    pub fn pending(
        id: Identifier,
        owner: OwnerRef,
        content_hash: ContentHash,
        perceptual_hashes: Option<PerceptualHashes>,
        private_path: String,
    ) -> Self {
        Self {
            id,
            owner,
            content_hash,
            perceptual_hashes,
            status: IdentityStatus::Pending,
            private_path,
            public_path: None,
            created_at: Utc::now(),
        }
    }

    /// Transition to `complete`, optionally publishing a public path.
    pub fn mark_complete(&mut self, public_path: Option<String>) {
        self.status = IdentityStatus::Complete;
        if public_path.is_some() {
            self.public_path = public_path;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == IdentityStatus::Complete
    }
}

/// Pointer from an owner's listing to a canonical identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapRecord {
    pub owner: OwnerRef,
    pub id: Identifier,
    /// Key of the referenced [`IdentityRecord`].
    pub identity_path: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IdentityRecord {
        IdentityRecord::pending(
            Identifier::new(99),
            OwnerRef::new("did:key:abc").unwrap(),
            ContentHash::from_bytes([3; 32]),
            None,
            "assets/private/x".to_string(),
        )
    }

    #[test]
    fn test_pending_to_complete() {
        let mut rec = record();
        assert_eq!(rec.status, IdentityStatus::Pending);
        assert!(!rec.is_complete());

        rec.mark_complete(Some("assets/public/99".to_string()));
        assert!(rec.is_complete());
        assert_eq!(rec.public_path.as_deref(), Some("assets/public/99"));

        // A later completion without a path keeps the published one.
        rec.mark_complete(None);
        assert_eq!(rec.public_path.as_deref(), Some("assets/public/99"));
    }

    #[test]
    fn test_json_shape() {
        let rec = record();
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["id"], "99");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["owner"], "did:key:abc");
        assert_eq!(value["content_hash"], "03".repeat(32));
        assert!(value.get("public_path").is_none());
        assert!(value.get("perceptual_hashes").is_none());

        let back: IdentityRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, rec);
    }
}
