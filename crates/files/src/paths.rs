//! Deterministic blob keys for index records and assets.
//!
//! Owner strings pass through [`sanitize_component`] before they become a
//! key segment. Sanitization is lossy: owners that differ only in
//! disallowed characters share a segment.

use cairn_types::{ContentHash, Identifier, OwnerRef};

/// Replacement for any character outside the allow-list.
pub const PLACEHOLDER: char = '_';

const IDENTITY_PREFIX: &str = "identities";
const OWNER_PREFIX: &str = "owners";
const PRIVATE_ASSET_PREFIX: &str = "assets/private";
const PUBLIC_ASSET_PREFIX: &str = "assets/public";

/// Keep `[A-Za-z0-9_-]`, replace everything else with [`PLACEHOLDER`].
pub fn sanitize_component(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                PLACEHOLDER
            }
        })
        .collect();
    if sanitized.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        sanitized
    }
}

/// Key of the identity record for `hash`.
pub fn identity_path(hash: &ContentHash) -> String {
    format!("{IDENTITY_PREFIX}/{}.json", hash.to_hex())
}

/// Key of the file-map pointer for `(owner, id)`.
pub fn file_map_path(owner: &OwnerRef, id: Identifier) -> String {
    format!(
        "{OWNER_PREFIX}/{}/files/{}.json",
        sanitize_component(owner.as_str()),
        id
    )
}

/// Key of the raw, owner-private asset bytes.
pub fn private_asset_path(hash: &ContentHash) -> String {
    format!("{PRIVATE_ASSET_PREFIX}/{}", hash.to_hex())
}

/// Key of a published copy, addressed by identifier.
pub fn public_asset_path(id: Identifier) -> String {
    format!("{PUBLIC_ASSET_PREFIX}/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_component("did:key:z6Mk"), "did_key_z6Mk");
        assert_eq!(sanitize_component("a/b\\c d"), "a_b_c_d");
        assert_eq!(sanitize_component("../etc"), "___etc");
        assert_eq!(sanitize_component("ünï"), "_n_");
        assert_eq!(sanitize_component(""), "_");
        assert_eq!(sanitize_component("ok-name_1"), "ok-name_1");
    }

    #[test]
    fn test_file_map_path_is_pure() {
        let owner = OwnerRef::new("did:plc:abc123").unwrap();
        let id = Identifier::new(42);
        let first = file_map_path(&owner, id);
        assert_eq!(first, file_map_path(&owner, id));
        assert_eq!(first, "owners/did_plc_abc123/files/42.json");
    }

    #[test]
    fn test_identity_path_uses_full_hash() {
        let hash = ContentHash::from_bytes([0x11; 32]);
        assert_eq!(identity_path(&hash), format!("identities/{}.json", "11".repeat(32)));
    }

    #[test]
    fn test_asset_paths() {
        let hash = ContentHash::from_bytes([0; 32]);
        assert!(private_asset_path(&hash).starts_with("assets/private/"));
        assert_eq!(public_asset_path(Identifier::new(7)), "assets/public/7");
    }
}
