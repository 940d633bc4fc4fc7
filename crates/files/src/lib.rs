//! Cairn identity index
//!
//! Persists one identity record per distinct content hash and one file-map
//! pointer per (owner, identifier) pair over an opaque blob store. Records
//! are plain JSON objects so other services can read them directly.

pub mod error;
pub mod index;
pub mod paths;
pub mod records;

pub use error::{IndexError, Result};
pub use index::{Claim, FileDetails, IdentityIndex, RECORD_CONTENT_TYPE};
pub use paths::{
    file_map_path, identity_path, private_asset_path, public_asset_path, sanitize_component,
    PLACEHOLDER,
};
pub use records::{FileMapRecord, IdentityRecord, IdentityStatus};
