//! Cairn shared value types.
//!
//! Identifiers, digests and owner references passed between the generator,
//! the mnemonic codec, the content hasher and the identity index.

pub mod content_hash;
pub mod identifier;
pub mod owner;
pub mod perceptual;

pub use content_hash::*;
pub use identifier::*;
pub use owner::*;
pub use perceptual::*;
