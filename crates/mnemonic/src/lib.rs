//! Cairn mnemonic codec.
//!
//! Renders identifiers as short, shareable word phrases and parses them
//! back. `decode(encode(x)) == x` for every 64-bit identifier, and every
//! accepted phrase maps to exactly one identifier.

pub mod codec;
pub mod error;
pub mod wordlist;

pub use codec::{Mnemonic, MnemonicCodec, BITS_PER_WORD, MAX_WORDS, POSITION_OFFSET};
pub use error::{CodecError, Result};
pub use wordlist::{Wordlist, WORDLIST_V1_SHA256, WORDLIST_VERSION, WORD_COUNT};
