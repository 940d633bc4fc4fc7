//! Bijective identifier <-> mnemonic transform.
//!
//! The identifier's shortest binary form is left-padded to a multiple of
//! 11 bits and split into 11-bit chunks, most significant first. Each
//! chunk is shifted by `position * POSITION_OFFSET` (mod 2048) before the
//! dictionary lookup so that structurally similar ids read differently.
//! The shift depends only on the position and is undone on decode.

use cairn_types::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::wordlist::{Wordlist, WORD_COUNT};

pub const BITS_PER_WORD: u32 = 11;

/// Per-position index shift. Lexical variety only, carries no secrecy.
pub const POSITION_OFFSET: usize = 37;

/// Longest mnemonic for a 64-bit identifier (66 bits of chunks).
pub const MAX_WORDS: usize = 6;

const CHUNK_MASK: u64 = (1 << BITS_PER_WORD) - 1;

/// Ordered word sequence. Parsing normalizes case and whitespace but does
/// not check dictionary membership; that happens in [`MnemonicCodec::decode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mnemonic(Vec<String>);

impl Mnemonic {
    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl FromStr for Mnemonic {
    type Err = CodecError;

    fn from_str(phrase: &str) -> Result<Self> {
        let words: Vec<String> = phrase
            .split_whitespace()
            .map(|w| w.to_ascii_lowercase())
            .collect();
        if words.is_empty() || words.len() > MAX_WORDS {
            return Err(CodecError::InvalidLength {
                count: words.len(),
                max: MAX_WORDS,
            });
        }
        Ok(Mnemonic(words))
    }
}

impl From<Mnemonic> for String {
    fn from(value: Mnemonic) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Mnemonic {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Stateless codec over a shared wordlist.
#[derive(Debug, Clone)]
pub struct MnemonicCodec {
    wordlist: Arc<Wordlist>,
}

impl Default for MnemonicCodec {
    fn default() -> Self {
        Self::new(Wordlist::english())
    }
}

impl MnemonicCodec {
    pub fn new(wordlist: Arc<Wordlist>) -> Self {
        Self { wordlist }
    }

    pub fn wordlist(&self) -> &Wordlist {
        &self.wordlist
    }

    pub fn encode(&self, id: Identifier) -> Mnemonic {
        let value = id.get();
        let bits = (u64::BITS - value.leading_zeros()).max(1);
        let chunks = bits.div_ceil(BITS_PER_WORD) as usize;

        let words = (0..chunks)
            .map(|position| {
                let shift = BITS_PER_WORD * (chunks - 1 - position) as u32;
                let chunk = ((value >> shift) & CHUNK_MASK) as usize;
                let index = (chunk + offset(position)) % WORD_COUNT;
                self.wordlist.word(index as u16).to_string()
            })
            .collect();
        Mnemonic(words)
    }

    pub fn decode(&self, mnemonic: &Mnemonic) -> Result<Identifier> {
        let words = mnemonic.words();
        if words.is_empty() || words.len() > MAX_WORDS {
            return Err(CodecError::InvalidLength {
                count: words.len(),
                max: MAX_WORDS,
            });
        }

        let mut value: u128 = 0;
        for (position, word) in words.iter().enumerate() {
            let index = self
                .wordlist
                .index_of(word)
                .ok_or_else(|| CodecError::UnknownWord {
                    word: word.clone(),
                    position,
                })?;
            let chunk = (usize::from(index) + WORD_COUNT - offset(position)) % WORD_COUNT;
            if position == 0 && chunk == 0 && words.len() > 1 {
                return Err(CodecError::NonCanonical);
            }
            value = (value << BITS_PER_WORD) | chunk as u128;
        }

        let value = u64::try_from(value).map_err(|_| CodecError::Overflow)?;
        debug!(words = words.len(), "decoded mnemonic");
        Ok(Identifier::new(value))
    }

    /// Parse and decode a free-form phrase.
    pub fn decode_phrase(&self, phrase: &str) -> Result<Identifier> {
        self.decode(&phrase.parse()?)
    }
}

fn offset(position: usize) -> usize {
    (position * POSITION_OFFSET) % WORD_COUNT
}
