//! Versioned 2048-entry dictionary with its reverse lookup.
//!
//! Changing a list invalidates every mnemonic issued against it, so each
//! bundled list carries a version number and a pinned fingerprint.

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CodecError, Result};

/// Entries in a wordlist (11 bits per word).
pub const WORD_COUNT: usize = 2048;

/// Version of the bundled English list.
pub const WORDLIST_VERSION: u32 = 1;

/// SHA-256 over the bundled English words joined by `\n`.
pub const WORDLIST_V1_SHA256: &str =
    "187db04a869dd9bc7be80d21a86497d692c0db6abd3aa8cb6be5d618ff757fae";

const ENGLISH_V1: &str = include_str!("../wordlist/v1.txt");

static ENGLISH: Lazy<Arc<Wordlist>> = Lazy::new(|| {
    Arc::new(
        Wordlist::parse(WORDLIST_VERSION, ENGLISH_V1)
            .expect("bundled wordlist v1 holds 2048 unique words"),
    )
});

#[derive(Debug)]
pub struct Wordlist {
    version: u32,
    words: Vec<String>,
    index: HashMap<String, u16>,
}

impl Wordlist {
    /// Shared handle to the bundled English list.
    pub fn english() -> Arc<Wordlist> {
        Arc::clone(&ENGLISH)
    }

    /// Parse a whitespace-separated list. Requires exactly 2048 unique,
    /// lowercase ASCII words.
    pub fn parse(version: u32, text: &str) -> Result<Self> {
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if words.len() != WORD_COUNT {
            return Err(CodecError::InvalidWordlist(format!(
                "expected {} words, found {}",
                WORD_COUNT,
                words.len()
            )));
        }

        let mut index = HashMap::with_capacity(WORD_COUNT);
        for (i, word) in words.iter().enumerate() {
            if !word.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(CodecError::InvalidWordlist(format!(
                    "word {word:?} at {i} is not lowercase ascii"
                )));
            }
            if index.insert(word.clone(), i as u16).is_some() {
                return Err(CodecError::InvalidWordlist(format!(
                    "duplicate word {word:?} at {i}"
                )));
            }
        }

        Ok(Self {
            version,
            words,
            index,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Word at `index` (0..2048).
    pub fn word(&self, index: u16) -> &str {
        &self.words[usize::from(index) % WORD_COUNT]
    }

    /// Dictionary index of `word`, if present.
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }

    /// Hex SHA-256 of the words joined by `\n`.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                hasher.update(b"\n");
            }
            hasher.update(word.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
