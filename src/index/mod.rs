//! Inverted index over crawled page text
//!
//! The index maps a normalized token to the set of URLs whose text contained
//! it. Writers take an exclusive lock for the span of one [`InvertedIndex::add`]
//! call; any number of readers may search at the same time. A reader never sees
//! a token entry halfway through an update.

mod tokenizer;

pub use tokenizer::{normalize_token, tokenize, MIN_TOKEN_LEN};

use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Thread-safe token → URL-set map
#[derive(Debug, Default)]
pub struct InvertedIndex {
    entries: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl InvertedIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an index from previously saved entries
    pub fn from_entries<I, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, U)>,
        U: IntoIterator<Item = String>,
    {
        let map = entries
            .into_iter()
            .map(|(token, urls)| (token, urls.into_iter().collect::<BTreeSet<_>>()))
            .filter(|(_, urls)| !urls.is_empty())
            .collect();

        Self {
            entries: RwLock::new(map),
        }
    }

    /// Indexes `text` under `url`
    ///
    /// Tokenization runs before the write lock is taken, so the lock is held
    /// only for the map updates of this one call. Adding the same pair twice
    /// leaves the index unchanged.
    pub fn add(&self, url: &str, text: &str) {
        let tokens: BTreeSet<String> = tokenize(text).collect();
        if tokens.is_empty() {
            return;
        }

        let mut entries = self.entries.write();
        for token in tokens {
            let urls = entries.entry(token).or_default();
            if !urls.contains(url) {
                urls.insert(url.to_string());
            }
        }
    }

    /// Returns the URLs recorded for `token`, in lexical order
    ///
    /// The lookup is exact and case-sensitive; callers normalize their query
    /// with [`normalize_token`] first. An unknown token yields an empty vector.
    pub fn search(&self, token: &str) -> Vec<String> {
        self.entries
            .read()
            .get(token)
            .map(|urls| urls.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copies the whole index out under a single read lock
    pub fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .read()
            .iter()
            .map(|(token, urls)| (token.clone(), urls.iter().cloned().collect()))
            .collect()
    }
}
