//! On-disk representation of the inverted index

use crate::index::InvertedIndex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A saved copy of the index plus a little provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,

    /// SHA-256 of the configuration file used for the crawl
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,

    /// Number of distinct tokens
    pub token_count: usize,

    /// Token → URLs, both sorted for stable diffs
    pub tokens: BTreeMap<String, Vec<String>>,
}

impl IndexSnapshot {
    /// Copies the current index contents
    pub fn capture(index: &InvertedIndex, config_hash: Option<String>) -> Self {
        let tokens = index.snapshot();
        Self {
            saved_at: Utc::now(),
            config_hash,
            token_count: tokens.len(),
            tokens,
        }
    }

    /// Turns the snapshot back into a live index
    pub fn into_index(self) -> InvertedIndex {
        InvertedIndex::from_entries(self.tokens)
    }
}
