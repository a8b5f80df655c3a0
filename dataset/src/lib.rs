//! Yijing trigram and hexagram tables encoded as typed Rust data.
//!
//! The `yijing-dataset` crate reads the JSON document that backs the
//! divination application (a `bagua` table of 8 trigrams and a `hexagrams`
//! table of 64 hexagrams) into owned records, and ships the canonical King Wen
//! dataset compiled into the binary as a fallback copy.
//!
//! # Entry Point
//!
//! ```
//! let dataset = yijing_dataset::Dataset::embedded()?;
//! assert_eq!(dataset.trigram_count(), 8);
//! assert_eq!(dataset.hexagram_count(), 64);
//! # Ok::<(), yijing_dataset::DatasetError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! let dataset = yijing_dataset::Dataset::embedded()?;
//! let json = yijing_dataset::serializer::to_json(&dataset);
//! assert!(json["hexagrams"]["12"]["binary"] == "111000");
//! # Ok::<(), yijing_dataset::DatasetError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod model;
pub mod serializer;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

pub use error::DatasetError;
pub use model::{HexagramRecord, LineText, RejectedEntry, Table, TrigramRecord};

/// The canonical dataset document, compiled into the crate.
pub const EMBEDDED_JSON: &str = include_str!("../data/hexagrams.json");

/// A parsed dataset. Both tables keep the insertion order of the source document.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Trigram name → record.
    pub trigrams: Vec<(String, TrigramRecord)>,
    /// Stringified hexagram id → record.
    pub hexagrams: Vec<(String, HexagramRecord)>,
    /// Entries dropped because they could not be read as records.
    pub rejected: Vec<RejectedEntry>,
}

#[derive(Deserialize)]
struct RawDocument {
    bagua: Option<Map<String, Value>>,
    hexagrams: Option<Map<String, Value>>,
}

impl Dataset {
    /// Parses a dataset document.
    ///
    /// Entries that do not deserialize (for instance a hexagram without a
    /// `name`) are dropped and listed in [`Dataset::rejected`] rather than
    /// failing the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] for malformed JSON,
    /// [`DatasetError::MissingTable`] when `bagua` or `hexagrams` is absent, and
    /// [`DatasetError::Empty`] when no hexagram entry survives.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDocument = serde_json::from_str(json)?;
        let bagua = raw.bagua.ok_or(DatasetError::MissingTable("bagua"))?;
        let hexagrams = raw
            .hexagrams
            .ok_or(DatasetError::MissingTable("hexagrams"))?;

        let mut rejected = Vec::new();
        let trigrams = collect_table(Table::Bagua, bagua, &mut rejected);
        let hexagrams = collect_table(Table::Hexagrams, hexagrams, &mut rejected);
        if hexagrams.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self {
            trigrams,
            hexagrams,
            rejected,
        })
    }

    /// Reads and parses a dataset document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read, otherwise any
    /// error from [`Dataset::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let json = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Returns the canonical King Wen dataset embedded in the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded document is corrupt, which the crate's own
    /// tests rule out.
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_json(EMBEDDED_JSON)
    }

    /// Looks up a trigram by name. Returns `None` if not found.
    #[must_use]
    pub fn find_trigram(&self, name: &str) -> Option<&TrigramRecord> {
        self.trigrams
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, record)| record)
    }

    /// Looks up a hexagram by its table key (e.g. `"12"`). Returns `None` if not found.
    #[must_use]
    pub fn find_hexagram(&self, key: &str) -> Option<&HexagramRecord> {
        self.hexagrams
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| record)
    }

    /// Returns the number of trigram records.
    #[must_use]
    pub fn trigram_count(&self) -> usize {
        self.trigrams.len()
    }

    /// Returns the number of hexagram records.
    #[must_use]
    pub fn hexagram_count(&self) -> usize {
        self.hexagrams.len()
    }
}

fn collect_table<T: DeserializeOwned>(
    table: Table,
    raw: Map<String, Value>,
    rejected: &mut Vec<RejectedEntry>,
) -> Vec<(String, T)> {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some((key, record)),
            Err(e) => {
                rejected.push(RejectedEntry {
                    table,
                    key,
                    reason: e.to_string(),
                });
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn embedded() -> Dataset {
        Dataset::embedded().expect("embedded dataset parses")
    }

    #[test]
    fn trigram_count() {
        assert_eq!(embedded().trigram_count(), 8);
    }

    #[test]
    fn hexagram_count() {
        assert_eq!(embedded().hexagram_count(), 64);
    }

    #[test]
    fn nothing_rejected() {
        assert!(embedded().rejected.is_empty());
    }

    #[test]
    fn keys_follow_king_wen_order() {
        let keys: Vec<String> = embedded().hexagrams.into_iter().map(|(k, _)| k).collect();
        let expected: Vec<String> = (1..=64).map(|n: u8| n.to_string()).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn all_hexagram_codes_unique() {
        let mut codes = std::collections::HashSet::new();
        for (key, record) in &embedded().hexagrams {
            assert!(
                codes.insert(record.binary.clone()),
                "Duplicate binary {} at {}",
                record.binary,
                key
            );
        }
    }

    #[test]
    fn all_trigram_codes_unique() {
        let mut codes = std::collections::HashSet::new();
        for (name, record) in &embedded().trigrams {
            assert_eq!(record.binary.len(), 3, "{name}");
            assert!(codes.insert(record.binary.clone()), "Duplicate binary at {name}");
        }
    }

    #[test]
    fn every_hexagram_has_six_lines() {
        for (key, record) in &embedded().hexagrams {
            let positions: Vec<u8> = record.lines.iter().map(|l| l.position).collect();
            assert_eq!(positions, vec![1, 2, 3, 4, 5, 6], "hexagram {key}");
        }
    }

    #[test]
    fn glyphs_follow_unicode_block() {
        for (key, record) in &embedded().hexagrams {
            let id: u32 = key.parse().expect("numeric key");
            let expected = char::from_u32(0x4DC0 + id - 1).map(String::from);
            assert_eq!(Some(record.unicode.clone()), expected, "hexagram {key}");
        }
    }

    #[test]
    fn pi_and_kun_named() {
        let dataset = embedded();
        assert_eq!(dataset.find_hexagram("12").map(|h| h.name.as_str()), Some("否"));
        assert_eq!(
            dataset.find_trigram("坤").map(|t| t.binary.as_str()),
            Some("000")
        );
    }
}
