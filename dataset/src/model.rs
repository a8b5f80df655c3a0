//! Dataset record types.
//!
//! These types mirror the JSON document consumed by the application: a
//! `bagua` table keyed by trigram name and a `hexagrams` table keyed by the
//! stringified King Wen number. Only `binary` (and `name` for hexagrams) is
//! required; every other field is display metadata that the engine carries
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One of the eight trigrams (八卦).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrigramRecord {
    /// Unicode glyph (e.g. `"☰"`).
    #[serde(default)]
    pub symbol: String,
    /// 3-character bit string, top line first; `'1'` is a solid (yang) line.
    pub binary: String,
    /// Natural image (e.g. `"天"`).
    #[serde(default)]
    pub nature: String,
    /// Characteristic quality (e.g. `"健"`).
    #[serde(default)]
    pub attribute: String,
    /// Compass direction in the later-heaven arrangement.
    #[serde(default)]
    pub direction: String,
    /// Associated animal.
    #[serde(default)]
    pub animal: String,
    /// Five-phase element.
    #[serde(default)]
    pub element: String,
    /// Family member.
    #[serde(default)]
    pub family: String,
    /// Any further keys present in the source document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single line reading (爻辞).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineText {
    /// Line position, 1 (bottom) to 6 (top).
    pub position: u8,
    /// Reading text.
    #[serde(default)]
    pub content: String,
}

/// One of the sixty-four hexagrams, as stored in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexagramRecord {
    /// Traditional name (e.g. `"否"`).
    pub name: String,
    /// 6-character bit string: upper trigram bits followed by lower trigram bits.
    pub binary: String,
    /// Unicode hexagram glyph.
    #[serde(default)]
    pub unicode: String,
    /// Short explanation, usually the compound name (e.g. `"天地否"`).
    #[serde(default)]
    pub explanation: String,
    /// Overview text.
    #[serde(default)]
    pub overview: String,
    /// Detailed commentary.
    #[serde(default)]
    pub detail: String,
    /// Per-line readings, bottom line first.
    #[serde(default)]
    pub lines: Vec<LineText>,
    /// Any further keys present in the source document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which table an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// The `bagua` (trigram) table.
    Bagua,
    /// The `hexagrams` table.
    Hexagrams,
}

impl Table {
    /// Returns the key used for this table in the JSON document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Bagua => "bagua",
            Table::Hexagrams => "hexagrams",
        }
    }
}

/// An entry that could not be read as a record and was dropped from its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Source table.
    pub table: Table,
    /// Key of the entry within the table.
    pub key: String,
    /// Deserialization error message.
    pub reason: String,
}
