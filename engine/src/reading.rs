//! Exportable record of one casting and the hexagrams it produced.

use serde::Serialize;

use crate::cast::Casting;
use crate::code::Polarity;
use crate::engine::HexagramEngine;
use crate::index::Hexagram;

/// Display fields of a hexagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HexagramSummary {
    /// King Wen number.
    pub id: u8,
    /// Traditional name.
    pub name: String,
    /// Bit string, top line first.
    pub binary: String,
    /// Compound name, e.g. `天地否`.
    pub explanation: String,
    /// Overview text.
    pub overview: String,
    /// Detail text.
    pub detail: String,
}

impl From<&Hexagram> for HexagramSummary {
    fn from(hexagram: &Hexagram) -> Self {
        let r = &hexagram.record;
        Self {
            id: hexagram.id,
            name: r.name.clone(),
            binary: r.binary.clone(),
            explanation: r.explanation.clone(),
            overview: r.overview.clone(),
            detail: r.detail.clone(),
        }
    }
}

/// One cast line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSummary {
    /// 1 = bottom.
    pub position: u8,
    /// `"yang"` or `"yin"`.
    #[serde(rename = "type")]
    pub polarity: Polarity,
    /// Whether the line changes.
    pub changing: bool,
}

/// A casting resolved against the engine.
///
/// ```
/// use yijing_engine::cast::{Casting, LineKind};
/// use yijing_engine::reading::Reading;
/// use yijing_engine::{EngineError, HexagramEngine};
///
/// let mut engine = HexagramEngine::default();
/// engine.initialize()?;
/// let casting = Casting::from_lines([LineKind::YoungYang; 6]);
/// let reading = Reading::new(&engine, &casting).ok_or(EngineError::NotReady)?;
/// assert_eq!(reading.hexagram.name, "乾");
/// assert_eq!(reading.changing_lines_count, 0);
/// assert!(reading.changed_hexagram.is_none());
/// # Ok::<(), EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// When the casting was made, as the caller formatted it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// The primary hexagram.
    pub hexagram: HexagramSummary,
    /// Lines, bottom first.
    pub lines: Vec<LineSummary>,
    /// Number of changing lines.
    pub changing_lines_count: usize,
    /// The hexagram after changing lines turn, if any line changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_hexagram: Option<HexagramSummary>,
}

impl Reading {
    /// Resolves `casting` against `engine`.
    ///
    /// Returns `None` if the casting is incomplete, the engine is not ready,
    /// or no indexed hexagram has the cast code.
    #[must_use]
    pub fn new(engine: &HexagramEngine, casting: &Casting) -> Option<Self> {
        let primary = engine.by_code(casting.code().ok()?)?;
        let changed = casting
            .changed_code()
            .ok()?
            .and_then(|code| engine.by_code(code))
            .map(HexagramSummary::from);
        let lines = (1u8..)
            .zip(casting.lines())
            .map(|(position, line)| LineSummary {
                position,
                polarity: line.polarity(),
                changing: line.is_changing(),
            })
            .collect();
        Some(Self {
            date: None,
            hexagram: HexagramSummary::from(primary),
            lines,
            changing_lines_count: casting.changing_count(),
            changed_hexagram: changed,
        })
    }

    /// Stamps the reading with `date`.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Pretty-printed JSON export.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot occur for this type in practice.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
