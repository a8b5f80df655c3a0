//! Hexagram lookup engine for the Yijing dataset.
//!
//! The `yijing-engine` crate loads the trigram and hexagram tables from
//! `yijing-dataset`, derives every hexagram's upper and lower trigram and its
//! opposite, inverse and mutual hexagrams in a single pass, and answers
//! queries by bit code, King Wen number, trigram pair and keyword.
//!
//! # Entry Point
//!
//! ```
//! use yijing_engine::{EngineConfig, HexagramEngine};
//!
//! let mut engine = HexagramEngine::new(EngineConfig::default());
//! let report = engine.initialize()?;
//! assert_eq!(report.hexagram_count, 64);
//! assert!(report.is_clean());
//!
//! let qian = engine.by_binary("111111").map(|h| h.name());
//! assert_eq!(qian, Some("乾"));
//! assert_eq!(engine.search("CREATIVE").len(), 1);
//! # Ok::<(), yijing_engine::EngineError>(())
//! ```
//!
//! # Casting
//!
//! [`cast`] simulates the three-coin method and [`reading`] resolves a cast
//! against the engine for export.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod cast;
pub mod code;
pub mod config;
pub mod engine;
pub mod error;
mod index;
pub mod reading;
pub mod relation;
pub mod report;
pub mod snapshot;
pub mod source;

pub use code::{HexagramCode, Polarity, TrigramCode};
pub use config::EngineConfig;
pub use engine::{EngineStatus, HexagramEngine, Related, RelatedHexagram};
pub use error::{CastError, CodeError, ConfigError, EngineError};
pub use index::{Hexagram, Trigram};
pub use relation::{RelationFallback, RelationKind, RelationTarget, Relations};
pub use report::{LoadIssue, LoadReport, Severity};
pub use source::{DatasetSource, SourceKind};
