//! Errors raised while obtaining or parsing a dataset document.

use std::path::PathBuf;

/// Failure to produce a usable [`Dataset`](crate::Dataset).
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("cannot read dataset {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON or not an object of tables.
    #[error("invalid dataset document: {0}")]
    Json(#[from] serde_json::Error),
    /// A required top-level table is absent.
    #[error("dataset has no `{0}` table")]
    MissingTable(&'static str),
    /// No hexagram survived parsing.
    #[error("hexagram table is empty")]
    Empty,
}
