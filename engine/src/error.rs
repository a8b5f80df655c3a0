//! Error types for the engine crate.

use std::path::PathBuf;

use yijing_dataset::DatasetError;

/// A bit string that is not a valid trigram or hexagram code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    /// Wrong number of characters.
    #[error("expected {expected} bit characters, found {found}")]
    Length {
        /// Required length (3 or 6).
        expected: usize,
        /// Length of the input, in characters.
        found: usize,
    },
    /// A character other than `'0'` or `'1'`.
    #[error("invalid bit character {0:?}")]
    Digit(char),
}

/// Failure to bring the engine to the ready state.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Neither the configured source nor the embedded copy produced a dataset.
    #[error("dataset unavailable: {0}")]
    DatasetUnavailable(#[source] DatasetError),
    /// The dataset parsed but no hexagram entry had a usable id.
    #[error("no hexagram entry could be indexed")]
    NothingIndexed,
    /// The operation requires a ready engine.
    #[error("hexagram engine is not initialized")]
    NotReady,
}

/// Failure to read an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML for [`EngineConfig`](crate::EngineConfig).
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Misuse of a [`Casting`](crate::cast::Casting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    /// A seventh line was added.
    #[error("casting already has six lines")]
    Complete,
    /// A hexagram was requested before six lines were cast.
    #[error("casting has {0} of six lines")]
    Incomplete(usize),
}
