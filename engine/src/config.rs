//! Engine configuration, read from TOML.
//!
//! ```toml
//! dataset = "data/hexagrams.json"
//! embedded_fallback = true
//! relation_fallback = "unresolved"   # or { default_id = 1 }
//! ```
//!
//! Every key is optional; an empty file yields [`EngineConfig::default`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::relation::RelationFallback;
use crate::source::DatasetSource;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Dataset file. `None` uses the embedded copy.
    pub dataset: Option<PathBuf>,
    /// Use the embedded copy when `dataset` cannot be read.
    pub embedded_fallback: bool,
    /// Policy for derived codes with no matching hexagram.
    pub relation_fallback: RelationFallback,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            embedded_fallback: true,
            relation_fallback: RelationFallback::Unresolved,
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] on syntax errors, unknown keys or bad values.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise any
    /// error from [`EngineConfig::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let toml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml)
    }

    /// Overrides the dataset file.
    #[must_use]
    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset = Some(path.into());
        self
    }

    /// Overrides the relation fallback policy.
    #[must_use]
    pub fn with_relation_fallback(mut self, policy: RelationFallback) -> Self {
        self.relation_fallback = policy;
        self
    }

    /// The dataset source these settings describe.
    #[must_use]
    pub fn source(&self) -> DatasetSource {
        match (&self.dataset, self.embedded_fallback) {
            (None, _) => DatasetSource::Embedded,
            (Some(path), true) => DatasetSource::FileOrEmbedded(path.clone()),
            (Some(path), false) => DatasetSource::File(path.clone()),
        }
    }
}
