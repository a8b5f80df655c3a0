//! Where the engine's dataset comes from.
//!
//! A file source may fall back to the embedded copy. The fallback is taken at
//! most once per load; there is no retry.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, warn};
use yijing_dataset::Dataset;

use crate::error::EngineError;

/// Requested dataset source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// The copy compiled into `yijing-dataset`.
    Embedded,
    /// A JSON file; failure to read it is fatal.
    File(PathBuf),
    /// A JSON file, falling back to the embedded copy if it cannot be used.
    FileOrEmbedded(PathBuf),
}

/// Source a loaded dataset actually came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// The embedded copy was requested and used.
    Embedded,
    /// The file was read.
    File(PathBuf),
    /// The file failed and the embedded copy was used instead.
    EmbeddedFallback(PathBuf),
    /// The caller handed over an already parsed dataset.
    Provided,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Embedded => write!(f, "embedded dataset"),
            SourceKind::File(path) => write!(f, "{}", path.display()),
            SourceKind::EmbeddedFallback(path) => {
                write!(f, "embedded dataset (fallback for {})", path.display())
            }
            SourceKind::Provided => write!(f, "caller-provided dataset"),
        }
    }
}

impl DatasetSource {
    /// Loads the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DatasetUnavailable`] when no dataset could be
    /// obtained from this source.
    pub fn load(&self) -> Result<(Dataset, SourceKind), EngineError> {
        match self {
            DatasetSource::Embedded => Dataset::embedded()
                .map(|dataset| (dataset, SourceKind::Embedded))
                .map_err(EngineError::DatasetUnavailable),
            DatasetSource::File(path) => {
                debug!(path = %path.display(), "loading dataset file");
                Dataset::from_path(path)
                    .map(|dataset| (dataset, SourceKind::File(path.clone())))
                    .map_err(EngineError::DatasetUnavailable)
            }
            DatasetSource::FileOrEmbedded(path) => match Dataset::from_path(path) {
                Ok(dataset) => Ok((dataset, SourceKind::File(path.clone()))),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "dataset file unusable, falling back to embedded copy"
                    );
                    Dataset::embedded()
                        .map(|dataset| (dataset, SourceKind::EmbeddedFallback(path.clone())))
                        .map_err(EngineError::DatasetUnavailable)
                }
            },
        }
    }
}
