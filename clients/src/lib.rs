//! Setup shared by the `yijing-*` command-line tools: logging, configuration
//! and engine startup.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use yijing_engine::{EngineConfig, HexagramEngine};

/// Reads `config` if given, then applies a `dataset` override.
///
/// # Errors
///
/// Returns an error if the configuration file cannot be read or parsed.
pub fn load_config(config: Option<&Path>, dataset: Option<PathBuf>) -> Result<EngineConfig> {
    let mut settings = match config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = dataset {
        settings = settings.with_dataset(path);
    }
    Ok(settings)
}

/// Creates an engine and initializes it, logging every load issue.
///
/// # Errors
///
/// Returns an error if the engine could not be initialized.
pub fn ready_engine(config: EngineConfig) -> Result<HexagramEngine> {
    let mut engine = HexagramEngine::new(config);
    let report = engine
        .initialize()
        .context("Failed to initialize the hexagram engine")?;
    for issue in &report.issues {
        if issue.is_warning() {
            warn!(entry = %issue.entry, "{}", issue.message);
        } else {
            debug!(entry = %issue.entry, "{}", issue.message);
        }
    }
    Ok(engine)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yijing_engine::{DatasetSource, RelationFallback};

    use super::*;

    #[test]
    fn dataset_flag_overrides_config() {
        let path = std::env::temp_dir().join("yijing-clients-config-test.toml");
        std::fs::write(
            &path,
            "dataset = \"a.json\"\nembedded_fallback = false\nrelation_fallback = { default_id = 1 }\n",
        )
        .unwrap();
        let config = load_config(Some(&path), Some(PathBuf::from("b.json"))).unwrap();
        assert_eq!(config.source(), DatasetSource::File(PathBuf::from("b.json")));
        assert_eq!(config.relation_fallback, RelationFallback::DefaultId(1));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_config_is_an_error() {
        let missing = Path::new("/nonexistent/yijing.toml");
        assert!(load_config(Some(missing), None).is_err());
    }

    #[test]
    fn default_engine_starts() {
        let engine = ready_engine(EngineConfig::default()).unwrap();
        assert_eq!(engine.hexagrams().len(), 64);
    }
}
