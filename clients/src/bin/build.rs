//! `yijing-build`: loads the dataset, runs the derivation pass and writes
//! the artifacts to the output directory.
//!
//! **Outputs:**
//! - `<out>/hexagrams.json`: the dataset document
//! - `<out>/hexagrams.derived.json`: every hexagram with its trigrams and relations
//!
//! **Usage:**
//! ```
//! yijing-build [--out <path>] [--dataset <path>] [--config <path>] [-v]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::warn;
use yijing_clients::load_config;
use yijing_clients::logging::init_logging;
use yijing_dataset::serializer;
use yijing_engine::{snapshot, HexagramEngine};

/// Build the Yijing dataset artifacts.
#[derive(Parser)]
#[command(name = "yijing-build", about = "Build Yijing dataset artifacts")]
struct Args {
    /// Output directory for generated artifacts.
    #[arg(long, default_value = "public")]
    out: PathBuf,

    /// Dataset file to load instead of the embedded copy.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Engine configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  Written: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let out = &args.out;

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    let config = load_config(args.config.as_deref(), args.dataset.clone())?;
    let (dataset, source) = config
        .source()
        .load()
        .context("Failed to load the dataset")?;
    let document = serializer::to_json(&dataset);

    let mut engine = HexagramEngine::new(config);
    let report = engine
        .initialize_with(dataset)
        .context("Failed to index the dataset")?;
    for issue in &report.issues {
        if issue.is_warning() {
            warn!("{issue}");
        }
    }

    // Print summary
    println!(
        "Yijing dataset from {source}: {} trigrams, {} hexagrams, {} derived, {} warnings",
        report.trigram_count,
        report.hexagram_count,
        report.derived_count,
        report.warning_count()
    );

    write_json(&out.join("hexagrams.json"), &document)?;

    let derived = snapshot::to_json(&engine).context("Engine is not ready")?;
    write_json(&out.join("hexagrams.derived.json"), &derived)?;

    println!("Done.");
    Ok(())
}
