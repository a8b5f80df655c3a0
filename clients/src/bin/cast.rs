//! `yijing-cast`: casts a hexagram with three coins and prints the reading.
//!
//! Six lines are cast from the bottom up. Changing lines (老阴, 老阳) produce
//! a second, resulting hexagram.
//!
//! **Usage:**
//! ```
//! yijing-cast [--seed <n>] [--export <path>] [--json] [--dataset <path>] [-v]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use tracing::info;
use yijing_clients::logging::init_logging;
use yijing_clients::{load_config, ready_engine};
use yijing_engine::cast::{Caster, Casting};
use yijing_engine::reading::{HexagramSummary, Reading};

/// Cast a hexagram.
#[derive(Parser)]
#[command(name = "yijing-cast", about = "Cast a Yijing hexagram with three coins")]
struct Args {
    /// Seed for a reproducible casting.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the reading as JSON to this file.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the reading as JSON instead of text.
    #[arg(long)]
    json: bool,

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

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref(), args.dataset.clone())?;
    let engine = ready_engine(config)?;

    let mut caster = match args.seed {
        Some(seed) => Caster::seeded(seed),
        None => Caster::from_entropy(),
    };
    let mut casting = Casting::new();
    let mut throws = Vec::new();
    while !casting.is_complete() {
        let throw = caster.throw();
        casting.push(throw.line)?;
        throws.push(throw);
    }

    let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let reading = Reading::new(&engine, &casting)
        .context("The cast hexagram is not in the dataset")?
        .with_date(date);
    let exported = reading
        .to_json_pretty()
        .context("Failed to serialize reading")?;

    if args.json {
        println!("{exported}");
    } else {
        for (position, throw) in (1u8..=6).zip(&throws).rev() {
            let coins: Vec<&str> = throw.coins.iter().map(|c| c.label()).collect();
            let marker = if throw.line.is_changing() { " *" } else { "" };
            println!(
                "line {position}: {}  {} {}{marker}",
                coins.join(" "),
                throw.line.sum(),
                throw.line.label()
            );
        }
        println!();
        print_summary("Primary", &reading.hexagram);
        match &reading.changed_hexagram {
            Some(changed) => {
                let positions: Vec<String> = casting
                    .changing_positions()
                    .iter()
                    .map(u8::to_string)
                    .collect();
                println!("Changing lines: {}", positions.join(", "));
                print_summary("Resulting", changed);
            }
            None => println!("No changing lines."),
        }
    }

    if let Some(path) = &args.export {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, &exported)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "reading exported");
    }

    Ok(())
}

fn print_summary(title: &str, hexagram: &HexagramSummary) {
    println!(
        "{title}: {} {} ({})  {}",
        hexagram.id, hexagram.name, hexagram.binary, hexagram.explanation
    );
    if !hexagram.overview.is_empty() {
        println!("  {}", hexagram.overview);
    }
}
