//! `yijing-query`: looks up hexagrams and trigrams in the dataset.
//!
//! **Usage:**
//! ```
//! yijing-query [--dataset <path>] [--config <path>] [--json] [-v] <command>
//!
//!   binary <code>            hexagram with a 6-character bit string, top line first
//!   id <n>                   hexagram with King Wen number n
//!   trigrams <upper> <lower> hexagram formed by two trigrams
//!   related <id>             opposite, inverse and mutual hexagrams
//!   search <keyword>         hexagrams mentioning a keyword
//!   trigram [name]           one trigram, or all eight
//! ```
//!
//! Exits with status 1 when nothing matches.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use yijing_clients::logging::init_logging;
use yijing_clients::{load_config, ready_engine};
use yijing_engine::snapshot::{hexagram_to_json, trigram_to_json};
use yijing_engine::{Hexagram, HexagramEngine, Trigram};

/// Query the hexagram engine.
#[derive(Parser)]
#[command(name = "yijing-query", about = "Look up Yijing hexagrams and trigrams")]
struct Args {
    /// Dataset file to load instead of the embedded copy.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Engine configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hexagram with a 6-character bit string, top line first
    Binary {
        /// Bit string such as 111000
        code: String,
    },
    /// Hexagram with a King Wen number
    Id {
        /// 1 to 64
        id: u8,
    },
    /// Hexagram formed by an upper and a lower trigram
    Trigrams {
        /// Upper trigram name, e.g. 乾
        upper: String,
        /// Lower trigram name, e.g. 坤
        lower: String,
    },
    /// Opposite, inverse and mutual hexagrams
    Related {
        /// King Wen number
        id: u8,
    },
    /// Hexagrams whose name or text contains a keyword (case-insensitive)
    Search {
        /// Keyword
        keyword: String,
    },
    /// One trigram, or all of them
    Trigram {
        /// Trigram name; omit to list all
        name: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref(), args.dataset.clone())?;
    let engine = ready_engine(config)?;

    let found = match &args.command {
        Command::Binary { code } => {
            show_hexagram(engine.by_binary(code), &args, || format!("no hexagram has code {code}"))?
        }
        Command::Id { id } => {
            show_hexagram(engine.by_id(*id), &args, || format!("no hexagram has id {id}"))?
        }
        Command::Trigrams { upper, lower } => show_hexagram(
            engine.by_trigrams(upper, lower),
            &args,
            || format!("no hexagram stacks {upper} over {lower}"),
        )?,
        Command::Related { id } => show_related(&engine, *id, &args)?,
        Command::Search { keyword } => show_search(&engine, keyword, &args)?,
        Command::Trigram { name } => show_trigrams(&engine, name.as_deref(), &args)?,
    };

    Ok(if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{text}");
    Ok(())
}

fn describe(hexagram: &Hexagram) -> String {
    let r = &hexagram.record;
    let mut line = format!("{:>2} {} {} {}", hexagram.id, r.unicode, r.name, r.binary);
    if !r.explanation.is_empty() {
        line.push_str(&format!("  {}", r.explanation));
    }
    line
}

fn show_hexagram<F>(hexagram: Option<&Hexagram>, args: &Args, missing: F) -> Result<bool>
where
    F: FnOnce() -> String,
{
    let Some(hexagram) = hexagram else {
        eprintln!("{}", missing());
        return Ok(false);
    };
    if args.json {
        print_json(&hexagram_to_json(hexagram))?;
        return Ok(true);
    }

    let r = &hexagram.record;
    println!("{}", describe(hexagram));
    let trigram = |name: &Option<String>| name.clone().unwrap_or_else(|| "?".to_owned());
    println!(
        "   upper {}, lower {}",
        trigram(&hexagram.upper_trigram),
        trigram(&hexagram.lower_trigram)
    );
    for text in [&r.overview, &r.detail] {
        if !text.is_empty() {
            println!("   {text}");
        }
    }
    for line in r.lines.iter().rev() {
        println!("   {} {}", line.position, line.content);
    }
    Ok(true)
}

fn show_related(engine: &HexagramEngine, id: u8, args: &Args) -> Result<bool> {
    let Some(related) = engine.related(id) else {
        eprintln!("no hexagram has id {id}");
        return Ok(false);
    };

    if args.json {
        let mut map = serde_json::Map::new();
        for entry in related.iter() {
            map.insert(
                entry.kind.as_str().to_owned(),
                json!({
                    "id": entry.hexagram.id,
                    "name": entry.hexagram.name(),
                    "binary": entry.hexagram.binary(),
                    "fallback": entry.fallback
                }),
            );
        }
        print_json(&json!({ "id": id, "related": map }))?;
        return Ok(true);
    }

    println!("{}", describe(related.source));
    if related.is_empty() {
        println!("   no relations resolved");
    }
    for entry in related.iter() {
        let note = if entry.fallback { " (fallback)" } else { "" };
        println!(
            "   {:<8} {}  {}{note}",
            entry.kind.as_str(),
            entry.kind.label(),
            describe(entry.hexagram).trim_start()
        );
    }
    Ok(true)
}

fn show_search(engine: &HexagramEngine, keyword: &str, args: &Args) -> Result<bool> {
    let matches = engine.search(keyword);
    if args.json {
        let values: Vec<Value> = matches.iter().map(|h| hexagram_to_json(h)).collect();
        print_json(&Value::Array(values))?;
    } else {
        for hexagram in &matches {
            println!("{}", describe(hexagram));
        }
    }
    if matches.is_empty() {
        eprintln!("no hexagram mentions {keyword:?}");
    }
    Ok(!matches.is_empty())
}

fn show_trigrams(engine: &HexagramEngine, name: Option<&str>, args: &Args) -> Result<bool> {
    let selected: Vec<&Trigram> = match name {
        Some(name) => match engine.trigram(name) {
            Some(trigram) => vec![trigram],
            None => {
                eprintln!("no trigram is named {name}");
                return Ok(false);
            }
        },
        None => engine.trigrams().iter().collect(),
    };

    if args.json {
        let mut map = serde_json::Map::new();
        for trigram in &selected {
            map.insert(trigram.name.clone(), trigram_to_json(trigram));
        }
        print_json(&Value::Object(map))?;
        return Ok(true);
    }

    for trigram in selected {
        let r = &trigram.record;
        println!(
            "{} {} {}  {} {} {} {} {} {}",
            r.symbol,
            trigram.name,
            r.binary,
            r.nature,
            r.attribute,
            r.direction,
            r.animal,
            r.element,
            r.family
        );
    }
    Ok(true)
}
