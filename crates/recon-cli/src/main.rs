//! `recon` CLI — format, check, and convert RECON files from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Re-serialize a document in canonical layout (stdin → stdout)
//! cat adventurers.recon | recon fmt
//!
//! # Single-line output, file to file
//! recon fmt --compact -i adventurers.recon -o adventurers.min.recon
//!
//! # Validate only; exits non-zero with line/column on error
//! recon check -i adventurers.recon
//!
//! # Convert to and from JSON
//! recon to-json -i adventurers.recon
//! echo '{"name":"Abjurer","meleeRes":1}' | recon from-json
//!
//! # Count records, lists and scalars
//! recon stats -i adventurers.recon
//! ```
//!
//! Logging goes to stderr. `-v` enables debug output, `-vv` trace output;
//! without it `RUST_LOG` is honoured.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recon_core::{Style, Value};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "recon",
    version,
    about = "RECON (Record Object Notation) CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and write it back in canonical layout
    Fmt {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write the document on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Parse a document and report whether it is well-formed
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Convert RECON to pretty-printed JSON
    ToJson {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Convert JSON to RECON
    FromJson {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write the document on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Show counts of records, lists and scalars in a document
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fmt {
            input,
            output,
            compact,
        } => {
            let text = read_input(input.as_deref())?;
            let value = recon_core::parse(&text).context("Failed to parse RECON")?;
            let out = recon_core::serialize_with(&value, style(compact))
                .context("Failed to serialize RECON")?;
            write_output(output.as_deref(), &out)?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            let value = recon_core::parse(&text).context("Failed to parse RECON")?;
            println!("ok: {}", value.kind());
        }
        Commands::ToJson { input, output } => {
            let text = read_input(input.as_deref())?;
            let value = recon_core::parse(&text).context("Failed to parse RECON")?;
            let json = recon_core::json::to_json_string(&value)
                .context("Failed to convert RECON to JSON")?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::FromJson {
            input,
            output,
            compact,
        } => {
            let json = read_input(input.as_deref())?;
            let value = recon_core::json::from_json_str(&json)
                .context("Failed to convert JSON to RECON")?;
            let out = recon_core::serialize_with(&value, style(compact))
                .context("Failed to serialize RECON")?;
            write_output(output.as_deref(), &out)?;
        }
        Commands::Stats { input } => {
            let text = read_input(input.as_deref())?;
            let value = recon_core::parse(&text).context("Failed to parse RECON")?;
            let mut stats = Stats::default();
            stats.visit(&value, 0);
            println!("Records:   {}", stats.records);
            println!("Tagged:    {}", stats.tagged);
            println!("Lists:     {}", stats.lists);
            println!("Scalars:   {}", stats.scalars);
            println!("Max depth: {}", stats.max_depth);
        }
    }

    Ok(())
}

fn style(compact: bool) -> Style {
    if compact {
        Style::Compact
    } else {
        Style::Pretty
    }
}

/// Counters for `recon stats`. Depth counts containers, so a bare scalar
/// document has depth 0 and `{}` has depth 1.
#[derive(Default)]
struct Stats {
    records: usize,
    /// Records carrying a `class` tag.
    tagged: usize,
    lists: usize,
    scalars: usize,
    max_depth: usize,
}

impl Stats {
    fn visit(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Record(record) => {
                self.records += 1;
                if record.class().is_some() {
                    self.tagged += 1;
                }
                self.max_depth = self.max_depth.max(depth + 1);
                for (_, field) in record.iter() {
                    self.visit(field, depth + 1);
                }
            }
            Value::List(items) => {
                self.lists += 1;
                self.max_depth = self.max_depth.max(depth + 1);
                for item in items {
                    self.visit(item, depth + 1);
                }
            }
            _ => self.scalars += 1,
        }
    }
}

fn init_tracing(verbose: u8) {
    let env_filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
