//! `configreader` command-line entry point.
//!
//! A thin wrapper over [`ConfigReader`]: each subcommand opens one session,
//! performs one operation and exits.  Mutating subcommands always commit.
//!
//! # Usage
//!
//! ```text
//! configreader [--file PATH] [--verbose] <COMMAND>
//!
//! Commands:
//!   get <KEY> [--section S] [--default D]
//!   set <KEY> <VALUE> [--section S]
//!   remove-key <KEY> [--section S]
//!   remove-section <NAME>
//!   sections
//!   items [SECTION]
//!   search <WORD> [--exact] [--ignore-case] [--threshold T]
//!   json [--output PATH]
//!   env
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                  | Default                | Description          |
//! |---------------------------|------------------------|----------------------|
//! | `CONFIGREADER_FILE`       | `~/settings.ini`       | Backing INI file     |
//! | `CONFIGREADER_THRESHOLD`  | `0.85`                 | Fuzzy search cutoff  |
//!
//! Log verbosity follows `RUST_LOG`; `--verbose` raises it to `debug`.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use configreader::application::export::env_pairs;
use configreader::{ConfigReader, SearchOptions, DEFAULT_SECTION, DEFAULT_THRESHOLD};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Read, edit, search and export an INI configuration file.
#[derive(Debug, Parser)]
#[command(name = "configreader", version)]
struct Cli {
    /// Backing INI file.  Defaults to `settings.ini` in the home directory.
    #[arg(long, global = true, env = "CONFIGREADER_FILE")]
    file: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the coerced value of a key.
    Get {
        key: String,
        #[arg(long, default_value = DEFAULT_SECTION)]
        section: String,
        /// Printed as given when the key is missing.
        #[arg(long)]
        default: Option<String>,
    },
    /// Set a key and commit.
    Set {
        key: String,
        value: String,
        #[arg(long, default_value = DEFAULT_SECTION)]
        section: String,
    },
    /// Remove a key and commit.
    RemoveKey {
        key: String,
        #[arg(long, default_value = DEFAULT_SECTION)]
        section: String,
    },
    /// Remove a section and commit.
    RemoveSection { name: String },
    /// List section names.
    Sections,
    /// Print every key of a section with its coerced value.
    Items {
        #[arg(default_value = DEFAULT_SECTION)]
        section: String,
    },
    /// Find the value matching WORD.
    Search {
        word: String,
        /// Require an exact value match instead of a similarity match.
        #[arg(long)]
        exact: bool,
        #[arg(long)]
        ignore_case: bool,
        #[arg(long, default_value_t = DEFAULT_THRESHOLD, env = "CONFIGREADER_THRESHOLD")]
        threshold: f64,
    },
    /// Print the document as JSON.
    Json {
        /// Also write the JSON to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the NAME=value lines an environment export would set.
    Env,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ConfigReader::new(cli.file.as_deref(), None)
        .context("failed to open configuration")?;
    debug!(path = %config.path().display(), "using configuration file");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&mut config, cli.command, &mut out)?;
    config.close();
    Ok(())
}

fn run(config: &mut ConfigReader, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Get {
            key,
            section,
            default,
        } => {
            let value = config.get_or(&section, &key, default);
            writeln!(out, "{value}")?;
        }
        Command::Set {
            key,
            value,
            section,
        } => {
            config
                .set_with(&section, &key, value, true)
                .with_context(|| format!("failed to set {section}.{key}"))?;
        }
        Command::RemoveKey { key, section } => {
            config
                .remove_key(&section, &key, true)
                .with_context(|| format!("failed to remove {section}.{key}"))?;
        }
        Command::RemoveSection { name } => {
            config
                .remove_section(&name, true)
                .with_context(|| format!("failed to remove section {name}"))?;
        }
        Command::Sections => {
            for name in &config.sections() {
                writeln!(out, "{name}")?;
            }
        }
        Command::Items { section } => {
            for (key, value) in config.get_items(&section) {
                writeln!(out, "{key} = {value}")?;
            }
        }
        Command::Search {
            word,
            exact,
            ignore_case,
            threshold,
        } => {
            let mut opts = SearchOptions::default().with_threshold(threshold);
            opts.exact_match = exact;
            if ignore_case {
                opts = opts.ignore_case();
            }
            match config.search(&word, &opts)? {
                Some(hit) => writeln!(out, "{}.{} = {}", hit.section, hit.key, hit.value)?,
                None => anyhow::bail!("no value matches {word:?}"),
            }
        }
        Command::Json { output } => {
            let json = match output {
                Some(path) => {
                    let mut file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    config.to_json(Some(&mut file))?
                }
                None => config.to_json(None)?,
            };
            writeln!(out, "{json}")?;
        }
        Command::Env => {
            for (name, value) in env_pairs(config.document()) {
                writeln!(out, "{name}={value}")?;
            }
        }
    }
    Ok(())
}
