//! # Quire CLI
//!
//! Command-line interface for the Quire note index.
//!
//! ## Commands
//!
//! - `quire index` - Build the index and print statistics
//! - `quire search <query>` - Search notes by text and `tag:` filters
//! - `quire resolve <label>` - Resolve a wiki-link label to a note
//! - `quire links <note>` - List and resolve the wiki links in a note
//! - `quire targets` - List autocomplete targets
//! - `quire rank [prefix]` - Rank autocomplete targets for a prefix
//! - `quire open <note>` - Record that a note was opened
//! - `quire move <old> <new>` - Rename a note, keeping its open count
//! - `quire config [--init]` - Show or create the configuration file
//! - `quire status` - Show index status and statistics
//! - `quire watch` - Keep the index current by polling for changes
//!
//! ## Example Usage
//!
//! ```bash
//! # Everything tagged "work" that mentions a standup
//! quire --root ~/notes search standup tag:work
//!
//! # What does [[Project Plan]] point to?
//! quire resolve "Project Plan"
//!
//! # Completions for the link being typed at char 120 of a draft
//! quire rank --from draft.md --cursor 120
//! ```

mod app;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Quire - incremental search over a notes directory
#[derive(Parser)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Notes root (defaults to general.notes_dir, then the current directory)
    #[arg(short, long, global = true, env = "QUIRE_ROOT")]
    root: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print statistics
    Index {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Search notes (text terms and tag:<name> filters, all ANDed)
    #[command(alias = "s")]
    Search {
        /// Query terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results to show (defaults to general.max_results)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Resolve a wiki-link label to a note path
    Resolve {
        /// Link label, as written between [[ and ]]
        label: String,
    },

    /// List and resolve the wiki links in a note
    Links {
        /// Note to scan
        note: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List every note that can be linked to
    Targets {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Rank link targets for a typed prefix
    Rank {
        /// Typed prefix (empty ranks by usage only)
        prefix: Option<String>,

        /// Take the prefix from the open [[ at --cursor in this file
        #[arg(long, conflicts_with = "prefix", requires = "cursor")]
        from: Option<PathBuf>,

        /// Character offset into --from
        #[arg(long, requires = "from")]
        cursor: Option<usize>,

        /// Maximum number of candidates to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Record that a note was opened (feeds autocomplete ranking)
    Open {
        /// Note that was opened
        note: PathBuf,
    },

    /// Rename a note or directory inside the root, keeping its open counts
    #[command(alias = "mv")]
    Move {
        /// Current path
        from: PathBuf,

        /// New path
        to: PathBuf,
    },

    /// Show the configuration file path
    Config {
        /// Write the current configuration there if no file exists yet
        #[arg(long)]
        init: bool,
    },

    /// Show index status and statistics
    Status,

    /// Poll the notes root and keep the index current
    Watch {
        /// Override watch.poll_interval_ms
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Stop after this many polls
        #[arg(long)]
        max_polls: Option<u64>,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => quire_core::Config::load_from(path)?,
        None => quire_core::Config::load()?,
    };

    // Setup logging
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    let root = cli.root.as_deref();

    // Execute command
    match cli.command {
        Commands::Index { output } => commands::index::run(config, root, output),
        Commands::Search {
            query,
            limit,
            output,
        } => commands::search::run(config, root, &query.join(" "), limit, output),
        Commands::Resolve { label } => commands::resolve::run(config, root, &label),
        Commands::Links { note, output } => commands::links::run(config, root, &note, output),
        Commands::Targets { output } => commands::targets::run(config, root, output),
        Commands::Rank {
            prefix,
            from,
            cursor,
            limit,
            output,
        } => {
            let source = match (from, cursor) {
                (Some(file), Some(cursor)) => commands::rank::PrefixSource::Cursor { file, cursor },
                _ => commands::rank::PrefixSource::Typed(prefix.unwrap_or_default()),
            };
            commands::rank::run(config, root, source, limit, output)
        }
        Commands::Open { note } => commands::open::run(config, root, &note),
        Commands::Move { from, to } => commands::move_note::run(config, root, &from, &to),
        Commands::Config { init } => commands::config::run(config, cli.config.as_deref(), init),
        Commands::Status => commands::status::run(config, root),
        Commands::Watch {
            interval_ms,
            max_polls,
        } => commands::watch::run(config, root, interval_ms, max_polls),
    }
}
