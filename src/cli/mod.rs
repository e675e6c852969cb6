//! CLI command definitions and handlers

pub(crate) mod analyze;
mod delete;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cinecull - keep the movies worth keeping
///
/// Ratings come from OMDb; nothing is ever deleted without an explicit
/// `delete --force`.
#[derive(Parser, Debug)]
#[command(name = "cinecull")]
#[command(
    version,
    about = "Curate a movie library — classify every title KEEP / DELETE / MAYBE / UNKNOWN from external ratings",
    long_about = "cinecull walks a movie folder (or imports a Plex/DLNA inventory export), \
fetches ratings from OMDb, and classifies every title through an ordered rule cascade. \
Results go to the terminal, CSV, JSON, or a standalone HTML report.\n\n\
Analysis never touches your files; physical deletion is a separate, \
dry-run-by-default subcommand.",
    after_help = "\
Examples:
  cinecull /media/movies                         Analyze a movie folder
  cinecull analyze . --format html -o report.html Standalone HTML report
  cinecull analyze . --format csv -o movies.csv   Spreadsheet export
  cinecull analyze . --inventory plex.csv         Use a Plex inventory export
  cinecull analyze . --format json -o run.json    Save for later deletion
  cinecull delete run.json                        Preview what would be deleted
  cinecull delete run.json --force                Actually delete DELETE-flagged files"
)]
pub struct Cli {
    /// Path to the movie library (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a commented cinecull.toml config template
    Init,

    /// Analyze the library and classify every title
    Analyze {
        /// Output format: text, csv, json, html
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "csv", "json", "html"])]
        format: String,

        /// Output file path (default: stdout, or auto-named for html)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Inventory export (.csv or .json) instead of walking the path
        #[arg(long)]
        inventory: Option<PathBuf>,

        /// Never hit the network; cached ratings only
        #[arg(long)]
        offline: bool,

        /// Analyze at most N titles (0 = all)
        #[arg(long, default_value = "0")]
        limit: usize,

        /// Rating cache location (default: user cache dir)
        #[arg(long)]
        cache: Option<PathBuf>,
    },

    /// Delete DELETE-flagged files listed in a saved JSON report
    Delete {
        /// JSON report produced by `analyze --format json`
        report: PathBuf,

        /// Actually delete (default is a dry run)
        #[arg(long)]
        force: bool,
    },
}

/// Dispatch a parsed CLI invocation
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),
        Some(Commands::Analyze {
            format,
            output,
            inventory,
            offline,
            limit,
            cache,
        }) => analyze::run(analyze::AnalyzeArgs {
            path: cli.path,
            format,
            output,
            inventory,
            offline,
            limit,
            cache,
        }),
        Some(Commands::Delete { report, force }) => delete::run(&report, force),
        // Bare `cinecull <path>` analyzes with defaults
        None => analyze::run(analyze::AnalyzeArgs {
            path: cli.path,
            format: "text".to_string(),
            output: None,
            inventory: None,
            offline: false,
            limit: 0,
            cache: None,
        }),
    }
}
