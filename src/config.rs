//! Configuration parsing for the scanstore CLI.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Defaults matching the lab's local database file

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::filter::ScanFilter;

/// scanstore: query laboratory scan records in a local SQLite file.
#[derive(Parser, Debug, Clone)]
#[command(name = "scanstore")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Path to the SQLite database file
    #[arg(long, env = "SCANSTORE_DB", default_value = "hiring_test.db")]
    pub db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "SCANSTORE_LOG_JSON", default_value_t = false)]
    pub log_json: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the waveform count and the first raw row
    Summary,
    /// List scans matching the given filters
    Fetch(FetchArgs),
    /// Count waveforms per project
    Counts,
    /// Create the waveform table in a new database file
    Init,
}

/// Filters for the `fetch` command.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchArgs {
    /// Only scans with this serial number
    #[arg(long)]
    pub serial_number: Option<String>,

    /// Only scans from this project
    #[arg(long)]
    pub project_name: Option<String>,

    /// Inclusive upper timestamp bound, e.g. "2021-11-16 13:14:37.764268-08:00"
    #[arg(long)]
    pub before: Option<String>,

    /// Inclusive lower timestamp bound
    #[arg(long)]
    pub after: Option<String>,

    /// Maximum number of scans
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl From<FetchArgs> for ScanFilter {
    fn from(args: FetchArgs) -> Self {
        Self {
            serial_number: args.serial_number,
            project_name: args.project_name,
            before: args.before,
            after: args.after,
            limit: args.limit,
        }
    }
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a configuration for testing.
    #[cfg(test)]
    pub fn test_config(db: PathBuf, command: Command) -> Self {
        Self {
            db,
            log_level: "debug".into(),
            log_json: false,
            output: OutputFormat::Json,
            command,
        }
    }
}
