//! scanstore: query laboratory scan records from the command line.
//!
//! # Usage
//!
//! ```bash
//! scanstore --db hiring_test.db summary
//! scanstore fetch --serial-number SN-1 --after "2021-11-01 00:00:00.000000-08:00" --limit 2
//! scanstore --output json counts
//! ```
//!
//! Environment variables can also be used:
//! - `SCANSTORE_DB`: Path to the SQLite database file
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use anyhow::{Context, Result};
use scanstore::config::{Command, Config, FetchArgs, OutputFormat};
use scanstore::observability::tracing::init_tracing;
use scanstore::{ProjectCount, ScanFilter, ScanRepository, WaveformRecord};
use serde::Serialize;

#[derive(Serialize)]
struct ScanInfo {
    test_id: Option<String>,
    project_name: Option<String>,
    serial_number: Option<String>,
    timestamp: Option<String>,
    waveforms: usize,
    samples: usize,
}

#[derive(Serialize)]
struct FetchOutput {
    scans: Vec<ScanInfo>,
    total: usize,
}

#[derive(Serialize)]
struct CountsOutput {
    projects: Vec<ProjectCount>,
    total: usize,
}

#[derive(Serialize)]
struct SummaryOutput {
    waveforms: i64,
    first_row: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Labelled view of a raw row; the payload is shown by size only.
fn row_map(record: &WaveformRecord) -> Result<serde_json::Map<String, serde_json::Value>> {
    let mut map = serde_json::Map::new();
    for (name, value) in record.fields() {
        map.insert(name.to_string(), serde_json::to_value(value)?);
    }
    map.insert(
        "data".to_string(),
        serde_json::Value::String(format!("<{} bytes>", record.payload().len())),
    );
    Ok(map)
}

fn summary(repo: &ScanRepository, format: OutputFormat) -> Result<()> {
    let waveforms = repo
        .count_waveforms()
        .context("failed to count waveforms")?;
    let first_row = repo
        .sample_rows(1)
        .context("failed to read first row")?
        .first()
        .map(row_map)
        .transpose()?;

    let output = SummaryOutput {
        waveforms,
        first_row,
    };

    match format {
        OutputFormat::Text => {
            println!("Waveforms: {}", output.waveforms);
            match &output.first_row {
                Some(row) => {
                    println!();
                    println!("First row:");
                    for (name, value) in row {
                        println!("  {:<16} {}", name, value);
                    }
                }
                None => println!("Table is empty."),
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn fetch(repo: &ScanRepository, args: FetchArgs, format: OutputFormat) -> Result<()> {
    let filter = ScanFilter::from(args);
    let scans = repo.fetch_scans(&filter).context("failed to fetch scans")?;

    let output = FetchOutput {
        total: scans.len(),
        scans: scans
            .iter()
            .map(|scan| {
                let meta = scan.metadata();
                ScanInfo {
                    test_id: meta.test_id.clone(),
                    project_name: meta.project_name.clone(),
                    serial_number: meta.serial_number.clone(),
                    timestamp: meta.timestamp.clone(),
                    waveforms: scan.waveform_count(),
                    samples: scan.samples_per_waveform(),
                }
            })
            .collect(),
    };

    match format {
        OutputFormat::Text => {
            if output.scans.is_empty() {
                println!("No scans found.");
            } else {
                println!(
                    "{:<24} {:<16} {:<16} {:<34} {:>9} {:>8}",
                    "TEST ID", "PROJECT", "SERIAL", "TIMESTAMP", "WAVEFORMS", "SAMPLES"
                );
                println!("{}", "-".repeat(112));
                let cell = |value: &Option<String>| value.as_deref().unwrap_or("-").to_string();
                for scan in &output.scans {
                    println!(
                        "{:<24} {:<16} {:<16} {:<34} {:>9} {:>8}",
                        cell(&scan.test_id),
                        cell(&scan.project_name),
                        cell(&scan.serial_number),
                        cell(&scan.timestamp),
                        scan.waveforms,
                        scan.samples
                    );
                }
                println!();
                println!("Total: {} scan(s)", output.total);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn counts(repo: &ScanRepository, format: OutputFormat) -> Result<()> {
    let projects = repo
        .count_tests_by_project()
        .context("failed to count waveforms per project")?;
    let output = CountsOutput {
        total: projects.len(),
        projects,
    };

    match format {
        OutputFormat::Text => {
            if output.projects.is_empty() {
                println!("No projects found.");
            } else {
                println!("{:<40} {:>10}", "PROJECT", "WAVEFORMS");
                println!("{}", "-".repeat(51));
                for project in &output.projects {
                    let name = project.project_name.as_deref().unwrap_or("-");
                    println!("{:<40} {:>10}", name, project.waveforms);
                }
                println!();
                println!("Total: {} project(s)", output.total);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    // Initialize tracing/logging
    init_tracing(&config.log_level, config.log_json);

    let repo = ScanRepository::new(&config.db);
    tracing::info!(db = %config.db.display(), command = ?config.command, "Starting");

    match config.command {
        Command::Summary => summary(&repo, config.output)?,
        Command::Fetch(args) => fetch(&repo, args, config.output)?,
        Command::Counts => counts(&repo, config.output)?,
        Command::Init => {
            repo.initialize()
                .with_context(|| format!("failed to initialize {}", config.db.display()))?;
            println!("Initialized {}", config.db.display());
        }
    }

    Ok(())
}
