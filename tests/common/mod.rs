//! Test utilities and database fixtures for scanstore tests.
//!
//! Provides:
//! - Temporary database files
//! - Waveform row builders
//! - Seeding helpers that go through the repository insert path

#![allow(dead_code)]

use ndarray::arr1;
use scanstore::{ScanRepository, WaveformRecord};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture that manages a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with an initialized, empty database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        ScanRepository::new(&db_path)
            .initialize()
            .expect("failed to initialize schema");
        Self { temp_dir, db_path }
    }

    /// Repository over the fixture database.
    pub fn repo(&self) -> ScanRepository {
        ScanRepository::new(&self.db_path)
    }

    /// Get the database path as a string.
    pub fn db_path_str(&self) -> &str {
        self.db_path.to_str().expect("invalid path")
    }

    /// Insert one waveform with the given samples.
    pub fn insert(&self, spec: &WaveformSpec, samples: &[f64]) -> i64 {
        self.repo()
            .insert_waveform(&spec.record(), arr1(samples).into_dyn().view())
            .expect("failed to insert waveform")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The fields that vary between test waveforms.
#[derive(Debug, Clone)]
pub struct WaveformSpec {
    pub test_id: String,
    pub project_name: String,
    pub serial_number: String,
    pub timestamp: String,
    pub measurement_id: i64,
}

impl WaveformSpec {
    pub fn new(test_id: &str, project_name: &str, serial_number: &str, timestamp: &str) -> Self {
        Self {
            test_id: test_id.to_string(),
            project_name: project_name.to_string(),
            serial_number: serial_number.to_string(),
            timestamp: timestamp.to_string(),
            measurement_id: 0,
        }
    }

    pub fn measurement(mut self, measurement_id: i64) -> Self {
        self.measurement_id = measurement_id;
        self
    }

    /// Full raw row with constant scan-level metadata.
    pub fn record(&self) -> WaveformRecord {
        WaveformRecord::default()
            .with("test_id", self.test_id.as_str())
            .with("project_name", self.project_name.as_str())
            .with("serial_number", self.serial_number.as_str())
            .with("timestamp", self.timestamp.as_str())
            .with("exp_group", "control")
            .with("sample_state", "dry")
            .with("n_rows", 4i64)
            .with("n_columns", 4i64)
            .with("row_spacing", 0.5)
            .with("col_spacing", 0.5)
            .with("score", 0.75)
            .with("sample_rate", 2000.0)
            .with("delay", 0.01 * self.measurement_id as f64)
            .with("measurement_id", self.measurement_id)
            .with("duration", 1.5)
            .with("position_x", self.measurement_id as f64)
            .with("position_y", -(self.measurement_id as f64))
    }
}

/// Timestamp in the table's sortable string form.
pub fn ts(day: u32, hour: u32) -> String {
    format!("2021-11-{day:02} {hour:02}:14:37.764268-08:00")
}
