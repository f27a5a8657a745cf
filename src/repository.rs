//! Scan repository: the single access point to the waveform store.
//!
//! Reads raw waveform rows, groups them by `test_id`, and assembles
//! [`Scan`] entities. Each call opens its own connection and closes it
//! before returning.

use ndarray::ArrayViewD;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::codec::{ArrayCodec, NpyCodec};
use crate::error::Result;
use crate::filter::ScanFilter;
use crate::record::WaveformRecord;
use crate::scan::Scan;
use crate::storage::query::select_waveforms;
use crate::storage::reader::{self, ProjectCount};
use crate::storage::{schema, writer};

/// Repository over one SQLite database file.
#[derive(Debug, Clone)]
pub struct ScanRepository<C = NpyCodec> {
    db_path: PathBuf,
    codec: C,
}

impl ScanRepository<NpyCodec> {
    /// Repository using the NumPy payload codec.
    pub fn new<P: Into<PathBuf>>(db_path: P) -> Self {
        Self::open(db_path, NpyCodec)
    }
}

impl<C: ArrayCodec> ScanRepository<C> {
    /// Repository using a caller-supplied payload codec.
    ///
    /// The file is not touched until the first operation.
    pub fn open<P: Into<PathBuf>>(db_path: P, codec: C) -> Self {
        Self {
            db_path: db_path.into(),
            codec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    fn connect(&self) -> Result<Connection> {
        Ok(schema::open_existing(&self.db_path)?)
    }

    /// Create the database file and waveform table if they do not exist.
    pub fn initialize(&self) -> Result<()> {
        let conn = schema::open_or_create(&self.db_path)?;
        schema::initialize_schema(&conn)?;
        tracing::info!(path = %self.db_path.display(), "Initialized scan database");
        Ok(())
    }

    /// Retrieve scans matching `filter`.
    ///
    /// Scans are returned in the order their `test_id` first appears in
    /// storage order. `filter.limit` caps the number of scans, not rows, and
    /// is applied after every matching group has been built.
    ///
    /// # Errors
    ///
    /// Storage errors from SQLite, decode errors for unreadable payloads,
    /// and construction errors for malformed groups all abort the call, even
    /// when the failing group falls past the limit.
    #[tracing::instrument(skip(self, filter), fields(rows, scans))]
    pub fn fetch_scans(&self, filter: &ScanFilter) -> Result<Vec<Scan>> {
        let query = select_waveforms(filter);
        tracing::debug!(sql = %query.sql, params = ?query.params, "Querying waveforms");

        let rows = {
            let conn = self.connect()?;
            reader::read_waveforms(&conn, &query)?
        };
        tracing::Span::current().record("rows", rows.len());

        let mut scans = group_by_test_id(rows)
            .into_iter()
            .map(|group| Scan::from_waveforms(group, &self.codec))
            .collect::<Result<Vec<_>>>()?;
        if let Some(limit) = filter.limit {
            scans.truncate(limit);
        }
        tracing::Span::current().record("scans", scans.len());
        Ok(scans)
    }

    /// Raw waveform row counts per distinct project name.
    ///
    /// Counts rows, not scans. Order follows SQLite's aggregation.
    pub fn count_tests_by_project(&self) -> Result<Vec<ProjectCount>> {
        let conn = self.connect()?;
        Ok(reader::count_by_project(&conn)?)
    }

    /// Total number of raw waveform rows.
    pub fn count_waveforms(&self) -> Result<i64> {
        let conn = self.connect()?;
        Ok(reader::count_rows(&conn)?)
    }

    /// The first `limit` raw rows, for inspecting the table layout.
    pub fn sample_rows(&self, limit: usize) -> Result<Vec<WaveformRecord>> {
        let conn = self.connect()?;
        Ok(reader::sample_waveforms(&conn, limit)?)
    }

    /// Encode `samples` and store them as one waveform row.
    ///
    /// Returns the new row id.
    pub fn insert_waveform(
        &self,
        record: &WaveformRecord,
        samples: ArrayViewD<'_, f64>,
    ) -> Result<i64> {
        let payload = self.codec.encode(samples)?;
        let conn = self.connect()?;
        Ok(writer::insert_waveform(&conn, record, &payload)?)
    }
}

/// Split rows into per-`test_id` groups, in first-seen order.
///
/// Rows keep their relative order inside each group. Rows without a
/// `test_id` column group together under the null key.
pub fn group_by_test_id(rows: Vec<WaveformRecord>) -> Vec<Vec<WaveformRecord>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<WaveformRecord>> = Vec::new();

    for row in rows {
        let key = row
            .test_id()
            .map(|id| format!("{}:{id}", id.type_name()))
            .unwrap_or_default();
        match index.get(&key) {
            Some(&slot) => groups[slot].push(row),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }

    tracing::debug!(groups = groups.len(), "Grouped waveforms by test_id");
    groups
}
