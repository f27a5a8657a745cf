//! Retrieval filters for [`ScanRepository::fetch_scans`](crate::repository::ScanRepository::fetch_scans).
//!
//! Timestamps are compared as strings. Supply them in the sortable
//! `YYYY-MM-DD HH:MM:SS.ffffff+HH:MM` form the table uses.

use crate::error::{Error, Result};

/// Conditions combined with AND; `limit` caps the number of scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    /// Exact match on `serial_number`.
    pub serial_number: Option<String>,
    /// Exact match on `project_name`.
    pub project_name: Option<String>,
    /// Inclusive upper bound on `timestamp`.
    pub before: Option<String>,
    /// Inclusive lower bound on `timestamp`.
    pub after: Option<String>,
    /// Maximum number of scans, applied after grouping.
    pub limit: Option<usize>,
}

impl ScanFilter {
    /// A filter matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    #[must_use]
    pub fn project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    #[must_use]
    pub fn before(mut self, timestamp: impl Into<String>) -> Self {
        self.before = Some(timestamp.into());
        self
    }

    #[must_use]
    pub fn after(mut self, timestamp: impl Into<String>) -> Self {
        self.after = Some(timestamp.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build a filter from loosely-typed key/value pairs.
    ///
    /// Recognized keys are `serialNumber`, `projectName`, `before`, `after`
    /// and `limit`, in camelCase or snake_case. Anything else is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] if `limit` is not a non-negative integer.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            match key {
                "serialNumber" | "serial_number" => filter.serial_number = Some(value.into()),
                "projectName" | "project_name" => filter.project_name = Some(value.into()),
                "before" => filter.before = Some(value.into()),
                "after" => filter.after = Some(value.into()),
                "limit" => {
                    let value = value.into();
                    let limit = value.trim().parse().map_err(|_| Error::InvalidFilter {
                        key: key.to_string(),
                        value: value.clone(),
                    })?;
                    filter.limit = Some(limit);
                }
                _ => tracing::debug!(key, "Ignoring unrecognized filter key"),
            }
        }
        Ok(filter)
    }

    /// Column predicates in a fixed order, paired with their bound values.
    pub(crate) fn predicates(&self) -> Vec<(&'static str, &str)> {
        [
            ("serial_number = ?", self.serial_number.as_deref()),
            ("project_name = ?", self.project_name.as_deref()),
            ("timestamp <= ?", self.before.as_deref()),
            ("timestamp >= ?", self.after.as_deref()),
        ]
        .into_iter()
        .filter_map(|(predicate, value)| value.map(|v| (predicate, v)))
        .collect()
    }
}
