//! SQL text for waveform retrieval.
//!
//! Filter values are always bound as parameters, never spliced into the
//! statement text.

use crate::filter::ScanFilter;

use super::schema::TABLE;

/// A statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Build the single read query for a filter.
///
/// Rows come back in storage order so grouping is deterministic. `limit`
/// is not part of the statement; it counts scans, not rows.
pub fn select_waveforms(filter: &ScanFilter) -> WaveformQuery {
    let predicates = filter.predicates();

    let mut sql = format!("SELECT * FROM {TABLE}");
    if !predicates.is_empty() {
        let clauses: Vec<&str> = predicates.iter().map(|(clause, _)| *clause).collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY rowid");

    WaveformQuery {
        sql,
        params: predicates.into_iter().map(|(_, v)| v.to_string()).collect(),
    }
}

/// Per-project raw row counts.
pub fn count_by_project() -> String {
    format!("SELECT project_name, COUNT(*) FROM {TABLE} GROUP BY project_name")
}

/// Total raw row count.
pub fn count_rows() -> String {
    format!("SELECT COUNT(*) FROM {TABLE}")
}

/// First rows in storage order.
pub fn sample_rows() -> String {
    format!("SELECT * FROM {TABLE} ORDER BY rowid LIMIT ?1")
}
