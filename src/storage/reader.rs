//! Row readers for the waveform table.
//!
//! Result sets are fully materialized before returning; no statement or
//! cursor outlives the call.

use rusqlite::{params_from_iter, Connection, Row, Statement};
use serde::Serialize;

use super::query::{self, WaveformQuery};
use super::schema::{ARRAY_TYPE, PAYLOAD_COLUMN};
use crate::record::{FieldValue, WaveformRecord};

/// Number of raw waveform rows recorded under one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCount {
    pub project_name: Option<String>,
    pub waveforms: i64,
}

/// Column layout of a `SELECT *` statement.
struct Columns {
    names: Vec<String>,
    payload: Option<usize>,
}

impl Columns {
    fn of(stmt: &Statement<'_>) -> Self {
        let columns = stmt.columns();
        let payload = columns
            .iter()
            .position(|c| {
                c.decl_type()
                    .is_some_and(|t| t.eq_ignore_ascii_case(ARRAY_TYPE))
            })
            .or_else(|| columns.iter().position(|c| c.name() == PAYLOAD_COLUMN));
        let names = columns.iter().map(|c| c.name().to_string()).collect();
        Self { names, payload }
    }

    fn record(&self, row: &Row<'_>) -> rusqlite::Result<WaveformRecord> {
        let mut record = WaveformRecord::default();
        for (index, name) in self.names.iter().enumerate() {
            let value = FieldValue::from(row.get_ref(index)?);
            if Some(index) == self.payload {
                record.set_payload(value.into_bytes());
            } else {
                record.insert(name.as_str(), value);
            }
        }
        Ok(record)
    }
}

/// Run a waveform query and return every matching row.
pub fn read_waveforms(
    conn: &Connection,
    query: &WaveformQuery,
) -> rusqlite::Result<Vec<WaveformRecord>> {
    let mut stmt = conn.prepare(&query.sql)?;
    let columns = Columns::of(&stmt);
    if columns.payload.is_none() {
        tracing::debug!("No payload column found; waveforms will carry empty payloads");
    }

    let rows = stmt
        .query_map(params_from_iter(query.params.iter()), |row| {
            columns.record(row)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// First `limit` rows in storage order.
pub fn sample_waveforms(conn: &Connection, limit: usize) -> rusqlite::Result<Vec<WaveformRecord>> {
    let mut stmt = conn.prepare(&query::sample_rows())?;
    let columns = Columns::of(&stmt);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map([limit], |row| columns.record(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Raw row counts grouped by project name.
pub fn count_by_project(conn: &Connection) -> rusqlite::Result<Vec<ProjectCount>> {
    let mut stmt = conn.prepare(&query::count_by_project())?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ProjectCount {
                project_name: row.get(0)?,
                waveforms: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Total number of raw rows.
pub fn count_rows(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(&query::count_rows(), [], |row| row.get(0))
}
