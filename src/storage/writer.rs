//! Waveform insert path.
//!
//! Used to seed databases; there is no update or delete path.

use rusqlite::types::ToSql;
use rusqlite::{params_from_iter, Connection};

use super::schema::{PAYLOAD_COLUMN, TABLE};
use crate::record::WaveformRecord;

/// Column names are interpolated, so they are restricted to identifiers.
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Insert one waveform row with an already-encoded payload.
///
/// Returns the new row id.
pub fn insert_waveform(
    conn: &Connection,
    record: &WaveformRecord,
    payload: &[u8],
) -> rusqlite::Result<i64> {
    let mut columns = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();
    for (name, value) in record.fields() {
        if !is_identifier(name) || name == PAYLOAD_COLUMN {
            return Err(rusqlite::Error::InvalidColumnName(name.to_string()));
        }
        columns.push(format!("\"{name}\""));
        values.push(value);
    }
    columns.push(format!("\"{PAYLOAD_COLUMN}\""));
    values.push(&payload);

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {TABLE} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );

    conn.execute(&sql, params_from_iter(values))?;
    Ok(conn.last_insert_rowid())
}
