//! Connection setup and table layout.

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Table holding one row per waveform.
pub const TABLE: &str = "tests";

/// Declared column type marking the array payload column.
pub const ARRAY_TYPE: &str = "ARRAY";

/// Payload column name, used when no column is declared as [`ARRAY_TYPE`].
pub const PAYLOAD_COLUMN: &str = "data";

const CREATE_TESTS: &str = r#"
CREATE TABLE IF NOT EXISTS tests (
    id             INTEGER PRIMARY KEY,
    test_id        TEXT NOT NULL,
    project_name   TEXT,
    serial_number  TEXT,
    timestamp      TEXT,
    exp_group      TEXT,
    sample_state   TEXT,
    n_rows         INTEGER,
    n_columns      INTEGER,
    row_spacing    REAL,
    col_spacing    REAL,
    score          REAL,
    sample_rate    REAL,
    delay          REAL,
    measurement_id INTEGER,
    duration       REAL,
    position_x     REAL,
    position_y     REAL,
    data           ARRAY
);
CREATE INDEX IF NOT EXISTS idx_tests_test_id ON tests(test_id);
"#;

/// Apply connection pragmas.
///
/// Switches the database to WAL journaling. The mode is persistent in the
/// file, so re-applying it on every connection is cheap.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "wal", |row| row.get(0))?;
    tracing::trace!(journal_mode = %mode, "Applied connection pragmas");
    Ok(())
}

/// Create the waveform table and its grouping index if absent.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TESTS)
}

/// Open an existing database file for reading.
///
/// Fails instead of creating an empty file when `path` does not exist.
pub fn open_existing<P: AsRef<Path>>(path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

/// Open a database file, creating it if needed.
pub fn open_or_create<P: AsRef<Path>>(path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    apply_pragmas(&conn)?;
    Ok(conn)
}
