//! SQLite storage layer for scanstore.
//!
//! Provides:
//! - Connection opening with WAL journaling
//! - Schema for the raw `tests` waveform table
//! - Parameterized query building from scan filters
//! - Row readers and the waveform insert path
//!
//! Every operation opens its own short-lived connection; nothing is pooled.

pub mod query;
pub mod reader;
pub mod schema;
pub mod writer;
