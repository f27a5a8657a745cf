//! scanstore: a local data-access layer for laboratory scan records.
//!
//! Raw waveform readings live one per row in a SQLite table. A scan is the
//! set of waveforms sharing a `test_id`; this crate groups those rows back
//! into [`Scan`] entities with a sample matrix and shared metadata.
//!
//! # Architecture
//!
//! - **Explicit codec**: array payloads go through an [`ArrayCodec`] handed
//!   to the repository, by default the NumPy `.npy` format
//! - **Bound parameters**: filter values are never spliced into SQL
//! - **Deterministic grouping**: scans come back in first-seen `test_id` order
//! - **Short-lived connections**: each call opens and closes its own
//!
//! # Modules
//!
//! - [`codec`]: Array payload encoding
//! - [`config`]: CLI and environment configuration
//! - [`error`]: Error taxonomy
//! - [`filter`]: Retrieval filters
//! - [`observability`]: Tracing setup
//! - [`record`]: Raw waveform rows
//! - [`repository`]: Scan retrieval and counting
//! - [`scan`]: Scan entities and their construction
//! - [`storage`]: SQLite persistence layer

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // scan::ScanMetadata is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes, // r#""# is fine for SQL
    clippy::cast_precision_loss,        // i64 samples widen to f64
    clippy::cast_possible_truncation    // Integral reals narrow to i64
)]

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod observability;
pub mod record;
pub mod repository;
pub mod scan;
pub mod storage;

pub use codec::{ArrayCodec, DecodeError, EncodeError, NpyCodec};
pub use error::{Error, Result};
pub use filter::ScanFilter;
pub use record::{FieldValue, WaveformRecord};
pub use repository::ScanRepository;
pub use scan::{ConstructionError, Scan, ScanMetadata};
pub use storage::reader::ProjectCount;
