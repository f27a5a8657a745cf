//! Error taxonomy for scan retrieval.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};
use crate::scan::ConstructionError;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The store is unreachable, locked, or corrupt.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// An array payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An array could not be serialized for storage.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// A waveform group could not be turned into a scan.
    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// A recognized filter key carried an unusable value.
    #[error("invalid value for filter '{key}': {value}")]
    InvalidFilter { key: String, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
