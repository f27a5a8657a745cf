//! Array payload codecs.
//!
//! Waveform samples are stored in a single BLOB column. A codec turns an
//! n-dimensional `f64` array into a self-describing byte buffer (shape and
//! element type travel with the data) and reconstructs it on read.
//!
//! The codec is handed to [`ScanRepository`](crate::repository::ScanRepository)
//! explicitly; nothing is registered with the SQLite driver.

mod npy;

pub use npy::NpyCodec;

use ndarray::{ArrayD, ArrayViewD};
use thiserror::Error;

/// Error type for payloads that cannot be turned back into an array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed array payload: {0}")]
    Malformed(String),

    #[error("unsupported element type: {0}")]
    UnsupportedDtype(String),
}

/// Error type for arrays the codec cannot serialize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot encode array: {0}")]
pub struct EncodeError(pub String);

/// Lossless conversion between numeric arrays and storable byte blobs.
///
/// Implementations must satisfy `decode(&encode(x)?) == x` in both shape and
/// values for every finite array, including empty and single-element arrays.
pub trait ArrayCodec {
    /// Serialize an array of any shape into a self-describing buffer.
    fn encode(&self, array: ArrayViewD<'_, f64>) -> Result<Vec<u8>, EncodeError>;

    /// Reconstruct an array from a buffer produced by [`ArrayCodec::encode`].
    fn decode(&self, bytes: &[u8]) -> Result<ArrayD<f64>, DecodeError>;
}

impl<C: ArrayCodec + ?Sized> ArrayCodec for &C {
    fn encode(&self, array: ArrayViewD<'_, f64>) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(array)
    }

    fn decode(&self, bytes: &[u8]) -> Result<ArrayD<f64>, DecodeError> {
        (**self).decode(bytes)
    }
}
