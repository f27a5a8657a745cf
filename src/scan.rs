//! Scan entities assembled from groups of waveform rows.
//!
//! A scan is one physical measurement. Its waveforms share a `test_id` and
//! repeat the same scan-level metadata on every row, so the metadata is read
//! from the first waveform and the per-waveform fields are dropped.

use ndarray::Array2;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::codec::ArrayCodec;
use crate::error::Result;
use crate::record::{FieldValue, WaveformRecord};

/// Per-waveform fields that never become scan attributes.
pub const WAVEFORM_FIELDS: [&str; 5] = [
    "delay",
    "measurement_id",
    "duration",
    "position_x",
    "position_y",
];

/// Row identity column; dropped without complaint when present.
const ROW_ID_FIELD: &str = "id";

/// Error type for waveform groups that cannot form a scan.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("cannot build a scan from an empty waveform group")]
    EmptyGroup,

    #[error("waveform record is missing field '{0}'")]
    MissingField(String),

    #[error("waveform {index} has {actual} samples, expected {expected}")]
    RaggedWaveforms {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("cannot assemble scan matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Typed view of the scan-level metadata shared by every waveform.
///
/// Every field is nullable. A field is `None` when the column is absent,
/// holds `NULL`, or holds a value of another storage class; the raw value is
/// still available through [`Scan::attribute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanMetadata {
    pub test_id: Option<String>,
    pub project_name: Option<String>,
    pub timestamp: Option<String>,
    pub exp_group: Option<String>,
    pub serial_number: Option<String>,
    pub sample_state: Option<String>,
    pub n_rows: Option<i64>,
    pub n_columns: Option<i64>,
    pub row_spacing: Option<f64>,
    pub col_spacing: Option<f64>,
    pub score: Option<f64>,
    pub sample_rate: Option<f64>,
}

impl ScanMetadata {
    /// Names of the typed metadata attributes.
    pub const FIELDS: [&'static str; 12] = [
        "test_id",
        "project_name",
        "timestamp",
        "exp_group",
        "serial_number",
        "sample_state",
        "n_rows",
        "n_columns",
        "row_spacing",
        "col_spacing",
        "score",
        "sample_rate",
    ];

    fn from_attributes(attributes: &BTreeMap<String, FieldValue>) -> Self {
        let text = |name: &str| attributes.get(name).and_then(as_text);
        let integer = |name: &str| attributes.get(name).and_then(as_integer);
        let real = |name: &str| attributes.get(name).and_then(FieldValue::as_f64);

        Self {
            test_id: text("test_id"),
            project_name: text("project_name"),
            timestamp: text("timestamp"),
            exp_group: text("exp_group"),
            serial_number: text("serial_number"),
            sample_state: text("sample_state"),
            n_rows: integer("n_rows"),
            n_columns: integer("n_columns"),
            row_spacing: real("row_spacing"),
            col_spacing: real("col_spacing"),
            score: real("score"),
            sample_rate: real("sample_rate"),
        }
    }
}

fn as_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

fn as_integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Integer(i) => Some(*i),
        FieldValue::Real(f) if f.fract() == 0.0 => Some(*f as i64),
        _ => None,
    }
}

/// One measurement: a matrix of waveform samples plus shared metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    data: Array2<f64>,
    metadata: ScanMetadata,
    attributes: BTreeMap<String, FieldValue>,
    extensions: BTreeMap<String, FieldValue>,
}

impl Scan {
    /// Build a scan from waveforms sharing one `test_id`.
    pub fn from_waveforms<C: ArrayCodec>(waveforms: Vec<WaveformRecord>, codec: &C) -> Result<Self> {
        Self::with_extensions(waveforms, codec, BTreeMap::new())
    }

    /// Build a scan and attach caller-supplied extension attributes.
    ///
    /// Each waveform's payload becomes one row of [`Scan::data`], in input
    /// order. The first waveform's remaining fields become the scan's
    /// attributes as stored, `NULL`s included, once the per-waveform fields in
    /// [`WAVEFORM_FIELDS`] are removed; every one of those must be present.
    /// Extensions shadow attributes of the same name in [`Scan::attribute`].
    ///
    /// # Errors
    ///
    /// [`Error::Decode`](crate::Error::Decode) if a payload cannot be decoded,
    /// [`Error::Construction`](crate::Error::Construction) if the group is
    /// empty, ragged, or missing a waveform-specific field.
    pub fn with_extensions<C: ArrayCodec>(
        waveforms: Vec<WaveformRecord>,
        codec: &C,
        extensions: BTreeMap<String, FieldValue>,
    ) -> Result<Self> {
        let mut waveforms = waveforms.into_iter();
        let mut first = waveforms.next().ok_or(ConstructionError::EmptyGroup)?;

        let head = codec.decode(first.payload())?;
        let width = head.len();
        let mut samples: Vec<f64> = head.iter().copied().collect();
        let mut rows = 1;

        for (index, waveform) in waveforms.enumerate() {
            let decoded = codec.decode(waveform.payload())?;
            if decoded.len() != width {
                return Err(ConstructionError::RaggedWaveforms {
                    index: index + 1,
                    expected: width,
                    actual: decoded.len(),
                }
                .into());
            }
            samples.extend(decoded.iter().copied());
            rows += 1;
        }

        let data = Array2::from_shape_vec((rows, width), samples)
            .map_err(ConstructionError::from)?;

        for field in WAVEFORM_FIELDS {
            if first.remove(field).is_none() {
                return Err(ConstructionError::MissingField(field.to_string()).into());
            }
        }
        first.remove(ROW_ID_FIELD);
        let attributes: BTreeMap<String, FieldValue> = first.into_fields().into_iter().collect();
        let metadata = ScanMetadata::from_attributes(&attributes);

        Ok(Self {
            data,
            metadata,
            attributes,
            extensions,
        })
    }

    /// Waveform samples, one row per waveform.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn metadata(&self) -> &ScanMetadata {
        &self.metadata
    }

    pub fn test_id(&self) -> Option<&str> {
        self.metadata.test_id.as_deref()
    }

    pub fn waveform_count(&self) -> usize {
        self.data.nrows()
    }

    pub fn samples_per_waveform(&self) -> usize {
        self.data.ncols()
    }

    pub fn extensions(&self) -> &BTreeMap<String, FieldValue> {
        &self.extensions
    }

    /// Every scan-level field as stored in the first waveform.
    pub fn attributes(&self) -> &BTreeMap<String, FieldValue> {
        &self.attributes
    }

    /// Attributes outside the known metadata set.
    pub fn extra_fields(&self) -> BTreeMap<&str, &FieldValue> {
        self.attributes
            .iter()
            .filter(|(name, _)| !ScanMetadata::FIELDS.contains(&name.as_str()))
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }

    /// Resolve an attribute: extensions first, then stored fields.
    pub fn attribute(&self, name: &str) -> Option<FieldValue> {
        self.extensions
            .get(name)
            .or_else(|| self.attributes.get(name))
            .cloned()
    }
}
