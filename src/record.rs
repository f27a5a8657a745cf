//! Raw waveform rows as read from the `tests` table.
//!
//! A [`WaveformRecord`] is one row: its labelled column values in column
//! order, plus the array payload split out of its BLOB column.

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use serde::Serialize;
use std::fmt;

/// A single SQLite cell, kept in its storage class.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl FieldValue {
    /// Storage class name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Raw bytes of a payload cell. Text is taken as its UTF-8 bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Blob(bytes) => bytes,
            Self::Text(s) => s.into_bytes(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<ValueRef<'_>> for FieldValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Real(f),
            ValueRef::Text(t) => Self::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Self::Blob(b.to_vec()),
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(i) => ToSqlOutput::from(*i),
            Self::Real(f) => ToSqlOutput::from(*f),
            Self::Text(s) => ToSqlOutput::from(s.as_str()),
            Self::Blob(b) => ToSqlOutput::from(b.as_slice()),
        })
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Real(f)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One raw waveform row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveformRecord {
    fields: Vec<(String, FieldValue)>,
    payload: Vec<u8>,
}

impl WaveformRecord {
    /// Create an empty record carrying the given encoded payload.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            fields: Vec::new(),
            payload,
        }
    }

    /// Builder-style [`WaveformRecord::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing any existing value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(index).1)
    }

    /// The grouping key value, if the row has one.
    pub fn test_id(&self) -> Option<&FieldValue> {
        self.get("test_id")
    }

    /// Labelled values in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn into_fields(self) -> Vec<(String, FieldValue)> {
        self.fields
    }

    /// The encoded array payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = WaveformRecord::new(vec![1, 2, 3])
            .with("test_id", "t-1")
            .with("score", 0.5);
        record.insert("test_id", "t-2");

        let names: Vec<&str> = record.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["test_id", "score"]);
        assert_eq!(record.test_id(), Some(&FieldValue::from("t-2")));
        assert_eq!(record.payload(), &[1, 2, 3]);
    }

    #[test]
    fn test_remove_missing_field() {
        let mut record = WaveformRecord::default().with("delay", 3i64);
        assert_eq!(record.remove("delay"), Some(FieldValue::Integer(3)));
        assert_eq!(record.remove("delay"), None);
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Null);
        assert_eq!(FieldValue::Integer(4).as_f64(), Some(4.0));
        assert_eq!(FieldValue::Real(4.5).as_i64(), None);
        assert_eq!(FieldValue::from(ValueRef::Text(b"abc")).as_str(), Some("abc"));
        assert_eq!(FieldValue::Blob(vec![0; 12]).to_string(), "<12 bytes>");
    }
}
