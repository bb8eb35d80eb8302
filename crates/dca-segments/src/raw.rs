//! Raw, unvalidated segment input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::SegmentRecord;

/// Field values as read from storage or an editor, before validation.
///
/// Lookups are lenient: numbers and numeric strings are accepted, anything
/// else (including non-finite values) reads as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSegment(Map<String, Value>);

impl RawSegment {
    /// Creates an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an arbitrary JSON value; non-objects read as empty input.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Parses JSON text; malformed text reads as empty input.
    #[must_use]
    pub fn from_json_str(input: &str) -> Self {
        serde_json::from_str(input).map_or_else(
            |err| {
                log::debug!("raw segment is not valid JSON, treating as empty: {err}");
                Self::default()
            },
            Self::from_value,
        )
    }

    /// Sets a field.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a field in place.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Returns a field as a finite number.
    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        let value = match self.0.get(key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// The variant tag, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// The underlying map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RawSegment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<&SegmentRecord> for RawSegment {
    fn from(record: &SegmentRecord) -> Self {
        // Records hold plain numbers, which always serialize to an object
        serde_json::to_value(record).map_or_else(|_| Self::default(), Self::from_value)
    }
}
