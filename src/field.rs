use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

/// A named value attached to a log record.
///
/// Keys that collide with the record's own keys are written under a
/// `fields.` prefix rather than replacing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: Cow<'static, str>,
    value: Value,
}

impl Field {
    /// Create a field from any value convertible to JSON.
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// String-valued field.
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    /// Signed integer field.
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, value)
    }

    /// Unsigned integer field.
    pub fn uint(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, value)
    }

    /// Floating point field. Non-finite values are recorded as `null`.
    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, value)
    }

    /// Boolean field.
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, value)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Renders a chain of field slices as one JSON object.
///
/// Later slices win on duplicate keys. The layer parses this text back into
/// the record, which lets dynamic keys cross tracing's static field sets.
pub(crate) struct FieldsJson<'a>(pub(crate) &'a [&'a [Field]]);

impl FieldsJson<'_> {
    pub(crate) fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for field in self.0.iter().flat_map(|fields| fields.iter()) {
            map.insert(field.key.to_string(), field.value.clone());
        }
        map
    }
}

impl fmt::Display for FieldsJson<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.to_map()) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("{}"),
        }
    }
}
