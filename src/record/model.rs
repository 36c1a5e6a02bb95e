//! Log record model.
//!
//! A record is a JSON object split in two: the base payload (message,
//! level, channel, context, ...) and the `extra` mapping that processors
//! write contextual metadata into.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{EnrichError, Result};

use super::keys::EXTRA;

/// A structured log record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(flatten)]
    payload: Map<String, Value>,

    #[serde(default, deserialize_with = "deserialize_extra")]
    extra: Map<String, Value>,
}

impl LogRecord {
    /// Build a record from a payload map, lifting any `extra` key out of it.
    pub fn new(mut payload: Map<String, Value>) -> Result<Self> {
        let extra = match payload.remove(EXTRA) {
            Some(value) => extra_from_value(value)?,
            None => Map::new(),
        };
        Ok(Self { payload, extra })
    }

    /// Decode a record from a JSON value. The value must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::new(map),
            other => Err(EnrichError::InvalidRecord(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Re-assemble the record as a single JSON object.
    pub fn into_value(self) -> Value {
        let mut map = self.payload;
        map.insert(EXTRA.to_string(), Value::Object(self.extra));
        Value::Object(map)
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn extra_value(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Write (or overwrite) a key under `extra`.
    pub fn set_extra(&mut self, key: &str, value: impl Into<Value>) {
        self.extra.insert(key.to_string(), value.into());
    }

    pub fn has_extra(&self, key: &str) -> bool {
        self.extra.contains_key(key)
    }
}

/// `extra` is absent, `null`, `[]` (an empty PHP array) or an object.
fn extra_from_value(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(EnrichError::InvalidRecord(format!(
            "`extra` must be an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn deserialize_extra<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    extra_from_value(value).map_err(serde::de::Error::custom)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
