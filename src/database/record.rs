use serde_json::{Map, Value};

/// A stored row as a JSON object. Every persisted record carries an integer `id`.
pub type Record = Map<String, Value>;

/// Fields only the server may set
pub const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
}

/// Accepts a request body, which must be a JSON object.
pub fn from_body(body: Value) -> Result<Record, RecordError> {
    match body {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Record::new()),
        other => Err(RecordError::InvalidJson(format!(
            "Expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Removes client-supplied system fields, returning their names.
pub fn strip_system_fields(record: &mut Record) -> Vec<&'static str> {
    SYSTEM_FIELDS.iter().copied().filter(|f| record.remove(*f).is_some()).collect()
}

pub fn record_id(record: &Record) -> Option<i64> {
    match record.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
