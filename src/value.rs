use serde::Serialize;
use serde_json::Value;

/// The type tag of a primitive JSON value, used to style grid cells and
/// graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Null,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        }
    }
}

/// Classifies a value as one of the primitive kinds, or `None` for objects
/// and arrays.
pub fn primitive_kind(value: &Value) -> Option<PrimitiveKind> {
    match value {
        Value::Null => Some(PrimitiveKind::Null),
        Value::Bool(_) => Some(PrimitiveKind::Boolean),
        Value::Number(_) => Some(PrimitiveKind::Number),
        Value::String(_) => Some(PrimitiveKind::String),
        Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// The canonical string form used by search matching and column filters:
/// primitives in their natural form (strings unquoted), composites as
/// compact JSON.
pub fn canonical_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| String::from("null"))
        }
    }
}

/// The display form for primitive values: strings quoted, everything else
/// in its natural form.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => canonical_string(other),
    }
}
