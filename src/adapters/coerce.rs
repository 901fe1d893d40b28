//! Best-effort casts from raw source values to a field's declared type.
//!
//! Every function here is total: a value that cannot be cast becomes `None`.

use crate::domain::model::{FieldType, Value};

/// Coerces a delimited-text cell. Empty cells are null for every type.
pub fn from_text(kind: FieldType, raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    match kind {
        FieldType::Text => Some(Value::Text(raw.to_string())),
        FieldType::Integer => raw.trim().parse::<i64>().ok().map(Value::Integer),
        FieldType::Float => parse_float(raw).map(Value::Float),
    }
}

pub fn from_json(kind: FieldType, raw: &serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;

    match (kind, raw) {
        (_, Json::Null) | (_, Json::Array(_)) | (_, Json::Object(_)) => None,
        (_, Json::String(s)) => from_text(kind, s),
        (FieldType::Text, Json::Number(n)) => Some(Value::Text(n.to_string())),
        (FieldType::Text, Json::Bool(b)) => Some(Value::Text(b.to_string())),
        (FieldType::Integer, Json::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(Value::Integer),
        (FieldType::Float, Json::Number(n)) => {
            n.as_f64().filter(|f| f.is_finite()).map(Value::Float)
        }
        (_, Json::Bool(_)) => None,
    }
}

/// Coerces the text of an XML leaf; `None` means the child element was absent.
///
/// Integers are accepted only when the text is made of ASCII digits, so signed
/// values (`-3`, `+3`) and padded text come out null.
pub fn from_xml_text(kind: FieldType, text: Option<&str>) -> Option<Value> {
    let text = text?;
    match kind {
        FieldType::Text => {
            if text.is_empty() {
                None
            } else {
                Some(Value::Text(text.to_string()))
            }
        }
        FieldType::Integer => {
            if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                text.parse::<i64>().ok().map(Value::Integer)
            } else {
                None
            }
        }
        FieldType::Float => parse_float(text).map(Value::Float),
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}
