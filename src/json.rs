//! JSON documents as filterable records.
//!
//! Objects expose their members as attributes, arrays become repeated
//! fields, and `null` reads as an absent attribute.

use serde_json::{Map, Value as JsonValue};

use crate::value::{Attribute, Record, Value};

/// Convert a JSON value to the attribute it represents
///
/// Numbers outside the `i64` range become floats, matching how the lexer
/// reads integer literals of the same size.
pub fn json_to_attribute(v: &JsonValue) -> Attribute<'_> {
    match v {
        JsonValue::Null => Attribute::Absent,
        JsonValue::Bool(b) => Attribute::Scalar(Value::Boolean(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Attribute::Scalar(Value::Integer(i)),
            None => n
                .as_f64()
                .map(|f| Attribute::Scalar(Value::Float(f)))
                .unwrap_or(Attribute::Absent),
        },
        JsonValue::String(s) => Attribute::Scalar(Value::String(s.clone())),
        JsonValue::Array(items) => Attribute::sequence(items.iter().map(json_to_attribute)),
        JsonValue::Object(_) => Attribute::Nested(v),
    }
}

impl Record for JsonValue {
    fn attribute(&self, name: &str) -> Attribute<'_> {
        match self {
            JsonValue::Object(map) => map.attribute(name),
            _ => Attribute::Absent,
        }
    }

    fn attribute_names(&self) -> Vec<&str> {
        match self {
            JsonValue::Object(map) => map.attribute_names(),
            _ => Vec::new(),
        }
    }
}

impl Record for Map<String, JsonValue> {
    fn attribute(&self, name: &str) -> Attribute<'_> {
        self.get(name).map_or(Attribute::Absent, json_to_attribute)
    }

    fn attribute_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

/// Reads records from JSON text: a single object, an array of objects, or a
/// stream of whitespace-separated values such as JSON lines.
pub fn records_from_str(input: &str) -> Result<Vec<JsonValue>, serde_json::Error> {
    let mut records = Vec::new();
    for value in serde_json::Deserializer::from_str(input).into_iter::<JsonValue>() {
        match value? {
            JsonValue::Array(items) => records.extend(items),
            other => records.push(other),
        }
    }
    Ok(records)
}
