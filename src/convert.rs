//! JSON <-> Value conversion utilities

use crate::{
    error::{QueryError, SymbolError},
    value::{Record, Value},
};

pub(crate) fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Convert serde_json::Value to Value.
///
/// Objects become records. Arrays have no counterpart and are rejected with
/// the dotted `path` of the offending field.
pub fn json_to_value(v: serde_json::Value, path: &str) -> Result<Value, SymbolError> {
    match v {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Integer(i)),
            None => n.as_f64().map(Value::Float).ok_or(SymbolError::UnsupportedField {
                path: path.to_string(),
                kind: "number",
            }),
        },
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Object(obj) => json_to_record(obj, path).map(Value::from),
        other @ serde_json::Value::Array(_) => Err(SymbolError::UnsupportedField {
            path: path.to_string(),
            kind: json_kind(&other),
        }),
    }
}

/// Convert a JSON object into a record, converting nested objects recursively.
pub fn json_to_record(
    obj: serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<Record, SymbolError> {
    obj.into_iter()
        .map(|(k, v)| {
            let field_path = if path.is_empty() {
                k.clone()
            } else {
                format!("{}.{}", path, k)
            };
            json_to_value(v, &field_path).map(|v| (k, v))
        })
        .collect()
}

/// Convert Value to serde_json::Value.
///
/// Non-finite floats render as `null`; functions have no JSON form.
pub fn value_to_json(v: &Value) -> Result<serde_json::Value, QueryError> {
    Ok(match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Record(r) => serde_json::Value::Object(
            r.fields()
                .map(|(k, v)| Ok((k.to_string(), value_to_json(v)?)))
                .collect::<Result<_, QueryError>>()?,
        ),
        Value::Function(_) => return Err(QueryError::Unrepresentable("function")),
    })
}
