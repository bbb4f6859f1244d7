//! JSON output for values and rule results.
//!
//! Records render as JSON objects with their keys sorted, so output is
//! deterministic. Functions have no JSON form and are rejected.
//!
//! # Examples
//!
//! ```
//! use rulengine::{Record, Value};
//! use rulengine::output::{to_json, to_json_pretty};
//!
//! let user = Value::from(Record::new().with_field("name", "Alice").with_field("age", 30));
//!
//! assert_eq!(to_json(&user).unwrap(), r#"{"age":30,"name":"Alice"}"#);
//! assert_eq!(to_json_pretty(&Value::Integer(42)).unwrap(), "42");
//! ```

use crate::{convert::value_to_json, error::QueryError, value::Value};

/// Converts a Value to compact JSON.
pub fn to_json(value: &Value) -> Result<String, QueryError> {
    value_to_json(value).map(|json| json.to_string())
}

/// Converts a Value to JSON with 2-space indentation, one field per line.
pub fn to_json_pretty(value: &Value) -> Result<String, QueryError> {
    value_to_json(value).map(|json| format!("{:#}", json))
}
