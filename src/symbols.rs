//! Name-to-value bindings visible to expressions.

use std::collections::{HashMap, hash_map};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{
    convert::{json_kind, json_to_record, json_to_value},
    error::SymbolError,
    value::{FnResult, HostFn, Record, Value},
};

static FIELD_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name pattern is valid")
});

/// Builder-style symbol table.
///
/// Keys are unique and later writes overwrite earlier ones. Cloning is
/// shallow: records and functions are shared.
///
/// ```
/// use rulengine::{SymbolTable, Value};
///
/// let symbols = SymbolTable::new()
///     .with_int("default_len", 4)
///     .with_string("val", "test")
///     .with_function("len", |args| match args {
///         [Value::String(s)] => Ok(Value::Integer(s.len() as i64)),
///         _ => Err("len needs one string argument".into()),
///     });
///
/// assert_eq!(symbols.get("default_len"), Some(&Value::Integer(4)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    symbols: HashMap<String, Value>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_int(self, name: impl Into<String>, value: i64) -> Self {
        self.with_value(name, value)
    }

    pub fn with_ints<K: Into<String>>(mut self, values: impl IntoIterator<Item = (K, i64)>) -> Self {
        self.extend(values.into_iter().map(|(k, v)| (k.into(), Value::Integer(v))));
        self
    }

    pub fn with_float(self, name: impl Into<String>, value: f64) -> Self {
        self.with_value(name, value)
    }

    pub fn with_bool(self, name: impl Into<String>, value: bool) -> Self {
        self.with_value(name, value)
    }

    pub fn with_string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_value(name, Value::String(value.into()))
    }

    pub fn with_strings<K: Into<String>, V: Into<String>>(
        mut self,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.extend(values.into_iter().map(|(k, v)| (k.into(), Value::String(v.into()))));
        self
    }

    /// Binds a host function.
    pub fn with_function<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> FnResult + Send + Sync + 'static,
    {
        self.with_value(name, HostFn::new(f))
    }

    /// Binds a record and exposes each of its field names as a symbol bound
    /// to its own name, so `query.Field` style expressions can also refer to
    /// the bare field name.
    pub fn with_record(mut self, name: impl Into<String>, record: Record) -> Result<Self, SymbolError> {
        for field in record.field_names() {
            if !FIELD_NAME.is_match(field) {
                return Err(SymbolError::InvalidFieldName(field.to_string()));
            }
        }
        let names: Vec<String> = record.field_names().map(str::to_string).collect();
        self.insert(name, record);
        for field in names {
            self.insert(field.clone(), Value::String(field));
        }
        Ok(self)
    }

    /// Serializes `value` once into a record and binds it under `name`.
    ///
    /// The value must serialize to a map with identifier keys whose fields
    /// are scalars or nested structs; anything else fails here rather than
    /// at evaluation time.
    pub fn with_struct<T: Serialize + ?Sized>(self, name: impl Into<String>, value: &T) -> Result<Self, SymbolError> {
        let name = name.into();
        let json = serde_json::to_value(value).map_err(|e| SymbolError::Serialize {
            name: name.clone(),
            message: e.to_string(),
        })?;
        let record = match json {
            serde_json::Value::Object(obj) => json_to_record(obj, &name)?,
            other => {
                return Err(SymbolError::NotARecord {
                    name,
                    found: json_kind(&other),
                });
            }
        };
        self.with_record(name, record)
    }

    /// Builds a table from a JSON object; nested objects become records.
    pub fn from_json(json: serde_json::Value) -> Result<Self, SymbolError> {
        match json {
            serde_json::Value::Object(obj) => obj
                .into_iter()
                .map(|(k, v)| json_to_value(v, &k).map(|v| (k, v)))
                .collect(),
            other => Err(SymbolError::NotARecord {
                name: "params".into(),
                found: json_kind(&other),
            }),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.symbols.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.symbols.iter()
    }

    /// Copies every binding of `other` into `self`; `other` wins on conflict.
    pub fn append(&mut self, other: &SymbolTable) {
        self.extend(other.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Right-biased merge into a new table.
    pub fn merged(&self, other: &SymbolTable) -> SymbolTable {
        let mut merged = self.clone();
        merged.append(other);
        merged
    }
}

impl Extend<(String, Value)> for SymbolTable {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.symbols.extend(iter);
    }
}

impl FromIterator<(String, Value)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        SymbolTable {
            symbols: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SymbolTable {
    type Item = (String, Value);
    type IntoIter = hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
