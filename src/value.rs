use std::{collections::BTreeMap, fmt, sync::Arc};

/// Result type returned by host-injected functions.
pub type FnResult = Result<Value, Box<dyn std::error::Error + Send + Sync>>;

/// A dynamically typed value visible to rule expressions.
///
/// The set of variants is closed: every operator matches on it
/// exhaustively, so there is no "unknown type" at evaluation time.
///
/// # Examples
///
/// ```
/// use rulengine::{Record, Value};
///
/// let age = Value::Integer(42);
/// let ratio = Value::Float(0.5);
/// let name = Value::from("alice");
/// let user = Value::from(Record::new().with_field("Age", 42));
///
/// assert_eq!(user.type_name(), "record");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Struct-like record with named fields
    Record(Arc<Record>),

    /// Host-injected function
    Function(HostFn),
}

impl Value {
    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer; only the integer family converts
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as float; integers widen
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Record(r) => {
                write!(f, "{{")?;
                for (i, (name, value)) in r.fields().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(_) => write!(f, "<function>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(Arc::new(r))
    }
}

impl From<HostFn> for Value {
    fn from(f: HostFn) -> Self {
        Value::Function(f)
    }
}

/// Field table of a struct-like value.
///
/// Built once when the record is injected; selecting a field is a map
/// lookup by exact name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

/// A function injected by the host.
///
/// Receives the already-evaluated arguments, left to right. Two `HostFn`s
/// are equal only when they share the same underlying closure.
#[derive(Clone)]
pub struct HostFn(Arc<dyn Fn(&[Value]) -> FnResult + Send + Sync>);

impl HostFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> FnResult + Send + Sync + 'static,
    {
        HostFn(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> FnResult {
        (self.0)(args)
    }
}

impl PartialEq for HostFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostFn(..)")
    }
}
