use crate::{
    ast::OpKind,
    context::{OperatorBackend, with_builtins},
    error::EvalError,
    symbols::SymbolTable,
    value::Value,
};

/// Tolerance used by float relational operators.
pub const FLOAT_EPSILON: f64 = 1e-6;

/// Context with arithmetic/boolean semantics.
#[derive(Debug, Clone)]
pub struct ValueContext {
    symbols: SymbolTable,
}

impl ValueContext {
    pub fn new(injected: SymbolTable) -> Self {
        ValueContext {
            symbols: with_builtins(injected),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

impl Default for ValueContext {
    fn default() -> Self {
        Self::new(SymbolTable::new())
    }
}

fn expect_bool(value: &Value, position: &str, op: OpKind) -> Result<bool, EvalError> {
    value.as_bool().ok_or_else(|| {
        EvalError::type_error(format!(
            "{} argument of `{}` is not a bool: {}",
            position,
            op,
            value.type_name()
        ))
    })
}

/// Conversion rank used by mixed-type equality: the operand with the lower
/// rank is converted to the type of the other one.
fn numeric_rank(value: &Value) -> u8 {
    match value {
        Value::Integer(_) => 1,
        Value::Float(_) => 2,
        _ => 3,
    }
}

fn convert_to(value: &Value, target: &Value) -> Option<Value> {
    match (value, target) {
        (Value::Integer(n), Value::Float(_)) => Some(Value::Float(*n as f64)),
        _ => None,
    }
}

fn not_comparable(x: &Value, y: &Value) -> EvalError {
    EvalError::type_error(format!(
        "type {} and {} is not comparable",
        x.type_name(),
        y.type_name()
    ))
}

/// Equality with the cross-type conversion rules of the value backend.
pub(crate) fn values_equal(x: &Value, y: &Value) -> Result<bool, EvalError> {
    if x == y {
        return Ok(true);
    }

    for v in [x, y] {
        if let Value::Function(_) = v {
            return Err(EvalError::type_error("type function is not comparable"));
        }
    }

    if std::mem::discriminant(x) == std::mem::discriminant(y) {
        return Ok(false);
    }

    if matches!(x, Value::String(_)) || matches!(y, Value::String(_)) {
        return Err(not_comparable(x, y));
    }

    let converted = if numeric_rank(x) >= numeric_rank(y) {
        convert_to(y, x).map(|y| y == *x)
    } else {
        convert_to(x, y).map(|x| x == *y)
    };
    converted.ok_or_else(|| not_comparable(x, y))
}

/// Relational comparison: exact on integers, epsilon-tolerant on floats.
///
/// The float forms are `x - y < ε` (`<`), `x - y <= ε` (`<=`), `y - x < ε`
/// (`>`) and `y - x <= ε` (`>=`); within ε of each other two floats are
/// both "less" and "greater".
pub(crate) fn compare(op: OpKind, x: &Value, y: &Value) -> Result<bool, EvalError> {
    if let (Some(a), Some(b)) = (x.as_int(), y.as_int()) {
        return Ok(match op {
            OpKind::Lt => a < b,
            OpKind::Le => a <= b,
            OpKind::Gt => a > b,
            OpKind::Ge => a >= b,
            _ => return Err(EvalError::type_error(format!("`{}` is not a comparison", op))),
        });
    }

    if let (Some(a), Some(b)) = (x.as_float(), y.as_float()) {
        return Ok(match op {
            OpKind::Lt => a - b < FLOAT_EPSILON,
            OpKind::Le => a - b <= FLOAT_EPSILON,
            OpKind::Gt => b - a < FLOAT_EPSILON,
            OpKind::Ge => b - a <= FLOAT_EPSILON,
            _ => return Err(EvalError::type_error(format!("`{}` is not a comparison", op))),
        });
    }

    Err(EvalError::type_error(format!(
        "invalid type for comparing: {} {} {}",
        x.type_name(),
        op,
        y.type_name()
    )))
}

/// Field lookup on a record by exact name.
pub(crate) fn select_field(base: &Value, field: &str) -> Result<Value, EvalError> {
    match base {
        Value::Record(record) => record
            .get(field)
            .cloned()
            .ok_or_else(|| EvalError::type_error(format!("record has no field `{}`", field))),
        Value::Null => Err(EvalError::type_error(format!("cannot select `{}` from null", field))),
        other => Err(EvalError::type_error(format!(
            "cannot select `{}` from {}",
            field,
            other.type_name()
        ))),
    }
}

pub(crate) fn call_function(callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match callee {
        Value::Function(f) => f.call(args).map_err(|e| EvalError::Function(e.to_string())),
        other => Err(EvalError::type_error(format!(
            "injected value {} is not a function",
            other.type_name()
        ))),
    }
}

impl OperatorBackend for ValueContext {
    type Operand = Value;

    const NAME: &'static str = "value";

    fn lookup(&self, name: &str) -> Option<Value> {
        self.symbols.get(name).cloned()
    }

    fn short_circuit(&self, op: OpKind, lhs: &Value) -> Option<Value> {
        match (op, lhs) {
            (OpKind::And, Value::Boolean(false)) => Some(Value::Boolean(false)),
            _ => None,
        }
    }

    fn logical_and(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        if !expect_bool(&lhs, "first", OpKind::And)? {
            return Ok(Value::Boolean(false));
        }
        expect_bool(&rhs, "second", OpKind::And).map(Value::Boolean)
    }

    fn logical_or(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        let l = expect_bool(&lhs, "first", OpKind::Or)?;
        let r = expect_bool(&rhs, "second", OpKind::Or)?;
        Ok(Value::Boolean(l || r))
    }

    fn equal(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        values_equal(&lhs, &rhs).map(Value::Boolean)
    }

    fn not_equal(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        values_equal(&lhs, &rhs).map(|eq| Value::Boolean(!eq))
    }

    fn less(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        compare(OpKind::Lt, &lhs, &rhs).map(Value::Boolean)
    }

    fn less_equal(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        compare(OpKind::Le, &lhs, &rhs).map(Value::Boolean)
    }

    fn greater(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        compare(OpKind::Gt, &lhs, &rhs).map(Value::Boolean)
    }

    fn greater_equal(&self, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        compare(OpKind::Ge, &lhs, &rhs).map(Value::Boolean)
    }

    fn logical_not(&self, operand: Value) -> Result<Value, EvalError> {
        expect_bool(&operand, "first", OpKind::Not).map(|b| Value::Boolean(!b))
    }

    fn negate(&self, operand: Value) -> Result<Value, EvalError> {
        let n = operand.as_int().ok_or_else(|| {
            EvalError::type_error(format!("first argument of `-` is not an integer: {}", operand.type_name()))
        })?;
        n.checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| EvalError::type_error(format!("negating {} overflows", n)))
    }

    fn select(&self, base: Value, field: &str) -> Result<Value, EvalError> {
        select_field(&base, field)
    }

    fn call(&self, callee: Value, args: Vec<Value>) -> Result<Value, EvalError> {
        call_function(&callee, &args)
    }
}
