//! Evaluation contexts.
//!
//! A context pairs a resolved symbol table with an operator table. The
//! operator table is the [`OperatorBackend`] implementation itself: one
//! method per operator kind, so the same tree means different things
//! depending on which context walks it.
//!
//! - [`ValueContext`] computes booleans, numbers and strings.
//! - [`QueryContext`] compiles comparisons on `query.<field>` into a
//!   boolean search query.
use std::fmt;

use crate::{ast::OpKind, error::EvalError, symbols::SymbolTable, value::Value};

pub mod query_context;
pub mod value_context;

pub use query_context::{QueryContext, QueryOperand};
pub use value_context::ValueContext;

/// Constants every context can resolve. They are merged after injected
/// symbols and therefore cannot be shadowed.
pub(crate) fn with_builtins(mut symbols: SymbolTable) -> SymbolTable {
    symbols.insert("true", true);
    symbols.insert("false", false);
    symbols
}

/// What flows between operators of a backend.
pub trait Operand: From<Value> + Clone + fmt::Debug {
    /// The plain value, when the operand is one.
    fn as_value(&self) -> Option<&Value>;
}

impl Operand for Value {
    fn as_value(&self) -> Option<&Value> {
        Some(self)
    }
}

fn take<T, const N: usize>(op: OpKind, operands: Vec<T>) -> Result<[T; N], EvalError> {
    let got = operands.len();
    operands.try_into().map_err(|_| {
        EvalError::type_error(format!(
            "invalid number of arguments for `{}`: expected {}, got {}",
            op, N, got
        ))
    })
}

/// Operator table of an evaluation context.
///
/// Every operator defaults to [`EvalError::UnsupportedOperator`]; a backend
/// overrides the ones it gives meaning to.
pub trait OperatorBackend {
    type Operand: Operand;

    /// Backend name used in error messages
    const NAME: &'static str;

    /// Resolves an identifier.
    fn lookup(&self, name: &str) -> Option<Self::Operand>;

    /// Returns the result of `op` when it is already decided by its left
    /// operand, so the right operand is never evaluated.
    fn short_circuit(&self, _op: OpKind, _lhs: &Self::Operand) -> Option<Self::Operand> {
        None
    }

    fn unsupported(&self, op: OpKind) -> EvalError {
        EvalError::UnsupportedOperator {
            op,
            backend: Self::NAME,
        }
    }

    fn logical_and(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::And))
    }

    fn logical_or(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Or))
    }

    fn equal(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Eq))
    }

    fn not_equal(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Ne))
    }

    fn less(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Lt))
    }

    fn less_equal(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Le))
    }

    fn greater(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Gt))
    }

    fn greater_equal(&self, _lhs: Self::Operand, _rhs: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Ge))
    }

    fn logical_not(&self, _operand: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Not))
    }

    fn negate(&self, _operand: Self::Operand) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Neg))
    }

    fn select(&self, _base: Self::Operand, _field: &str) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Select))
    }

    fn call(&self, _callee: Self::Operand, _args: Vec<Self::Operand>) -> Result<Self::Operand, EvalError> {
        Err(self.unsupported(OpKind::Call))
    }

    /// Hook for parenthesized groups; the identity unless overridden.
    fn paren(&self, inner: Self::Operand) -> Result<Self::Operand, EvalError> {
        Ok(inner)
    }

    /// Uniform entry point: applies `op` to `operands`.
    ///
    /// For [`OpKind::Select`] the second operand is the field name as a
    /// string value; for [`OpKind::Call`] the first operand is the callee.
    fn eval(&self, op: OpKind, operands: Vec<Self::Operand>) -> Result<Self::Operand, EvalError> {
        match op {
            OpKind::And => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.logical_and(l, r)
            }
            OpKind::Or => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.logical_or(l, r)
            }
            OpKind::Eq => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.equal(l, r)
            }
            OpKind::Ne => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.not_equal(l, r)
            }
            OpKind::Lt => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.less(l, r)
            }
            OpKind::Le => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.less_equal(l, r)
            }
            OpKind::Gt => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.greater(l, r)
            }
            OpKind::Ge => {
                let [l, r] = take::<_, 2>(op, operands)?;
                self.greater_equal(l, r)
            }
            OpKind::Not => {
                let [x] = take::<_, 1>(op, operands)?;
                self.logical_not(x)
            }
            OpKind::Neg => {
                let [x] = take::<_, 1>(op, operands)?;
                self.negate(x)
            }
            OpKind::Paren => {
                let [x] = take::<_, 1>(op, operands)?;
                self.paren(x)
            }
            OpKind::Select => {
                let [base, field] = take::<_, 2>(op, operands)?;
                let name = field
                    .as_value()
                    .and_then(Value::as_str)
                    .ok_or_else(|| EvalError::type_error("second argument is not a field name"))?
                    .to_string();
                self.select(base, &name)
            }
            OpKind::Call => {
                let mut operands = operands.into_iter();
                let callee = operands
                    .next()
                    .ok_or_else(|| EvalError::type_error("call without a callee"))?;
                self.call(callee, operands.collect())
            }
        }
    }
}
