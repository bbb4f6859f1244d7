use tracing::trace;

use crate::{
    ast::{Expr, Literal, OpKind},
    context::OperatorBackend,
    error::EvalError,
    value::Value,
};

/// Tree-walking evaluator, generic over the evaluation context.
///
/// The walker only decides evaluation order; every operator is delegated to
/// the context. Children are evaluated left to right and a binary node
/// consults [`OperatorBackend::short_circuit`] before touching its right
/// operand.
///
/// # Examples
///
/// ```
/// use rulengine::{Evaluator, SymbolTable, Value, ValueContext, parse};
///
/// let ctx = ValueContext::new(SymbolTable::new().with_int("age", 30));
/// let expr = parse("age >= 18 && !false").unwrap();
/// assert_eq!(Evaluator::new(&ctx).eval(&expr), Ok(Value::Boolean(true)));
/// ```
pub struct Evaluator<'a, B: OperatorBackend> {
    context: &'a B,
}

impl<'a, B: OperatorBackend> Evaluator<'a, B> {
    pub fn new(context: &'a B) -> Self {
        Evaluator { context }
    }

    pub fn context(&self) -> &B {
        self.context
    }

    /// Evaluates `expr` to a single operand of the context.
    pub fn eval(&self, expr: &Expr) -> Result<B::Operand, EvalError> {
        match expr {
            Expr::Literal(lit) => Ok(B::Operand::from(literal_value(lit))),
            Expr::Identifier(name) => self
                .context
                .lookup(name)
                .ok_or_else(|| EvalError::UnknownSymbol(name.clone())),
            Expr::BinaryOp { op, left, right } => {
                let op = OpKind::from(*op);
                let lhs = self.eval(left)?;
                if let Some(result) = self.context.short_circuit(op, &lhs) {
                    trace!(%op, "short-circuited");
                    return Ok(result);
                }
                let rhs = self.eval(right)?;
                self.context.eval(op, vec![lhs, rhs])
            }
            Expr::UnaryOp { op, operand } => {
                let value = self.eval(operand)?;
                self.context.eval(OpKind::from(*op), vec![value])
            }
            Expr::Selector { base, field } => {
                let base = self.eval(base)?;
                let field = B::Operand::from(Value::String(field.clone()));
                self.context.eval(OpKind::Select, vec![base, field])
            }
            Expr::Call { callee, args } => {
                let mut operands = Vec::with_capacity(args.len() + 1);
                operands.push(self.eval(callee)?);
                for arg in args {
                    operands.push(self.eval(arg)?);
                }
                self.context.eval(OpKind::Call, operands)
            }
            Expr::Paren(inner) => {
                let value = self.eval(inner)?;
                self.context.eval(OpKind::Paren, vec![value])
            }
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
    }
}

/// Evaluates `expr` against `context`.
pub fn evaluate<B: OperatorBackend>(expr: &Expr, context: &B) -> Result<B::Operand, EvalError> {
    Evaluator::new(context).eval(expr)
}
