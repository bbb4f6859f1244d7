pub mod ast;
pub mod context;
pub mod convert;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod query;
pub mod symbols;
pub mod value;
pub mod workflow;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{BinOp, Expr, Literal, OpKind, Token, UnaryOp};
pub use context::{OperatorBackend, QueryContext, QueryOperand, ValueContext};
pub use engine::RuleEngine;
pub use error::{EngineError, Error, EvalError, QueryError, Result, SymbolError, SyntaxError};
pub use evaluator::{Evaluator, evaluate};
pub use lexer::Lexer;
pub use output::{to_json, to_json_pretty};
pub use parser::{Parser, parse};
pub use query::{BoolQuery, FieldRef, Occur, Query};
pub use symbols::SymbolTable;
pub use value::{FnResult, HostFn, Record, Value};
pub use workflow::{Rule, RuleResult, RuleType, Workflow};

/// Parses `expr` and evaluates it against `symbols` in a value context.
///
/// ```
/// use rulengine::{SymbolTable, Value, eval_str};
///
/// let symbols = SymbolTable::new().with_int("a", 5);
/// assert_eq!(eval_str("a > 3 && a <= 5", &symbols).unwrap(), Value::Boolean(true));
/// ```
pub fn eval_str(expr: &str, symbols: &SymbolTable) -> Result<Value> {
    let tree = parse(expr)?;
    let ctx = ValueContext::new(symbols.clone());
    Ok(evaluate(&tree, &ctx)?)
}

/// Parses `expr` and compiles it into a search query.
///
/// Fails with [`EvalError::Type`] when the expression folds into a plain
/// value instead of a query.
pub fn compile_query(expr: &str, symbols: &SymbolTable) -> Result<Query> {
    let tree = parse(expr)?;
    let ctx = QueryContext::new(symbols.clone());
    match evaluate(&tree, &ctx)? {
        QueryOperand::Query(query) => Ok(query),
        other => Err(EvalError::Type(format!("expression `{}` did not compile to a query: {:?}", expr, other)).into()),
    }
}
