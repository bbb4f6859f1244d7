//! Error taxonomy for parsing, evaluation, symbol injection and rule execution.

use std::ops::Range;

use thiserror::Error;

use crate::ast::OpKind;

/// Parse-time failure. `span` is a byte range into the expression source.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} at [{}, {})", .span.start, .span.end)]
pub struct SyntaxError {
    pub span: Range<usize>,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Range<usize>, message: impl Into<String>) -> Self {
        SyntaxError {
            span,
            message: message.into(),
        }
    }
}

/// Errors raised while walking an expression against a context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Identifier not bound in the symbol table
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    /// Operand type mismatch, non-comparable types or wrong arity
    #[error("type error: {0}")]
    Type(String),

    /// The active backend has no implementation for the operator
    #[error("operator `{op}` is not supported by the {backend} context")]
    UnsupportedOperator { op: OpKind, backend: &'static str },

    /// A host-injected function returned an error
    #[error("host function failed: {0}")]
    Function(String),
}

impl EvalError {
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        EvalError::Type(message.into())
    }
}

/// Errors raised eagerly by the [`SymbolTable`](crate::SymbolTable) builder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("`{name}` cannot be injected as a struct: expected a record, found {found}")]
    NotARecord { name: String, found: &'static str },

    #[error("field `{path}` has unsupported type {kind}")]
    UnsupportedField { path: String, kind: &'static str },

    #[error("`{0}` is not a valid field name")]
    InvalidFieldName(String),

    #[error("failed to serialize `{name}`: {message}")]
    Serialize { name: String, message: String },
}

/// Failure to render a compiled query into a query document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("a {0} cannot be used as a query term value")]
    Unrepresentable(&'static str),
}

/// Errors surfaced by [`RuleEngine`](crate::RuleEngine).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("workflow `{0}` not found")]
    WorkflowNotFound(String),

    #[error("fail to compile rule expression, key={workflow}:{rule}")]
    ExpressionCompile {
        workflow: String,
        rule: String,
        #[source]
        source: SyntaxError,
    },
}

/// Any error produced by this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
