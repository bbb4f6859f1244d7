//! Evaluate a rule expression against JSON parameters

use super::{CliError, params_from_json};
use crate::{Lexer, Parser, Value, ValueContext, evaluate};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The rule expression to evaluate
    pub expr: String,
    /// JSON object whose keys become symbols
    pub params: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
}

/// Result of an eval operation
#[derive(Debug)]
pub enum EvalResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Expression evaluated to a value
    Success(Value),
}

/// Execute an eval operation
pub fn execute_eval(options: &EvalOptions) -> Result<EvalResult, CliError> {
    let lexer = Lexer::new(&options.expr);
    let mut parser = Parser::new(lexer)?;
    let expr = parser.parse()?;

    if options.syntax_only {
        return Ok(EvalResult::SyntaxValid);
    }

    let symbols = params_from_json(options.params.as_deref())?;
    let ctx = ValueContext::new(symbols);
    let value = evaluate(&expr, &ctx).map_err(|e| CliError::Rule(e.into()))?;
    Ok(EvalResult::Success(value))
}
