//! Compile a rule expression into a search query document

use super::{CliError, params_from_json};
use crate::compile_query;

/// Options for the query command
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// The expression to compile, fields are addressed as `<root>.<field>`
    pub expr: String,
    /// JSON object whose keys become symbols
    pub params: Option<String>,
}

/// Compiles the expression and renders the query source.
pub fn execute_query(options: &QueryOptions) -> Result<serde_json::Value, CliError> {
    let symbols = params_from_json(options.params.as_deref())?;
    let query = compile_query(&options.expr, &symbols)?;
    query.to_query_source().map_err(|e| CliError::Rule(e.into()))
}
