//! CLI support for rulengine
//!
//! The subcommands are plain functions over option structs so they can be
//! driven from tests or embedded in other tools.

mod eval;
mod query;
mod run;

pub use eval::{EvalOptions, EvalResult, execute_eval};
pub use query::{QueryOptions, execute_query};
pub use run::{RunOptions, execute_run};

use std::io;

use thiserror::Error;

use crate::SymbolTable;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Syntax(#[from] crate::SyntaxError),

    #[error(transparent)]
    Rule(#[from] crate::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Builds the parameter table from an optional JSON object.
pub(crate) fn params_from_json(params: Option<&str>) -> Result<SymbolTable, CliError> {
    match params {
        Some(text) if !text.trim().is_empty() => {
            let json: serde_json::Value = serde_json::from_str(text)?;
            SymbolTable::from_json(json).map_err(|e| CliError::Rule(e.into()))
        }
        _ => Ok(SymbolTable::new()),
    }
}
