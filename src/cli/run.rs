//! Run a workflow loaded from a JSON file

use std::{fs, path::PathBuf};

use super::{CliError, params_from_json};
use crate::{RuleEngine, RuleResult, Workflow};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// File holding a JSON array of workflows
    pub workflows: PathBuf,
    /// Workflow to execute
    pub workflow: String,
    /// Call parameters as a JSON object
    pub params: Option<String>,
    /// Global parameters as a JSON object
    pub globals: Option<String>,
    /// Compile every rule before executing
    pub precompile: bool,
}

pub fn execute_run(options: &RunOptions) -> Result<RuleResult, CliError> {
    let text = fs::read_to_string(&options.workflows)?;
    let workflows: Vec<Workflow> = serde_json::from_str(&text)?;
    let globals = params_from_json(options.globals.as_deref())?;
    let params = params_from_json(options.params.as_deref())?;

    let engine = if options.precompile {
        RuleEngine::precompiled(workflows, globals).map_err(|e| CliError::Rule(e.into()))?
    } else {
        RuleEngine::new(workflows, globals)
    };

    engine
        .execute_one_rule(&options.workflow, &params)
        .map_err(|e| CliError::Rule(e.into()))
}
