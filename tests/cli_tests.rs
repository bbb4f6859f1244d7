// tests/cli_tests.rs

#![cfg(feature = "cli")]

use std::fs;
use std::io::Write as _;

use rulengine::Value;
use rulengine::cli::{
    CliError, EvalOptions, EvalResult, QueryOptions, RunOptions, execute_eval, execute_query, execute_run,
};
use serde_json::json;

fn eval_options(expr: &str, params: Option<&str>) -> EvalOptions {
    EvalOptions {
        expr: expr.into(),
        params: params.map(String::from),
        syntax_only: false,
    }
}

// ============================================================================
// eval
// ============================================================================

#[test]
fn test_eval_with_params() {
    let result = execute_eval(&eval_options("user.age >= 18", Some(r#"{"user": {"age": 20}}"#))).unwrap();
    assert!(matches!(result, EvalResult::Success(Value::Boolean(true))));
}

#[test]
fn test_syntax_only_skips_evaluation() {
    let mut options = eval_options("undefined_symbol == 1", None);
    options.syntax_only = true;
    assert!(matches!(execute_eval(&options), Ok(EvalResult::SyntaxValid)));
}

#[test]
fn test_eval_syntax_error() {
    assert!(matches!(execute_eval(&eval_options("a ==", None)), Err(CliError::Syntax(_))));
}

#[test]
fn test_eval_invalid_params() {
    assert!(matches!(
        execute_eval(&eval_options("a", Some("{not json"))),
        Err(CliError::Json(_))
    ));
}

// ============================================================================
// query
// ============================================================================

#[test]
fn test_query_compiles_term() {
    let options = QueryOptions {
        expr: "query.gender == 1".into(),
        params: None,
    };
    assert_eq!(execute_query(&options).unwrap(), json!({"term": {"gender": 1}}));
}

#[test]
fn test_query_rejects_relational_operator() {
    let options = QueryOptions {
        expr: "query.age > 1".into(),
        params: None,
    };
    assert!(matches!(execute_query(&options), Err(CliError::Rule(_))));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_runs_workflow_from_file() {
    let mut path = std::env::temp_dir();
    path.push(format!("rulengine-run-{}.json", std::process::id()));
    let mut file = fs::File::create(&path).unwrap();
    write!(
        file,
        r#"[{{"workflow": "wf", "default_event": "none", "rules": [
            {{"name": "big", "expr": "n > 10", "success_event": "big"}}
        ]}}]"#
    )
    .unwrap();

    let result = execute_run(&RunOptions {
        workflows: path.clone(),
        workflow: "wf".into(),
        params: Some(r#"{"n": 11}"#.into()),
        globals: None,
        precompile: true,
    })
    .unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(result.matched_rule, "big");
    assert_eq!(result.event, "big");
}

#[test]
fn test_run_missing_file() {
    let options = RunOptions {
        workflows: "/nonexistent/rulengine/workflows.json".into(),
        workflow: "wf".into(),
        ..RunOptions::default()
    };
    assert!(matches!(execute_run(&options), Err(CliError::Io(_))));
}
