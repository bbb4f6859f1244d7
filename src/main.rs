use clap::{Parser as ClapParser, Subcommand};
use rulengine::cli::{self, CliError, EvalOptions, EvalResult, QueryOptions, RunOptions};
use rulengine::output::{to_json, to_json_pretty};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "rulengine")]
#[command(about = "Rulengine - evaluate rule expressions, compile them to search queries, run workflows")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a rule expression
    Eval {
        /// The rule expression to evaluate
        expr: String,

        /// JSON object of parameters (reads from stdin if not provided)
        #[arg(short, long)]
        params: Option<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Compile a rule expression into a search query
    Query {
        /// The expression, fields addressed as `query.<field>`
        expr: String,

        /// JSON object of parameters
        #[arg(short, long)]
        params: Option<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Execute a workflow from a JSON workflow file
    Run {
        /// Workflow to execute
        workflow: String,

        /// File with a JSON array of workflows
        #[arg(short, long)]
        workflows: PathBuf,

        /// JSON object of call parameters (reads from stdin if not provided)
        #[arg(short, long)]
        params: Option<String>,

        /// JSON object of global parameters
        #[arg(short, long)]
        globals: Option<String>,

        /// Compile every rule before executing
        #[arg(long)]
        precompile: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            expr,
            params,
            pretty,
            syntax_only,
        } => run_eval(expr, params, pretty, syntax_only),
        Commands::Query { expr, params, pretty } => run_query(expr, params, pretty),
        Commands::Run {
            workflow,
            workflows,
            params,
            globals,
            precompile,
        } => run_workflow(workflow, workflows, params, globals, precompile),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Reads parameters from stdin when they were not given and stdin is piped.
fn params_or_stdin(params: Option<String>) -> Result<Option<String>, CliError> {
    match params {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn print_json(json: &serde_json::Value, pretty: bool) {
    if pretty {
        println!("{:#}", json);
    } else {
        println!("{}", json);
    }
}

fn run_eval(expr: String, params: Option<String>, pretty: bool, syntax_only: bool) -> Result<(), CliError> {
    let params = if syntax_only { None } else { params_or_stdin(params)? };

    let options = EvalOptions {
        expr,
        params,
        syntax_only,
    };

    match cli::execute_eval(&options)? {
        EvalResult::SyntaxValid => println!("Syntax is valid"),
        EvalResult::Success(value) => {
            let json = if pretty { to_json_pretty(&value) } else { to_json(&value) };
            match json {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", value),
            }
        }
    }
    Ok(())
}

fn run_query(expr: String, params: Option<String>, pretty: bool) -> Result<(), CliError> {
    let source = cli::execute_query(&QueryOptions { expr, params })?;
    print_json(&source, pretty);
    Ok(())
}

fn run_workflow(
    workflow: String,
    workflows: PathBuf,
    params: Option<String>,
    globals: Option<String>,
    precompile: bool,
) -> Result<(), CliError> {
    let options = RunOptions {
        workflows,
        workflow,
        params: params_or_stdin(params)?,
        globals,
        precompile,
    };
    let result = cli::execute_run(&options)?;
    print_json(&serde_json::to_value(&result)?, true);
    Ok(())
}
