use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use dashmap::{DashMap, mapref::entry::Entry};
use tracing::{debug, trace, warn};

use crate::{
    ast::Expr,
    context::ValueContext,
    error::EngineError,
    evaluator::evaluate,
    parser::parse,
    symbols::SymbolTable,
    value::Value,
    workflow::{Rule, RuleResult, Workflow},
};

type CacheKey = (String, String);

/// Executes workflows of rules against injected parameters.
///
/// Rule expressions are parsed at most once per `(workflow, rule)` pair and
/// shared between calls. The engine is `Send + Sync`; concurrent callers
/// only contend on a cache shard the first time a rule is compiled.
///
/// # Examples
///
/// ```
/// use rulengine::{Rule, RuleEngine, SymbolTable, Workflow};
///
/// let workflow = Workflow::new("age_check", "minor")
///     .with_rule(Rule::new("adult", "age >= 18", "adult"));
/// let engine = RuleEngine::new(vec![workflow], SymbolTable::new());
///
/// let result = engine
///     .execute_one_rule("age_check", &SymbolTable::new().with_int("age", 30))
///     .unwrap();
/// assert_eq!(result.matched_rule, "adult");
/// assert_eq!(result.event, "adult");
/// ```
#[derive(Debug)]
pub struct RuleEngine {
    workflows: HashMap<String, Workflow>,
    cache: DashMap<CacheKey, Arc<Expr>>,
    globals: SymbolTable,
    compiles: AtomicUsize,
}

impl RuleEngine {
    /// Builds an engine that compiles each rule on first use.
    ///
    /// A later workflow with an already seen name replaces the earlier one.
    pub fn new(workflows: Vec<Workflow>, globals: SymbolTable) -> Self {
        let mut by_name = HashMap::with_capacity(workflows.len());
        for workflow in workflows {
            warn_duplicate_rules(&workflow);
            if by_name.contains_key(&workflow.name) {
                warn!(workflow = %workflow.name, "duplicate workflow name, keeping the last definition");
            }
            by_name.insert(workflow.name.clone(), workflow);
        }

        RuleEngine {
            workflows: by_name,
            cache: DashMap::new(),
            globals,
            compiles: AtomicUsize::new(0),
        }
    }

    /// Builds an engine and compiles every rule up front.
    pub fn precompiled(workflows: Vec<Workflow>, globals: SymbolTable) -> Result<Self, EngineError> {
        let engine = Self::new(workflows, globals);
        engine.precompile()?;
        Ok(engine)
    }

    /// Compiles every rule not compiled yet.
    pub fn precompile(&self) -> Result<(), EngineError> {
        for workflow in self.workflows.values() {
            for rule in &workflow.rules {
                self.compiled(&workflow.name, rule)?;
            }
        }
        Ok(())
    }

    pub fn workflow(&self, name: &str) -> Option<&Workflow> {
        self.workflows.get(name)
    }

    pub fn workflow_names(&self) -> impl Iterator<Item = &str> {
        self.workflows.keys().map(String::as_str)
    }

    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    /// Number of times a rule expression went through the parser.
    pub fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::Relaxed)
    }

    /// Runs `workflow` with `params` layered over the global parameters and
    /// returns the first matching rule.
    ///
    /// A rule whose evaluation fails or yields a non-boolean is logged and
    /// skipped. A rule that does not parse aborts the call.
    pub fn execute_one_rule(&self, workflow: &str, params: &SymbolTable) -> Result<RuleResult, EngineError> {
        let wf = self
            .workflows
            .get(workflow)
            .ok_or_else(|| EngineError::WorkflowNotFound(workflow.to_string()))?;

        let symbols = self.globals.merged(params);

        for rule in &wf.rules {
            let expr = self.compiled(&wf.name, rule)?;
            let ctx = ValueContext::new(symbols.clone());

            trace!(workflow = %wf.name, rule = %rule.name, "evaluating rule");
            let matched = match evaluate(&expr, &ctx) {
                Ok(Value::Boolean(b)) => b,
                Ok(other) => {
                    warn!(
                        workflow = %wf.name,
                        rule = %rule.name,
                        result = other.type_name(),
                        "rule did not return a boolean"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(workflow = %wf.name, rule = %rule.name, error = %e, "rule evaluation failed");
                    continue;
                }
            };

            if matched {
                trace!(workflow = %wf.name, rule = %rule.name, event = %rule.success_event, "rule matched");
                return Ok(RuleResult {
                    workflow_name: workflow.to_string(),
                    matched_rule: rule.name.clone(),
                    event: rule.success_event.clone(),
                });
            }
        }

        Ok(RuleResult {
            workflow_name: workflow.to_string(),
            matched_rule: String::new(),
            event: wf.default_event.clone(),
        })
    }

    /// Fetches the cached tree for a rule, parsing it on first use.
    fn compiled(&self, workflow: &str, rule: &Rule) -> Result<Arc<Expr>, EngineError> {
        let key = (workflow.to_string(), rule.name.clone());

        let cached = self.cache.get(&key).map(|e| Arc::clone(e.value()));
        if let Some(expr) = cached {
            return Ok(expr);
        }

        match self.cache.entry(key) {
            Entry::Occupied(e) => Ok(Arc::clone(e.get())),
            Entry::Vacant(slot) => {
                self.compiles.fetch_add(1, Ordering::Relaxed);
                let expr = parse(&rule.expr).map_err(|source| EngineError::ExpressionCompile {
                    workflow: workflow.to_string(),
                    rule: rule.name.clone(),
                    source,
                })?;
                debug!(workflow, rule = %rule.name, "compiled rule expression");
                let expr = Arc::new(expr);
                slot.insert(Arc::clone(&expr));
                Ok(expr)
            }
        }
    }
}

fn warn_duplicate_rules(workflow: &Workflow) {
    let mut seen = HashSet::new();
    for rule in &workflow.rules {
        if !seen.insert(rule.name.as_str()) {
            warn!(
                workflow = %workflow.name,
                rule = %rule.name,
                "duplicate rule name, rules share one compiled expression"
            );
        }
    }
}
