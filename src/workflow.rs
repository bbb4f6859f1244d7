//! Workflow definitions consumed by [`RuleEngine`](crate::RuleEngine).
//!
//! The serde field names match the JSON layout used for workflow files:
//!
//! ```json
//! {
//!   "workflow": "discount",
//!   "default_event": "no_discount",
//!   "rules": [
//!     { "name": "vip", "expr": "user.Vip == true", "success_event": "gold" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Caller-defined rule category. Carried along, never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleType(pub i64);

/// A guarded outcome: when `expr` evaluates to `true`, `success_event` is
/// emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub expr: String,
    pub success_event: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
}

impl Rule {
    pub fn new(name: impl Into<String>, expr: impl Into<String>, success_event: impl Into<String>) -> Self {
        Rule {
            name: name.into(),
            expr: expr.into(),
            success_event: success_event.into(),
            error_message: None,
            rule_type: None,
        }
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_rule_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }
}

/// An ordered list of rules; the first rule that matches wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(rename = "workflow")]
    pub name: String,
    pub default_event: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, default_event: impl Into<String>) -> Self {
        Workflow {
            name: name.into(),
            default_event: default_event.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Outcome of one workflow execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub workflow_name: String,
    /// Empty when no rule matched
    pub matched_rule: String,
    pub event: String,
}

impl RuleResult {
    pub fn is_match(&self) -> bool {
        !self.matched_rule.is_empty()
    }
}
