use crate::{
    ast::OpKind,
    context::{
        Operand, OperatorBackend,
        value_context::{call_function, select_field},
        with_builtins,
    },
    error::EvalError,
    query::{BoolQuery, FieldRef, Occur, Query},
    symbols::SymbolTable,
    value::Value,
};

/// Identifier that stands for the queried document by default.
pub const DEFAULT_QUERY_ROOT: &str = "query";

/// What flows between operators while compiling a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperand {
    /// Plain value: literal, injected symbol or function result
    Value(Value),

    /// The query root sentinel
    Root,

    /// `query.<field>`, not yet compared to anything
    Field(FieldRef),

    /// Compiled (sub)query
    Query(Query),
}

impl From<Value> for QueryOperand {
    fn from(v: Value) -> Self {
        QueryOperand::Value(v)
    }
}

impl Operand for QueryOperand {
    fn as_value(&self) -> Option<&Value> {
        match self {
            QueryOperand::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl QueryOperand {
    fn describe(&self) -> String {
        match self {
            QueryOperand::Value(v) => v.to_string(),
            QueryOperand::Root => "the query root".into(),
            QueryOperand::Field(f) => format!("field reference `{}`", f.key()),
            QueryOperand::Query(_) => "a query".into(),
        }
    }

    fn into_value(self, op: OpKind) -> Result<Value, EvalError> {
        match self {
            QueryOperand::Value(v) => Ok(v),
            other => Err(EvalError::type_error(format!(
                "`{}` cannot take {} as an operand",
                op,
                other.describe()
            ))),
        }
    }

    fn into_query(self, side: &str) -> Result<Query, EvalError> {
        match self {
            QueryOperand::Query(q) => Ok(q),
            other => Err(EvalError::type_error(format!(
                "{} hand side is not a query: {}",
                side,
                other.describe()
            ))),
        }
    }
}

/// Context that compiles expressions into a boolean search query.
///
/// ```
/// use rulengine::{QueryContext, SymbolTable, parse, evaluate};
/// use rulengine::context::QueryOperand;
///
/// let expr = parse(r#"query.status == "active""#).unwrap();
/// let ctx = QueryContext::new(SymbolTable::new());
/// let QueryOperand::Query(query) = evaluate(&expr, &ctx).unwrap() else {
///     panic!("not a query");
/// };
/// assert_eq!(
///     query.to_query_source().unwrap(),
///     serde_json::json!({"term": {"status": "active"}})
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QueryContext {
    symbols: SymbolTable,
    root: String,
}

impl QueryContext {
    pub fn new(injected: SymbolTable) -> Self {
        QueryContext {
            symbols: with_builtins(injected),
            root: DEFAULT_QUERY_ROOT.to_string(),
        }
    }

    /// Uses `name` instead of `query` as the root identifier.
    pub fn with_root(mut self, name: impl Into<String>) -> Self {
        self.root = name.into();
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Pairs a field reference with its comparison value.
    fn term(&self, op: OpKind, lhs: QueryOperand, rhs: QueryOperand) -> Result<Query, EvalError> {
        let (field, value) = match (lhs, rhs) {
            (QueryOperand::Field(f), other) | (other, QueryOperand::Field(f)) => (f, other),
            (l, r) => {
                return Err(EvalError::type_error(format!(
                    "no query found in {} {} {}",
                    l.describe(),
                    op,
                    r.describe()
                )));
            }
        };
        let value = value.into_value(op)?;
        Ok(Query::Term {
            field: field.key().to_string(),
            value,
        })
    }

    fn combine(&self, occur: Occur, lhs: QueryOperand, rhs: QueryOperand) -> Result<QueryOperand, EvalError> {
        let l = lhs.into_query("left")?;
        let r = rhs.into_query("right")?;
        Ok(QueryOperand::Query(Query::combine(occur, l, r)))
    }
}

/// Operands that need no query: identical plain values or two roots.
fn identical(lhs: &QueryOperand, rhs: &QueryOperand) -> bool {
    match (lhs, rhs) {
        (QueryOperand::Value(a), QueryOperand::Value(b)) => a == b,
        (QueryOperand::Root, QueryOperand::Root) => true,
        _ => false,
    }
}

impl OperatorBackend for QueryContext {
    type Operand = QueryOperand;

    const NAME: &'static str = "query";

    fn lookup(&self, name: &str) -> Option<QueryOperand> {
        if name == self.root {
            return Some(QueryOperand::Root);
        }
        self.symbols.get(name).cloned().map(QueryOperand::Value)
    }

    fn logical_and(&self, lhs: QueryOperand, rhs: QueryOperand) -> Result<QueryOperand, EvalError> {
        self.combine(Occur::Must, lhs, rhs)
    }

    fn logical_or(&self, lhs: QueryOperand, rhs: QueryOperand) -> Result<QueryOperand, EvalError> {
        self.combine(Occur::Should, lhs, rhs)
    }

    fn equal(&self, lhs: QueryOperand, rhs: QueryOperand) -> Result<QueryOperand, EvalError> {
        if identical(&lhs, &rhs) {
            return Ok(QueryOperand::Value(Value::Boolean(true)));
        }
        self.term(OpKind::Eq, lhs, rhs).map(QueryOperand::Query)
    }

    fn not_equal(&self, lhs: QueryOperand, rhs: QueryOperand) -> Result<QueryOperand, EvalError> {
        if identical(&lhs, &rhs) {
            return Ok(QueryOperand::Value(Value::Boolean(true)));
        }
        let term = self.term(OpKind::Ne, lhs, rhs)?;
        Ok(QueryOperand::Query(Query::Nested(
            BoolQuery::new().with(Occur::MustNot, term),
        )))
    }

    fn select(&self, base: QueryOperand, field: &str) -> Result<QueryOperand, EvalError> {
        match base {
            QueryOperand::Root => Ok(QueryOperand::Field(FieldRef::new(field))),
            QueryOperand::Field(f) => Ok(QueryOperand::Field(f.child(field))),
            QueryOperand::Value(v) => select_field(&v, field).map(QueryOperand::Value),
            QueryOperand::Query(_) => Err(EvalError::type_error(format!(
                "cannot select `{}` from a query",
                field
            ))),
        }
    }

    fn call(&self, callee: QueryOperand, args: Vec<QueryOperand>) -> Result<QueryOperand, EvalError> {
        let callee = callee.into_value(OpKind::Call)?;
        let args = args
            .into_iter()
            .map(|a| a.into_value(OpKind::Call))
            .collect::<Result<Vec<_>, _>>()?;
        call_function(&callee, &args).map(QueryOperand::Value)
    }

    fn paren(&self, inner: QueryOperand) -> Result<QueryOperand, EvalError> {
        Ok(match inner {
            QueryOperand::Query(q) => QueryOperand::Query(q.group()),
            other => other,
        })
    }
}
