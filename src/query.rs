//! Boolean search queries produced by the query backend.
//!
//! The compiler only emits term matches and boolean combinators with
//! `must`, `should` and `must_not` clauses. [`Query::to_query_source`]
//! renders them into a search-engine style JSON document:
//!
//! ```text
//! {"term": {"gender": 1}}
//! {"bool": {"must": [ ... ], "must_not": {"term": {"field": "123"}}}}
//! ```
//!
//! A clause list with a single entry renders as a bare object.

use serde_json::{Map, json};

use crate::{convert::value_to_json, error::QueryError, value::Value};

/// A reference to a document field, waiting for its comparison value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    key: String,
}

impl FieldRef {
    pub fn new(key: impl Into<String>) -> Self {
        FieldRef { key: key.into() }
    }

    /// Dotted path to a nested field
    pub fn child(&self, field: &str) -> Self {
        FieldRef {
            key: format!("{}.{}", self.key, field),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Clause kind of a boolean combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

impl Occur {
    fn key(self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
        }
    }
}

/// Boolean combinator node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    must: Vec<Query>,
    should: Vec<Query>,
    must_not: Vec<Query>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, occur: Occur, query: Query) -> Self {
        self.push(occur, query);
        self
    }

    pub fn push(&mut self, occur: Occur, query: Query) {
        self.clauses_mut(occur).push(query);
    }

    pub fn clauses(&self, occur: Occur) -> &[Query] {
        match occur {
            Occur::Must => &self.must,
            Occur::Should => &self.should,
            Occur::MustNot => &self.must_not,
        }
    }

    fn clauses_mut(&mut self, occur: Occur) -> &mut Vec<Query> {
        match occur {
            Occur::Must => &mut self.must,
            Occur::Should => &mut self.should,
            Occur::MustNot => &mut self.must_not,
        }
    }

    pub fn must(&self) -> &[Query] {
        &self.must
    }

    pub fn should(&self) -> &[Query] {
        &self.should
    }

    pub fn must_not(&self) -> &[Query] {
        &self.must_not
    }

    /// True when every clause of this node is of kind `occur`.
    pub fn only(&self, occur: Occur) -> bool {
        [Occur::Must, Occur::Should, Occur::MustNot]
            .into_iter()
            .all(|o| o == occur || self.clauses(o).is_empty())
    }

    fn source(&self) -> Result<serde_json::Value, QueryError> {
        let mut body = Map::new();
        for occur in [Occur::Must, Occur::Should, Occur::MustNot] {
            let clauses = self.clauses(occur);
            let rendered = match clauses {
                [] => continue,
                [single] => single.to_query_source()?,
                many => serde_json::Value::Array(
                    many.iter()
                        .map(Query::to_query_source)
                        .collect::<Result<_, _>>()?,
                ),
            };
            body.insert(occur.key().to_string(), rendered);
        }
        Ok(json!({ "bool": body }))
    }
}

/// Compiled query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `field == value`
    Term { field: String, value: Value },

    /// Combinator built by `&&`, `||` or `!=`
    Bool(BoolQuery),

    /// Combinator that went through parentheses. Never extended in place
    /// by a later `&&`/`||`.
    Nested(BoolQuery),
}

impl Query {
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// The combinator node, for `Bool` and `Nested` queries.
    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            Query::Bool(b) | Query::Nested(b) => Some(b),
            Query::Term { .. } => None,
        }
    }

    /// Renders the query document.
    pub fn to_query_source(&self) -> Result<serde_json::Value, QueryError> {
        match self {
            Query::Term { field, value } => {
                let mut term = Map::new();
                term.insert(field.clone(), value_to_json(value)?);
                Ok(json!({ "term": term }))
            }
            Query::Bool(b) | Query::Nested(b) => b.source(),
        }
    }

    /// Combines two queries under `occur` (`Must` for `&&`, `Should` for `||`).
    ///
    /// A `Bool` node holding only `occur` clauses absorbs the other side;
    /// a parenthesized group next to a bare term gets the term wrapped in a
    /// singleton `should` node; everything else becomes a fresh node.
    pub(crate) fn combine(occur: Occur, lhs: Query, rhs: Query) -> Query {
        match (lhs, rhs) {
            (Query::Bool(mut b), other) if b.only(occur) => {
                b.push(occur, other);
                Query::Bool(b)
            }
            (other, Query::Bool(mut b)) if b.only(occur) => {
                b.push(occur, other);
                Query::Bool(b)
            }
            (nested @ Query::Nested(_), term @ Query::Term { .. })
            | (term @ Query::Term { .. }, nested @ Query::Nested(_)) => {
                let wrapped = Query::Bool(BoolQuery::new().with(Occur::Should, term));
                Query::Bool(BoolQuery::new().with(occur, nested).with(occur, wrapped))
            }
            (x, y) => Query::Bool(BoolQuery::new().with(occur, x).with(occur, y)),
        }
    }

    /// Grouping: a term becomes a one-clause `must` node, combinators are
    /// marked nested.
    pub(crate) fn group(self) -> Query {
        match self {
            term @ Query::Term { .. } => Query::Nested(BoolQuery::new().with(Occur::Must, term)),
            Query::Bool(b) => Query::Nested(b),
            nested @ Query::Nested(_) => nested,
        }
    }
}
