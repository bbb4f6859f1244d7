// tests/query_tests.rs

use pretty_assertions::assert_eq;
use rulengine::{
    BoolQuery, Error, EvalError, FieldRef, OpKind, Occur, OperatorBackend, Query, QueryContext, QueryError,
    QueryOperand, SymbolTable, Value, compile_query, evaluate, parse,
};
use serde_json::{Value as Json, json};

fn source(expr: &str, symbols: &SymbolTable) -> Json {
    compile_query(expr, symbols)
        .unwrap_or_else(|e| panic!("failed to compile {:?}: {}", expr, e))
        .to_query_source()
        .unwrap()
}

fn compile_err(expr: &str) -> EvalError {
    match compile_query(expr, &SymbolTable::new()) {
        Err(Error::Eval(e)) => e,
        other => panic!("expected an evaluation error for {:?}, got {:?}", expr, other),
    }
}

// ============================================================================
// Terms
// ============================================================================

#[test]
fn test_term() {
    assert_eq!(
        source(r#"query.status == "active""#, &SymbolTable::new()),
        json!({"term": {"status": "active"}})
    );
}

#[test]
fn test_value_on_the_left() {
    assert_eq!(source("1 == query.age", &SymbolTable::new()), json!({"term": {"age": 1}}));
}

#[test]
fn test_nested_field_path() {
    assert_eq!(
        source(r#"query.user.name == "bob""#, &SymbolTable::new()),
        json!({"term": {"user.name": "bob"}})
    );
}

#[test]
fn test_injected_values_and_functions() {
    let symbols = SymbolTable::new()
        .with_string("wanted", "nl")
        .with_function("upper", |args| match args {
            [Value::String(s)] => Ok(Value::String(s.to_uppercase())),
            _ => Err("upper expects one string".into()),
        });
    assert_eq!(
        source("query.country == upper(wanted)", &symbols),
        json!({"term": {"country": "NL"}})
    );
}

#[test]
fn test_record_field_as_value() {
    let symbols = SymbolTable::new()
        .with_struct("limits", &json!({"Age": 21}))
        .unwrap();
    assert_eq!(
        source("query.age == limits.Age", &symbols),
        json!({"term": {"age": 21}})
    );
}

#[test]
fn test_not_equal_is_must_not() {
    assert_eq!(
        source(r#"query.field != "123""#, &SymbolTable::new()),
        json!({"bool": {"must_not": {"term": {"field": "123"}}}})
    );
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn test_two_not_equals() {
    assert_eq!(
        source(r#"query.field != "123" && query.gender != 1"#, &SymbolTable::new()),
        json!({"bool": {"must": [
            {"bool": {"must_not": {"term": {"field": "123"}}}},
            {"bool": {"must_not": {"term": {"gender": 1}}}},
        ]}})
    );
}

#[test]
fn test_and_chain_flattens() {
    assert_eq!(
        source("query.a == 1 && query.b == 2 && query.c == 3", &SymbolTable::new()),
        json!({"bool": {"must": [
            {"term": {"a": 1}},
            {"term": {"b": 2}},
            {"term": {"c": 3}},
        ]}})
    );
}

#[test]
fn test_or_of_and() {
    assert_eq!(
        source("query.a == 1 || query.b == 2 && query.c == 3", &SymbolTable::new()),
        json!({"bool": {"should": [
            {"term": {"a": 1}},
            {"bool": {"must": [{"term": {"b": 2}}, {"term": {"c": 3}}]}},
        ]}})
    );
}

#[test]
fn test_and_never_extends_an_or() {
    assert_eq!(
        source("query.a == 1 || query.b == 2 && query.c == 3 || query.d == 4", &SymbolTable::new()),
        json!({"bool": {"should": [
            {"term": {"a": 1}},
            {"bool": {"must": [{"term": {"b": 2}}, {"term": {"c": 3}}]}},
            {"term": {"d": 4}},
        ]}})
    );
}

#[test]
fn test_parenthesized_term() {
    assert_eq!(
        source("(query.a == 1)", &SymbolTable::new()),
        json!({"bool": {"must": {"term": {"a": 1}}}})
    );
}

#[test]
fn test_group_next_to_term() {
    assert_eq!(
        source("(query.a == 1 || query.b == 2) && query.c == 3", &SymbolTable::new()),
        json!({"bool": {"must": [
            {"bool": {"should": [{"term": {"a": 1}}, {"term": {"b": 2}}]}},
            {"bool": {"should": {"term": {"c": 3}}}},
        ]}})
    );
}

#[test]
fn test_group_is_not_extended() {
    // the grouped `&&` stays a separate node
    assert_eq!(
        source("(query.a == 1 && query.b == 2) && (query.c == 3)", &SymbolTable::new()),
        json!({"bool": {"must": [
            {"bool": {"must": [{"term": {"a": 1}}, {"term": {"b": 2}}]}},
            {"bool": {"must": {"term": {"c": 3}}}},
        ]}})
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_relational_operator_unsupported() {
    assert_eq!(
        compile_err("query.age > 18"),
        EvalError::UnsupportedOperator {
            op: OpKind::Gt,
            backend: "query"
        }
    );
}

#[test]
fn test_negation_unsupported() {
    assert!(matches!(
        compile_err("!(query.a == 1)"),
        EvalError::UnsupportedOperator { op: OpKind::Not, .. }
    ));
}

#[test]
fn test_comparison_without_field() {
    assert!(matches!(compile_err("1 == 2"), EvalError::Type(msg) if msg.contains("no query found")));
}

#[test]
fn test_comparing_two_fields() {
    assert!(matches!(compile_err("query.a == query.b"), EvalError::Type(_)));
}

#[test]
fn test_and_with_plain_value() {
    assert!(matches!(
        compile_err("query.a == 1 && true"),
        EvalError::Type(msg) if msg.starts_with("right hand side")
    ));
}

#[test]
fn test_constant_expression_is_not_a_query() {
    assert!(matches!(compile_err("1 == 1"), EvalError::Type(_)));
}

#[test]
fn test_unbound_symbol() {
    assert_eq!(compile_err("query.a == nope"), EvalError::UnknownSymbol("nope".into()));
}

#[test]
fn test_function_term_value_is_unrepresentable() {
    let symbols = SymbolTable::new().with_function("f", |_| Ok(Value::Null));
    let query = compile_query("query.a == f", &symbols).unwrap();
    assert_eq!(query.to_query_source(), Err(QueryError::Unrepresentable("function")));
}

// ============================================================================
// Context options
// ============================================================================

#[test]
fn test_identical_operands_fold_to_true() {
    let ctx = QueryContext::new(SymbolTable::new());
    let result = evaluate(&parse("query == query").unwrap(), &ctx).unwrap();
    assert_eq!(result, QueryOperand::Value(Value::Boolean(true)));
}

#[test]
fn test_custom_root() {
    let ctx = QueryContext::new(SymbolTable::new()).with_root("doc");
    let result = evaluate(&parse("doc.lang == `rust`").unwrap(), &ctx).unwrap();
    let QueryOperand::Query(query) = result else {
        panic!("expected a query, got {:?}", result);
    };
    assert_eq!(query.to_query_source().unwrap(), json!({"term": {"lang": "rust"}}));

    // `query` is just an unbound name now
    let err = evaluate(&parse("query.lang == 1").unwrap(), &ctx).unwrap_err();
    assert_eq!(err, EvalError::UnknownSymbol("query".into()));
}

// ============================================================================
// Query documents
// ============================================================================

#[test]
fn test_term_document() {
    assert_eq!(
        Query::term("gender", 1).to_query_source().unwrap(),
        json!({"term": {"gender": 1}})
    );
}

#[test]
fn test_clause_lists_render_by_length() {
    let one = Query::Bool(BoolQuery::new().with(Occur::MustNot, Query::term("field", "123")));
    assert_eq!(
        one.to_query_source().unwrap(),
        json!({"bool": {"must_not": {"term": {"field": "123"}}}})
    );

    let two = Query::Bool(
        BoolQuery::new()
            .with(Occur::Must, Query::term("a", 1))
            .with(Occur::Must, Query::term("b", 2))
            .with(Occur::MustNot, Query::term("c", 3)),
    );
    assert_eq!(
        two.to_query_source().unwrap(),
        json!({"bool": {
            "must": [{"term": {"a": 1}}, {"term": {"b": 2}}],
            "must_not": {"term": {"c": 3}},
        }})
    );
}

// ============================================================================
// Backend operations
// ============================================================================

fn field(key: &str) -> QueryOperand {
    QueryOperand::Field(FieldRef::new(key))
}

#[test]
fn test_select_builds_field_paths() {
    let ctx = QueryContext::new(SymbolTable::new());
    let root = ctx.lookup("query").unwrap();
    assert_eq!(ctx.select(root, "gender"), Ok(field("gender")));
    assert_eq!(ctx.select(field("user"), "name"), Ok(field("user.name")));
}

#[test]
fn test_equal_accepts_field_on_either_side() {
    let ctx = QueryContext::new(SymbolTable::new());
    let expected = QueryOperand::Query(Query::term("age", 3));
    assert_eq!(ctx.equal(field("age"), Value::Integer(3).into()), Ok(expected.clone()));
    assert_eq!(ctx.equal(Value::Integer(3).into(), field("age")), Ok(expected));
}

#[test]
fn test_identical_values_fold_to_true() {
    let ctx = QueryContext::new(SymbolTable::new());
    assert_eq!(
        ctx.equal(Value::Integer(1).into(), Value::Integer(1).into()),
        Ok(QueryOperand::Value(Value::Boolean(true)))
    );
}

#[test]
fn test_and_rejects_plain_left_operand() {
    let ctx = QueryContext::new(SymbolTable::new());
    let err = ctx
        .logical_and(Value::Boolean(true).into(), QueryOperand::Query(Query::term("a", 1)))
        .unwrap_err();
    assert!(matches!(err, EvalError::Type(msg) if msg.starts_with("left hand side")));
}
