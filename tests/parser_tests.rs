// tests/parser_tests.rs

use pretty_assertions::assert_eq;
use rulengine::ast::{BinOp, Expr, Literal, UnaryOp};
use rulengine::lexer::Lexer;
use rulengine::parser::{MAX_DEPTH, MAX_NESTING, Parser, parse};

fn int(n: i64) -> Expr {
    Expr::Literal(Literal::Integer(n))
}

fn string(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

fn select(base: Expr, field: &str) -> Expr {
    Expr::Selector {
        base: Box::new(base),
        field: field.into(),
    }
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_comparison() {
    let lexer = Lexer::new("price > 100");
    let mut parser = Parser::new(lexer).unwrap();
    let expr = parser.parse().unwrap();

    assert!(matches!(
        expr,
        Expr::BinaryOp {
            op: BinOp::GreaterThan,
            ..
        }
    ));
}

#[test]
fn test_literals() {
    assert_eq!(parse("42").unwrap(), int(42));
    assert_eq!(parse("4.5").unwrap(), Expr::Literal(Literal::Float(4.5)));
    assert_eq!(parse(r#""hi""#).unwrap(), string("hi"));
    assert_eq!(parse("`raw`").unwrap(), string("raw"));
}

#[test]
fn test_true_false_are_identifiers() {
    assert_eq!(parse("true").unwrap(), Expr::ident("true"));
    assert_eq!(parse("false").unwrap(), Expr::ident("false"));
}

#[test]
fn test_all_binary_operators() {
    let test_cases = vec![
        ("a && b", BinOp::And),
        ("a || b", BinOp::Or),
        ("a == b", BinOp::Equal),
        ("a != b", BinOp::NotEqual),
        ("a < b", BinOp::LessThan),
        ("a <= b", BinOp::LessEqual),
        ("a > b", BinOp::GreaterThan),
        ("a >= b", BinOp::GreaterEqual),
    ];

    for (input, op) in test_cases {
        assert_eq!(
            parse(input).unwrap(),
            Expr::binary(op, Expr::ident("a"), Expr::ident("b")),
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_precedence_ladder() {
    // a || b && c == d < e  =>  a || (b && (c == (d < e)))
    let expected = Expr::binary(
        BinOp::Or,
        Expr::ident("a"),
        Expr::binary(
            BinOp::And,
            Expr::ident("b"),
            Expr::binary(
                BinOp::Equal,
                Expr::ident("c"),
                Expr::binary(BinOp::LessThan, Expr::ident("d"), Expr::ident("e")),
            ),
        ),
    );
    assert_eq!(parse("a || b && c == d < e").unwrap(), expected);
}

#[test]
fn test_left_associativity() {
    let expected = Expr::binary(
        BinOp::And,
        Expr::binary(BinOp::And, Expr::ident("a"), Expr::ident("b")),
        Expr::ident("c"),
    );
    assert_eq!(parse("a && b && c").unwrap(), expected);

    let expected = Expr::binary(
        BinOp::Equal,
        Expr::binary(BinOp::Equal, Expr::ident("a"), Expr::ident("b")),
        Expr::ident("c"),
    );
    assert_eq!(parse("a == b == c").unwrap(), expected);
}

#[test]
fn test_parentheses_are_kept() {
    let expected = Expr::binary(
        BinOp::And,
        Expr::Paren(Box::new(Expr::binary(BinOp::Or, Expr::ident("a"), Expr::ident("b")))),
        Expr::ident("c"),
    );
    assert_eq!(parse("(a || b) && c").unwrap(), expected);
}

#[test]
fn test_unary_binds_tighter_than_relational() {
    let expected = Expr::binary(
        BinOp::LessThan,
        Expr::unary(UnaryOp::Negate, int(1)),
        int(0),
    );
    assert_eq!(parse("-1 < 0").unwrap(), expected);
}

#[test]
fn test_nested_unary() {
    let expected = Expr::unary(UnaryOp::Not, Expr::unary(UnaryOp::Not, Expr::ident("ok")));
    assert_eq!(parse("!!ok").unwrap(), expected);
}

#[test]
fn test_unary_applies_to_postfix_chain() {
    let expected = Expr::unary(UnaryOp::Not, select(Expr::ident("user"), "Vip"));
    assert_eq!(parse("!user.Vip").unwrap(), expected);
}

// ============================================================================
// Postfix: selectors and calls
// ============================================================================

#[test]
fn test_selector_chain() {
    let expected = select(select(Expr::ident("query"), "user"), "name");
    assert_eq!(parse("query.user.name").unwrap(), expected);
}

#[test]
fn test_call_arguments() {
    let expected = Expr::Call {
        callee: Box::new(Expr::ident("between")),
        args: vec![select(Expr::ident("u"), "Age"), int(18), int(65)],
    };
    assert_eq!(parse("between(u.Age, 18, 65)").unwrap(), expected);
}

#[test]
fn test_call_without_arguments() {
    let expected = Expr::Call {
        callee: Box::new(Expr::ident("now")),
        args: vec![],
    };
    assert_eq!(parse("now()").unwrap(), expected);
}

#[test]
fn test_method_style_call() {
    let expected = Expr::Call {
        callee: Box::new(select(Expr::ident("str"), "has_prefix")),
        args: vec![string("a")],
    };
    assert_eq!(parse(r#"str.has_prefix("a")"#).unwrap(), expected);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_incomplete_expressions() {
    for input in ["", "a ==", "a &&", "!", "(", "f(a", "a.", "a.1", "f(a b)"] {
        assert!(parse(input).is_err(), "Failed for input: {:?}", input);
    }
}

#[test]
fn test_empty_parentheses() {
    let err = parse("()").unwrap_err();
    assert_eq!(err.message, "empty parentheses");
    assert_eq!(err.span, 0..2);
}

#[test]
fn test_unclosed_paren_span_covers_group() {
    let err = parse("(2 > 1 && 1 == 1").unwrap_err();
    assert_eq!(err.span, 0..16);
}

#[test]
fn test_trailing_token_span() {
    let err = parse("a b").unwrap_err();
    assert_eq!(err.span, 2..3);
    assert_eq!(err.message, "expected end of expression, found identifier `b`");
}

#[test]
fn test_lexer_errors_propagate() {
    let err = parse("a = 1").unwrap_err();
    assert_eq!(err.span, 2..3);
    assert!(err.message.contains("unsupported operator '='"));
}

#[test]
fn test_assignment_like_constructs_rejected() {
    assert!(parse("a := 1").is_err());
    assert!(parse("a[0]").is_err());
    assert!(parse("a + 1").is_err());
}

#[test]
fn test_error_display_includes_span() {
    let err = parse("a ==").unwrap_err();
    assert_eq!(err.to_string(), "expected expression, found end of expression at [4, 4)");
}

#[test]
fn test_float_forms_in_expressions() {
    assert_eq!(
        parse("1. > .5").unwrap(),
        Expr::binary(
            BinOp::GreaterThan,
            Expr::Literal(Literal::Float(1.0)),
            Expr::Literal(Literal::Float(0.5)),
        )
    );
}

// ============================================================================
// Nesting limits
// ============================================================================

fn parens(depth: usize) -> String {
    format!("{}true{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_nested_parentheses_up_to_limit() {
    assert!(parse(&parens(MAX_NESTING)).is_ok());

    let err = parse(&parens(MAX_NESTING + 1)).unwrap_err();
    assert_eq!(err.span, MAX_NESTING..MAX_NESTING + 1);
    assert!(err.message.starts_with("expression nested too deeply"));
}

#[test]
fn test_unary_chain_up_to_limit() {
    assert!(parse(&format!("{}true", "!".repeat(MAX_NESTING))).is_ok());
    assert!(parse(&format!("{}1", "-".repeat(MAX_NESTING + 1))).is_err());

    // far past the limit is still an error, not a crash
    let err = parse(&format!("{}true", "!".repeat(200_000))).unwrap_err();
    assert!(err.message.starts_with("expression nested too deeply"));
}

#[test]
fn test_call_arguments_count_as_nesting() {
    let nested = format!("{}x{}", "f(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
    assert!(parse(&nested).unwrap_err().message.starts_with("expression nested too deeply"));
}

#[test]
fn test_deeply_nested_input_is_rejected() {
    let err = parse(&parens(100_000)).unwrap_err();
    assert_eq!(err.span, MAX_NESTING..MAX_NESTING + 1);
}

#[test]
fn test_operator_chain_height_is_bounded() {
    let chain = |terms: usize| vec!["a"; terms].join(" || ");
    assert!(parse(&chain(MAX_DEPTH)).is_ok());

    let err = parse(&chain(MAX_DEPTH + 1)).unwrap_err();
    assert!(err.message.starts_with("expression too deep"));
    assert!(parse(&chain(50_000)).is_err());
}

#[test]
fn test_selector_chain_height_is_bounded() {
    let path = |len: usize| format!("a{}", ".b".repeat(len));
    assert!(parse(&path(MAX_DEPTH - 1)).is_ok());
    assert!(parse(&path(MAX_DEPTH)).is_err());
}
