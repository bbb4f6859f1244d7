use crate::ast::{BinOp, UnaryOp};

/// Literal constant as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Decimal integer
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer(i64),

    /// Number with a fractional part or exponent
    ///
    /// # Example
    /// ```text
    /// 4.2
    /// 1e-6
    /// ```
    Float(f64),

    /// Quoted string, already unescaped
    ///
    /// # Example
    /// ```text
    /// "hello\n"
    /// `raw \n`
    /// ```
    String(String),

    /// Boolean constant.
    ///
    /// The parser never produces this: `true`/`false` in source text are
    /// identifiers. It exists for trees built programmatically.
    Boolean(bool),
}

/// Abstract Syntax Tree node representing a parsed rule expression.
///
/// Trees are immutable once built and every node is well-formed: malformed
/// input is rejected by the parser and never reaches an evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Literal),

    /// Name resolved through the symbol table
    ///
    /// # Example
    /// ```text
    /// min_age
    /// true
    /// ```
    Identifier(String),

    /// Binary operation (logical, equality, relational)
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Prefix operation
    ///
    /// # Example
    /// ```text
    /// !verified
    /// -1
    /// ```
    UnaryOp { op: UnaryOp, operand: Box<Expr> },

    /// Field selection on a record
    ///
    /// # Example
    /// ```text
    /// user.Age
    /// query.gender
    /// ```
    Selector { base: Box<Expr>, field: String },

    /// Call of a host-injected function
    ///
    /// # Example
    /// ```text
    /// len(name)
    /// ```
    Call { callee: Box<Expr>, args: Vec<Expr> },

    /// Parenthesized expression, kept in the tree because the query backend
    /// gives grouping its own meaning
    Paren(Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }
}
