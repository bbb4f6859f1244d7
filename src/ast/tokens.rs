use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Decimal integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0
    /// ```
    Integer(i64),

    /// Decimal number with a fractional part and/or exponent
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1e6
    /// 2.5E-3
    /// ```
    Float(f64),

    /// String literal, either interpreted (`"..."`) or raw (`` `...` ``)
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "tab\tseparated"
    /// `C:\path`
    /// ```
    String(String),

    /// Name of a symbol or of a selected field
    ///
    /// Must start with a letter or underscore, followed by letters, digits,
    /// or underscores.
    ///
    /// # Examples
    /// ```text
    /// user
    /// default_len
    /// true
    /// ```
    Identifier(String),

    // Logical
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,

    // Comparison
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,

    /// `-`, unary negation only
    Minus,

    // Delimiters
    /// Field selector
    Dot,
    /// Argument separator
    Comma,
    /// Left parenthesis for grouping or calls
    LParen,
    /// Right parenthesis
    RParen,

    /// End of input
    Eof,
}

/// A token together with the byte range it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Range<usize>,
}
