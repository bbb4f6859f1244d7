/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Logical
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,

    // Equality
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,

    // Relational
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical negation (`!`)
    Not,
    /// Integer negation (`-`)
    Negate,
}

/// Operator kind as seen by an evaluation backend.
///
/// Besides the binary and unary operators this includes the postfix
/// selector and call operators and the parenthesization hook, since the
/// query backend gives each of them its own meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum OpKind {
    #[strum(to_string = "&&")]
    And,
    #[strum(to_string = "||")]
    Or,
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "!=")]
    Ne,
    #[strum(to_string = "<")]
    Lt,
    #[strum(to_string = "<=")]
    Le,
    #[strum(to_string = ">")]
    Gt,
    #[strum(to_string = ">=")]
    Ge,
    #[strum(to_string = "!")]
    Not,
    #[strum(to_string = "-")]
    Neg,
    #[strum(to_string = ".")]
    Select,
    #[strum(to_string = "()")]
    Call,
    #[strum(to_string = "(...)")]
    Paren,
}

impl OpKind {
    /// Number of operands the operator takes, `None` for variadic calls.
    pub fn arity(self) -> Option<usize> {
        match self {
            OpKind::Not | OpKind::Neg | OpKind::Paren => Some(1),
            OpKind::Call => None,
            _ => Some(2),
        }
    }
}

impl From<BinOp> for OpKind {
    fn from(op: BinOp) -> Self {
        match op {
            BinOp::And => OpKind::And,
            BinOp::Or => OpKind::Or,
            BinOp::Equal => OpKind::Eq,
            BinOp::NotEqual => OpKind::Ne,
            BinOp::LessThan => OpKind::Lt,
            BinOp::LessEqual => OpKind::Le,
            BinOp::GreaterThan => OpKind::Gt,
            BinOp::GreaterEqual => OpKind::Ge,
        }
    }
}

impl From<UnaryOp> for OpKind {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Not => OpKind::Not,
            UnaryOp::Negate => OpKind::Neg,
        }
    }
}
