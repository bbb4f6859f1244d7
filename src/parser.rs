use std::mem;

use crate::{
    ast::{BinOp, Expr, Literal, SpannedToken, Token, UnaryOp},
    error::SyntaxError,
    lexer::Lexer,
};

/// Deepest grouping the parser follows. Parentheses, unary operators and
/// call argument lists each open one level.
pub const MAX_NESTING: usize = 128;

/// Tallest expression tree the parser builds. Operator and selector chains
/// grow the tree without opening a level, so they are bounded here.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser for rule expressions.
///
/// The parser only builds the tree; it never evaluates anything and never
/// consults a symbol table. Trees are at most [`MAX_DEPTH`] nodes tall, which
/// also bounds the recursion of every evaluator walking them.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: SpannedToken,
    nesting: usize,
}

/// A subtree and its height.
struct Parsed {
    expr: Expr,
    height: usize,
}

impl Parsed {
    fn leaf(expr: Expr) -> Self {
        Parsed { expr, height: 1 }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Integer(n) => format!("integer {}", n),
        Token::Float(n) => format!("float {}", n),
        Token::String(s) => format!("string {:?}", s),
        Token::Identifier(name) => format!("identifier `{}`", name),
        Token::AndAnd => "'&&'".into(),
        Token::OrOr => "'||'".into(),
        Token::Bang => "'!'".into(),
        Token::EqEq => "'=='".into(),
        Token::NotEq => "'!='".into(),
        Token::Lt => "'<'".into(),
        Token::LtEq => "'<='".into(),
        Token::Gt => "'>'".into(),
        Token::GtEq => "'>='".into(),
        Token::Minus => "'-'".into(),
        Token::Dot => "'.'".into(),
        Token::Comma => "','".into(),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::Eof => "end of expression".into(),
    }
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self, SyntaxError> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<SpannedToken, SyntaxError> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            self.current.span.clone(),
            format!("expected {}, found {}", expected, describe(&self.current.token)),
        )
    }

    fn expect(&mut self, expected: Token) -> Result<SpannedToken, SyntaxError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&describe(&expected)));
        }
        self.advance()
    }

    /// Opens a nesting level at the current token.
    ///
    /// A syntax error ends the parse, so levels are only closed on success.
    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.nesting >= MAX_NESTING {
            return Err(SyntaxError::new(
                self.current.span.clone(),
                format!("expression nested too deeply (limit {})", MAX_NESTING),
            ));
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Wraps `expr` as a node one level above its tallest child.
    fn node(&self, expr: Expr, child_height: usize) -> Result<Parsed, SyntaxError> {
        let height = child_height + 1;
        if height > MAX_DEPTH {
            return Err(SyntaxError::new(
                self.current.span.clone(),
                format!("expression too deep (limit {})", MAX_DEPTH),
            ));
        }
        Ok(Parsed { expr, height })
    }

    /// Parse primary expressions (atoms): literals, identifiers, `( expr )`
    fn parse_primary(&mut self) -> Result<Parsed, SyntaxError> {
        let expr = match &self.current.token {
            Token::Integer(n) => Expr::Literal(Literal::Integer(*n)),
            Token::Float(n) => Expr::Literal(Literal::Float(*n)),
            Token::String(_) | Token::Identifier(_) => {
                let expr = match self.advance()?.token {
                    Token::String(s) => Expr::Literal(Literal::String(s)),
                    Token::Identifier(name) => Expr::Identifier(name),
                    _ => unreachable!(),
                };
                return Ok(Parsed::leaf(expr));
            }
            Token::LParen => {
                self.enter()?;
                let group = self.parse_group()?;
                self.leave();
                return Ok(group);
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance()?;
        Ok(Parsed::leaf(expr))
    }

    fn parse_group(&mut self) -> Result<Parsed, SyntaxError> {
        let open = self.advance()?;
        if self.check(&Token::RParen) {
            return Err(SyntaxError::new(
                open.span.start..self.current.span.end,
                "empty parentheses",
            ));
        }
        let inner = self.parse_or()?;
        if !self.check(&Token::RParen) {
            return Err(SyntaxError::new(
                open.span.start..self.current.span.end,
                format!("expected ')', found {}", describe(&self.current.token)),
            ));
        }
        self.advance()?;
        self.node(Expr::Paren(Box::new(inner.expr)), inner.height)
    }

    /// Parse selector and call chains: `a.b.c`, `f(x, y)`, `a.f(x)`
    fn parse_postfix(&mut self) -> Result<Parsed, SyntaxError> {
        let mut node = self.parse_primary()?;

        loop {
            if self.check(&Token::Dot) {
                self.advance()?;

                let field = match &self.current.token {
                    Token::Identifier(_) => match self.advance()?.token {
                        Token::Identifier(name) => name,
                        _ => unreachable!(),
                    },
                    _ => return Err(self.unexpected("field name after '.'")),
                };

                let expr = Expr::Selector {
                    base: Box::new(node.expr),
                    field,
                };
                node = self.node(expr, node.height)?;
            } else if self.check(&Token::LParen) {
                self.enter()?;
                self.advance()?;
                let (args, args_height) = self.parse_arguments()?;
                self.leave();

                let expr = Expr::Call {
                    callee: Box::new(node.expr),
                    args,
                };
                node = self.node(expr, node.height.max(args_height))?;
            } else {
                break;
            }
        }
        Ok(node)
    }

    /// Arguments up to the closing `)`, with the height of the tallest one.
    fn parse_arguments(&mut self) -> Result<(Vec<Expr>, usize), SyntaxError> {
        let mut args = vec![];
        let mut height = 0;

        while !self.check(&Token::RParen) {
            let arg = self.parse_or()?;
            height = height.max(arg.height);
            args.push(arg.expr);

            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }

        self.expect(Token::RParen)?;
        Ok((args, height))
    }

    fn parse_unary(&mut self) -> Result<Parsed, SyntaxError> {
        let op = match &self.current.token {
            Token::Bang => UnaryOp::Not,
            Token::Minus => UnaryOp::Negate,
            _ => return self.parse_postfix(),
        };
        self.enter()?;
        self.advance()?;
        let operand = self.parse_unary()?;
        self.leave();
        self.node(Expr::unary(op, operand.expr), operand.height)
    }

    fn binary(&self, op: BinOp, left: Parsed, right: Parsed) -> Result<Parsed, SyntaxError> {
        let height = left.height.max(right.height);
        self.node(Expr::binary(op, left.expr, right.expr), height)
    }

    fn parse_relational(&mut self) -> Result<Parsed, SyntaxError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match &self.current.token {
                Token::Lt => BinOp::LessThan,
                Token::LtEq => BinOp::LessEqual,
                Token::Gt => BinOp::GreaterThan,
                Token::GtEq => BinOp::GreaterEqual,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_unary()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Parsed, SyntaxError> {
        let mut left = self.parse_relational()?;

        loop {
            let op = match &self.current.token {
                Token::EqEq => BinOp::Equal,
                Token::NotEq => BinOp::NotEqual,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_relational()?;
            left = self.binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Parsed, SyntaxError> {
        let mut left = self.parse_equality()?;

        while self.check(&Token::AndAnd) {
            self.advance()?;
            let right = self.parse_equality()?;
            left = self.binary(BinOp::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Parsed, SyntaxError> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            self.advance()?;
            let right = self.parse_and()?;
            left = self.binary(BinOp::Or, left, right)?;
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_or().map(|parsed| parsed.expr)
    }

    /// Parses one complete expression; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of expression"));
        }
        Ok(expr)
    }
}

/// Parses `source` into an expression tree.
pub fn parse(source: &str) -> Result<Expr, SyntaxError> {
    Parser::new(Lexer::new(source))?.parse()
}
