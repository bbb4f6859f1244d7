use crate::{
    ast::{SpannedToken, Token},
    error::SyntaxError,
};

/// Tokenizer for rule expressions.
///
/// Positions are byte offsets into the source so that [`SyntaxError`] spans
/// can be used to slice the original text.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input[self.position..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn error_at(&self, start: usize, message: impl Into<String>) -> SyntaxError {
        let end = self.position.max(start + 1).min(self.input.len().max(start));
        SyntaxError::new(start..end, message)
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.position].to_string()
    }

    fn read_hex_escape(&mut self, start: usize, digits: usize) -> Result<u32, SyntaxError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error_at(start, "invalid hex digit in escape sequence"))?;
            code = code * 16 + digit;
            self.advance();
        }
        Ok(code)
    }

    /// Reads the two digits after `first` of a `\NNN` octal escape.
    fn read_octal_escape(&mut self, start: usize, first: char) -> Result<u32, SyntaxError> {
        let mut code = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            let digit = self
                .current_char()
                .and_then(|c| c.to_digit(8))
                .ok_or_else(|| self.error_at(start, "invalid octal digit in escape sequence"))?;
            code = code * 8 + digit;
            self.advance();
        }
        Ok(code)
    }

    fn read_escape(&mut self, start: usize) -> Result<char, SyntaxError> {
        let escaped = self
            .current_char()
            .ok_or_else(|| self.error_at(start, "unterminated string: unexpected end after backslash"))?;
        self.advance();

        let ch = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            '"' => '"',
            '\\' => '\\',
            '0'..='7' => {
                let code = self.read_octal_escape(start, escaped)?;
                if code > 0x7F {
                    return Err(self.error_at(start, "octal escape must be ASCII"));
                }
                char::from(code as u8)
            }
            'x' => {
                let code = self.read_hex_escape(start, 2)?;
                if code > 0x7F {
                    return Err(self.error_at(start, "\\x escape must be ASCII"));
                }
                char::from(code as u8)
            }
            'u' | 'U' => {
                let digits = if escaped == 'u' { 4 } else { 8 };
                let code = self.read_hex_escape(start, digits)?;
                char::from_u32(code)
                    .ok_or_else(|| self.error_at(start, "escape sequence is not a valid unicode code point"))?
            }
            other => {
                return Err(self.error_at(start, format!("invalid escape sequence: \\{}", other)));
            }
        };
        Ok(ch)
    }

    fn read_string(&mut self) -> Result<String, SyntaxError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\n' => return Err(self.error_at(start, "newline in string literal")),
                '\\' => {
                    let escape_start = self.position;
                    self.advance();
                    result.push(self.read_escape(escape_start)?);
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error_at(start, "unterminated string: missing closing quote"))
    }

    fn read_raw_string(&mut self) -> Result<String, SyntaxError> {
        let start = self.position;
        self.advance(); // opening backquote
        let body_start = self.position;

        while let Some(ch) = self.current_char() {
            if ch == '`' {
                let body = self.input[body_start..self.position].to_string();
                self.advance();
                return Ok(body);
            }
            self.advance();
        }

        Err(self.error_at(start, "unterminated raw string: missing closing backquote"))
    }

    fn read_digits(&mut self) {
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Length of an exponent marker (`e`, `e+`, `e-`) at `offset` when a
    /// digit follows it.
    fn exponent_marker(&self, offset: usize) -> Option<usize> {
        if !matches!(self.peek_char(offset), Some('e' | 'E')) {
            return None;
        }
        let len = if matches!(self.peek_char(offset + 1), Some('+' | '-')) { 2 } else { 1 };
        self.peek_char(offset + len)
            .is_some_and(|c| c.is_ascii_digit())
            .then_some(len)
    }

    /// Whether the `.` under the cursor belongs to the number before it.
    /// `1.5`, `1.` and `1.e3` are floats; `1.a` is a selector.
    fn dot_continues_number(&self) -> bool {
        match self.peek_char(1) {
            Some(c) if c.is_ascii_digit() => true,
            Some('e' | 'E') => self.exponent_marker(1).is_some(),
            Some(c) => !(c.is_alphabetic() || c == '_'),
            None => true,
        }
    }

    fn read_number(&mut self) -> Result<Token, SyntaxError> {
        let start = self.position;
        let mut is_float = false;

        self.read_digits();

        if self.current_char() == Some('.') && self.dot_continues_number() {
            is_float = true;
            self.advance();
            self.read_digits();
        }

        if let Some(len) = self.exponent_marker(0) {
            is_float = true;
            for _ in 0..len {
                self.advance();
            }
            self.read_digits();
        }

        if self.current_char().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.read_identifier();
            return Err(self.error_at(start, "invalid number literal"));
        }

        let text = &self.input[start..self.position];
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.error_at(start, format!("invalid float literal {}", text)))
        } else {
            text.parse::<i64>()
                .map(Token::Integer)
                .map_err(|_| self.error_at(start, format!("integer literal {} out of range", text)))
        }
    }

    /// Consumes a one- or two-character operator, choosing the two-character
    /// form when `second` follows.
    fn operator(&mut self, second: char, double: Token, single: Token) -> Token {
        self.advance();
        if self.current_char() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn unsupported_operator(&mut self, start: usize, len: usize) -> SyntaxError {
        for _ in 0..len {
            self.advance();
        }
        let op = &self.input[start..self.position];
        self.error_at(start, format!("unsupported operator '{}'", op))
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, SyntaxError> {
        self.skip_whitespace();
        let start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('&') => {
                if self.peek_char(1) == Some('&') {
                    self.advance();
                    self.advance();
                    Token::AndAnd
                } else {
                    return Err(self.unsupported_operator(start, 1));
                }
            }
            Some('|') => {
                if self.peek_char(1) == Some('|') {
                    self.advance();
                    self.advance();
                    Token::OrOr
                } else {
                    return Err(self.unsupported_operator(start, 1));
                }
            }
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::EqEq
                } else {
                    return Err(self.unsupported_operator(start, 1));
                }
            }
            Some(':') => {
                let len = if self.peek_char(1) == Some('=') { 2 } else { 1 };
                return Err(self.unsupported_operator(start, len));
            }
            Some('<') if self.peek_char(1) == Some('<') => {
                return Err(self.unsupported_operator(start, 2));
            }
            Some('>') if self.peek_char(1) == Some('>') => {
                return Err(self.unsupported_operator(start, 2));
            }
            Some('<') => self.operator('=', Token::LtEq, Token::Lt),
            Some('>') => self.operator('=', Token::GtEq, Token::Gt),
            Some('!') => self.operator('=', Token::NotEq, Token::Bang),
            Some('+' | '*' | '/' | '%' | '^') => {
                return Err(self.unsupported_operator(start, 1));
            }
            Some('-') => {
                self.advance();
                Token::Minus
            }
            Some('.') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number()?,
            Some('.') => {
                self.advance();
                Token::Dot
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('(') => {
                self.advance();
                Token::LParen
            }
            Some(')') => {
                self.advance();
                Token::RParen
            }
            Some('"') => Token::String(self.read_string()?),
            Some('`') => Token::String(self.read_raw_string()?),
            Some('\'') => {
                self.advance();
                return Err(self.error_at(start, "unsupported constant: character literals are not allowed"));
            }
            Some('[' | ']' | '{' | '}' | ';') => {
                self.advance();
                return Err(self.error_at(start, "unsupported expression"));
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => Token::Identifier(self.read_identifier()),
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) => {
                self.advance();
                return Err(self.error_at(start, format!("unexpected character '{}'", ch)));
            }
        };

        Ok(SpannedToken {
            token,
            span: start..self.position,
        })
    }

    /// Reads every token up to and including [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }
}
