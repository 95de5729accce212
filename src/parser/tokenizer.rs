//! Tokenizer for formula expressions.
//!
//! A single left-to-right scan over the input bytes, one token per matched
//! run. The scanner is context-free and infallible: whitespace produces no
//! token, and any byte outside the grammar is silently skipped. That skip
//! is long-standing observable behavior of the expression language and is
//! pinned by tests; do not turn it into an error.

use std::fmt;

/// One lexical token of a formula expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal (no sign, no exponent, at most one decimal point)
    Number(f64),
    /// Identifier: `[A-Za-z_][A-Za-z0-9_]*`
    Identifier(String),
    /// One of the arithmetic operators `+ - * / %`
    Operator(char),
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Argument separator `,`
    Comma,
    /// Path separator `.`
    Dot,
}

impl Token {
    /// Get the identifier text, if this token is one.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Token::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Identifier(name) => write!(f, "{name}"),
            Token::Operator(op) => write!(f, "{op}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Dot => write!(f, "."),
        }
    }
}

/// Byte-cursor scanner over one expression string.
#[derive(Clone)]
pub struct Tokenizer<'input> {
    bytes: &'input [u8],
    pos: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a tokenizer over `input`.
    pub fn new(input: &'input str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn slice(&self, start: usize, end: usize) -> &'input str {
        // Token runs are pure ASCII, so the slice is always valid UTF-8.
        std::str::from_utf8(&self.bytes[start..end]).unwrap_or("")
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let byte = self.peek_byte()?;
            match byte {
                b if b.is_ascii_whitespace() => {
                    self.pos += 1;
                }
                b'0'..=b'9' => return Some(self.scan_number()),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => return Some(self.scan_identifier()),
                b'+' | b'-' | b'*' | b'/' | b'%' => {
                    self.pos += 1;
                    return Some(Token::Operator(byte as char));
                }
                b'(' => {
                    self.pos += 1;
                    return Some(Token::LeftParen);
                }
                b')' => {
                    self.pos += 1;
                    return Some(Token::RightParen);
                }
                b',' => {
                    self.pos += 1;
                    return Some(Token::Comma);
                }
                b'.' => {
                    self.pos += 1;
                    return Some(Token::Dot);
                }
                // Anything else is dropped without a token (pinned quirk).
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        // Consume a decimal point only when a digit follows, so `1.` and
        // `leftLeg.peakFlexion` still tokenize their dots separately.
        if self.peek_byte() == Some(b'.')
            && matches!(self.bytes.get(self.pos + 1).copied(), Some(b'0'..=b'9'))
        {
            self.pos += 1;
            while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        let text = self.slice(start, self.pos);
        Token::Number(text.parse().unwrap_or(f64::NAN))
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.pos;
        while matches!(
            self.peek_byte(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.pos += 1;
        }
        Token::Identifier(self.slice(start, self.pos).to_string())
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Lex a whole expression into a flat token stream. Infallible and
/// deterministic; output order matches input order.
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}
