//! Tokenizer for query expressions.

use serde_json::Value;

use crate::error::{QueryError, Result};
use crate::op::Op;

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Bare identifier: `name`
    Identifier(String),
    /// Quoted identifier: `"first name"`
    QuotedIdentifier(String),
    /// Raw string literal: `'text'`
    RawString(String),
    /// JSON literal: `` `{"a": 1}` ``
    Literal(Value),
    /// Integer, used by indexes and slices and as a literal elsewhere.
    Number(i64),
    Dot,
    Star,
    /// `[]`
    Flatten,
    /// `[?`
    Filter,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,
    Pipe,
    Or,
    And,
    Not,
    At,
    Comparator(Op),
    Eof,
}

impl Token {
    /// Left binding power used by the Pratt parser.
    pub(crate) fn lbp(&self) -> u8 {
        match self {
            Token::Pipe => 1,
            Token::Or => 2,
            Token::And => 3,
            Token::Comparator(_) => 5,
            Token::Flatten => 9,
            Token::Star => 20,
            Token::Filter => 21,
            Token::Dot => 40,
            Token::Not => 45,
            Token::LBrace => 50,
            Token::LBracket => 55,
            Token::LParen => 60,
            _ => 0,
        }
    }
}

/// Tokenizer over a query string.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes up to the next unescaped `delim`, returning the raw body.
    fn delimited(&mut self, delim: char, start: usize) -> Result<&'a str> {
        let body_start = self.pos;
        let mut escaped = false;
        while let Some(c) = self.bump() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == delim {
                return Ok(&self.input[body_start..self.pos - delim.len_utf8()]);
            }
        }
        Err(QueryError::syntax(
            start,
            format!("unterminated {} delimited token", delim),
        ))
    }

    fn identifier(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        Token::Identifier(self.input[start..self.pos].to_string())
    }

    fn number(&mut self, start: usize) -> Result<Token> {
        self.bump_if('-');
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        self.input[start..self.pos]
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|e| QueryError::syntax(start, format!("invalid number: {}", e)))
    }

    fn next_token(&mut self) -> Result<Option<(usize, Token)>> {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }

        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(Some((start, self.identifier(start))));
        }
        if c.is_ascii_digit() || (c == '-' && matches!(self.peek_second(), Some(d) if d.is_ascii_digit()))
        {
            return Ok(Some((start, self.number(start)?)));
        }

        self.bump();
        let token = match c {
            '.' => Token::Dot,
            '*' => Token::Star,
            '@' => Token::At,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ']' => Token::RBracket,
            '[' => {
                if self.bump_if(']') {
                    Token::Flatten
                } else if self.bump_if('?') {
                    Token::Filter
                } else {
                    Token::LBracket
                }
            }
            '|' => {
                if self.bump_if('|') {
                    Token::Or
                } else {
                    Token::Pipe
                }
            }
            '&' => {
                if self.bump_if('&') {
                    Token::And
                } else {
                    return Err(QueryError::syntax(
                        start,
                        "expression references are not supported",
                    ));
                }
            }
            '!' => {
                if self.bump_if('=') {
                    Token::Comparator(Op::Ne)
                } else {
                    Token::Not
                }
            }
            '=' => {
                if self.bump_if('=') {
                    Token::Comparator(Op::Eq)
                } else {
                    return Err(QueryError::syntax(start, "expected '==' but found '='"));
                }
            }
            '<' => {
                if self.bump_if('=') {
                    Token::Comparator(Op::Lte)
                } else {
                    Token::Comparator(Op::Lt)
                }
            }
            '>' => {
                if self.bump_if('=') {
                    Token::Comparator(Op::Gte)
                } else {
                    Token::Comparator(Op::Gt)
                }
            }
            '"' => {
                let body = self.delimited('"', start)?;
                let quoted = format!("\"{}\"", body);
                let name: String = serde_json::from_str(&quoted).map_err(|e| {
                    QueryError::syntax(start, format!("invalid quoted identifier: {}", e))
                })?;
                Token::QuotedIdentifier(name)
            }
            '\'' => {
                let body = self.delimited('\'', start)?;
                Token::RawString(body.replace("\\'", "'"))
            }
            '`' => {
                let body = self.delimited('`', start)?.replace("\\`", "`");
                let value: Value = serde_json::from_str(body.trim()).map_err(|e| {
                    QueryError::syntax(start, format!("invalid JSON literal: {}", e))
                })?;
                Token::Literal(value)
            }
            other => {
                return Err(QueryError::syntax(
                    start,
                    format!("unexpected character '{}'", other),
                ))
            }
        };

        Ok(Some((start, token)))
    }
}

/// Splits an expression into positioned tokens, terminated by [`Token::Eof`].
pub(crate) fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    tokens.push((input.len(), Token::Eof));
    Ok(tokens)
}
