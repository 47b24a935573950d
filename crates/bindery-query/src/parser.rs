//! Pratt parser turning tokens into an [`Ast`].
//!
//! Binding powers come from [`Token::lbp`]. Projections (`[*]`, `.*`, `[]`,
//! `[?...]`, slices) collect everything to their right that binds tighter
//! than [`PROJECTION_STOP`], so `a[*].b | c` applies `.b` per element and
//! `c` to the projected list.

use serde_json::Value;

use crate::ast::Ast;
use crate::error::{QueryError, Result};
use crate::functions;
use crate::lexer::{tokenize, Token};

/// Tokens with a lower binding power end a projection's right-hand side.
const PROJECTION_STOP: u8 = 10;

/// Deepest nesting of sub-expressions accepted before parsing gives up.
const MAX_DEPTH: usize = 256;

/// Parses an expression string into an expression tree.
pub(crate) fn parse(expr: &str) -> Result<Ast> {
    let mut parser = Parser {
        tokens: tokenize(expr)?,
        index: 0,
        depth: 0,
    };
    let ast = parser.expr(0)?;
    match parser.peek() {
        Token::Eof => Ok(ast),
        other => Err(parser.unexpected(other.clone())),
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
    depth: usize,
}

enum Bracket {
    Index(i64),
    Slice(Option<i64>, Option<i64>, Option<i64>),
}

impl Parser {
    fn peek(&self) -> &Token {
        self.tokens
            .get(self.index)
            .map(|(_, token)| token)
            .unwrap_or(&Token::Eof)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .or_else(|| self.tokens.last())
            .map(|(pos, _)| *pos)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(QueryError::syntax(
                self.position(),
                format!("expected {}, found {}", what, describe(self.peek())),
            ))
        }
    }

    fn unexpected(&self, token: Token) -> QueryError {
        QueryError::syntax(
            self.position(),
            format!("unexpected {}", describe(&token)),
        )
    }

    fn expr(&mut self, rbp: u8) -> Result<Ast> {
        if self.depth >= MAX_DEPTH {
            return Err(QueryError::syntax(
                self.position(),
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        let parsed = self.binding(rbp);
        self.depth -= 1;
        parsed
    }

    fn binding(&mut self, rbp: u8) -> Result<Ast> {
        let mut left = self.nud()?;
        while rbp < self.peek().lbp() {
            left = self.led(left)?;
        }
        Ok(left)
    }

    fn nud(&mut self) -> Result<Ast> {
        let start = self.position();
        match self.advance() {
            Token::At => Ok(Ast::Identity),
            Token::Identifier(name) => Ok(Ast::Field(name)),
            Token::QuotedIdentifier(name) => {
                if *self.peek() == Token::LParen {
                    return Err(QueryError::syntax(
                        start,
                        "quoted identifiers cannot be called as functions",
                    ));
                }
                Ok(Ast::Field(name))
            }
            Token::RawString(s) => Ok(Ast::Literal(Value::String(s))),
            Token::Literal(value) => Ok(Ast::Literal(value)),
            Token::Number(n) => Ok(Ast::Literal(Value::from(n))),
            Token::Star => {
                let rhs = self.projection_rhs(Token::Star.lbp())?;
                Ok(Ast::ObjectProjection(Box::new(Ast::Identity), Box::new(rhs)))
            }
            Token::Flatten => {
                let rhs = self.projection_rhs(Token::Flatten.lbp())?;
                Ok(Ast::Projection(
                    Box::new(Ast::Flatten(Box::new(Ast::Identity))),
                    Box::new(rhs),
                ))
            }
            Token::Filter => self.filter(Ast::Identity),
            Token::LBracket => match self.peek() {
                Token::Number(_) | Token::Colon => match self.bracket()? {
                    Bracket::Index(i) => Ok(Ast::Index(i)),
                    Bracket::Slice(start, stop, step) => {
                        let rhs = self.projection_rhs(Token::Star.lbp())?;
                        Ok(Ast::Projection(
                            Box::new(Ast::Slice { start, stop, step }),
                            Box::new(rhs),
                        ))
                    }
                },
                Token::Star if self.tokens.get(self.index + 1).map(|(_, t)| t)
                    == Some(&Token::RBracket) =>
                {
                    self.advance();
                    self.advance();
                    let rhs = self.projection_rhs(Token::Star.lbp())?;
                    Ok(Ast::Projection(Box::new(Ast::Identity), Box::new(rhs)))
                }
                _ => self.multi_list(),
            },
            Token::LBrace => self.multi_hash(),
            Token::Not => {
                let inner = self.expr(Token::Not.lbp())?;
                Ok(Ast::Not(Box::new(inner)))
            }
            Token::LParen => {
                let inner = self.expr(0)?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            other => Err(QueryError::syntax(
                start,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }

    fn led(&mut self, left: Ast) -> Result<Ast> {
        let start = self.position();
        match self.advance() {
            Token::Dot => {
                if *self.peek() == Token::Star {
                    self.advance();
                    let rhs = self.projection_rhs(Token::Star.lbp())?;
                    Ok(Ast::ObjectProjection(Box::new(left), Box::new(rhs)))
                } else {
                    let rhs = self.dot_rhs(Token::Dot.lbp())?;
                    Ok(Ast::Subexpr(Box::new(left), Box::new(rhs)))
                }
            }
            Token::Pipe => {
                let rhs = self.expr(Token::Pipe.lbp())?;
                Ok(Ast::Pipe(Box::new(left), Box::new(rhs)))
            }
            Token::Or => {
                let rhs = self.expr(Token::Or.lbp())?;
                Ok(Ast::Or(Box::new(left), Box::new(rhs)))
            }
            Token::And => {
                let rhs = self.expr(Token::And.lbp())?;
                Ok(Ast::And(Box::new(left), Box::new(rhs)))
            }
            Token::Comparator(op) => {
                let rhs = self.expr(Token::Comparator(op).lbp())?;
                Ok(Ast::Comparison(op, Box::new(left), Box::new(rhs)))
            }
            Token::Flatten => {
                let rhs = self.projection_rhs(Token::Flatten.lbp())?;
                Ok(Ast::Projection(
                    Box::new(Ast::Flatten(Box::new(left))),
                    Box::new(rhs),
                ))
            }
            Token::Filter => self.filter(left),
            Token::LBracket => match self.peek() {
                Token::Number(_) | Token::Colon => match self.bracket()? {
                    Bracket::Index(i) => Ok(Ast::Subexpr(Box::new(left), Box::new(Ast::Index(i)))),
                    Bracket::Slice(start, stop, step) => {
                        let rhs = self.projection_rhs(Token::Star.lbp())?;
                        Ok(Ast::Projection(
                            Box::new(Ast::Subexpr(
                                Box::new(left),
                                Box::new(Ast::Slice { start, stop, step }),
                            )),
                            Box::new(rhs),
                        ))
                    }
                },
                Token::Star => {
                    self.advance();
                    self.expect(Token::RBracket, "']'")?;
                    let rhs = self.projection_rhs(Token::Star.lbp())?;
                    Ok(Ast::Projection(Box::new(left), Box::new(rhs)))
                }
                other => Err(self.unexpected(other.clone())),
            },
            Token::LParen => match left {
                Ast::Field(name) => self.function(name, start),
                _ => Err(QueryError::syntax(start, "only named functions can be called")),
            },
            other => Err(QueryError::syntax(
                start,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }

    /// Right-hand side after a `.`: an identifier, function call,
    /// multi-select list or multi-select hash.
    fn dot_rhs(&mut self, rbp: u8) -> Result<Ast> {
        match self.peek() {
            Token::Identifier(_) | Token::QuotedIdentifier(_) => self.expr(rbp),
            Token::LBracket => {
                self.advance();
                self.multi_list()
            }
            Token::LBrace => {
                self.advance();
                self.multi_hash()
            }
            other => Err(QueryError::syntax(
                self.position(),
                format!("expected identifier after '.', found {}", describe(other)),
            )),
        }
    }

    /// Expression applied to each element of a projection.
    fn projection_rhs(&mut self, rbp: u8) -> Result<Ast> {
        let token = self.peek().clone();
        if token.lbp() < PROJECTION_STOP {
            return Ok(Ast::Identity);
        }
        match token {
            Token::Dot => {
                self.advance();
                self.dot_rhs(rbp)
            }
            Token::LBracket | Token::Filter => self.expr(rbp),
            other => Err(self.unexpected(other)),
        }
    }

    fn filter(&mut self, left: Ast) -> Result<Ast> {
        let cond = self.expr(0)?;
        self.expect(Token::RBracket, "']' to close filter")?;
        let rhs = self.projection_rhs(Token::Filter.lbp())?;
        Ok(Ast::Filter {
            lhs: Box::new(left),
            cond: Box::new(cond),
            rhs: Box::new(rhs),
        })
    }

    /// Parses the inside of `[n]` or `[start:stop:step]` after the `[`.
    fn bracket(&mut self) -> Result<Bracket> {
        let start = self.position();
        let mut parts: [Option<i64>; 3] = [None; 3];
        let mut slot = 0;
        loop {
            match self.advance() {
                Token::Number(n) => {
                    if parts[slot].is_some() {
                        return Err(QueryError::syntax(self.position(), "expected ':' or ']'"));
                    }
                    parts[slot] = Some(n);
                }
                Token::Colon => {
                    slot += 1;
                    if slot > 2 {
                        return Err(QueryError::syntax(start, "too many ':' in slice"));
                    }
                }
                Token::RBracket => break,
                other => return Err(self.unexpected(other)),
            }
        }

        if slot == 0 {
            return match parts[0] {
                Some(i) => Ok(Bracket::Index(i)),
                None => Err(QueryError::syntax(start, "expected index")),
            };
        }
        if parts[2] == Some(0) {
            return Err(QueryError::syntax(start, "slice step cannot be 0"));
        }
        Ok(Bracket::Slice(parts[0], parts[1], parts[2]))
    }

    /// `[a, b, ...]` with the opening bracket already consumed.
    fn multi_list(&mut self) -> Result<Ast> {
        let mut items = Vec::new();
        loop {
            items.push(self.expr(0)?);
            match self.advance() {
                Token::Comma => continue,
                Token::RBracket => break,
                other => return Err(self.unexpected(other)),
            }
        }
        Ok(Ast::MultiList(items))
    }

    /// `{key: expr, ...}` with the opening brace already consumed.
    fn multi_hash(&mut self) -> Result<Ast> {
        let mut entries = Vec::new();
        loop {
            let key = match self.advance() {
                Token::Identifier(k) | Token::QuotedIdentifier(k) => k,
                other => return Err(self.unexpected(other)),
            };
            self.expect(Token::Colon, "':'")?;
            let value = self.expr(0)?;
            entries.push((key, value));
            match self.advance() {
                Token::Comma => continue,
                Token::RBrace => break,
                other => return Err(self.unexpected(other)),
            }
        }
        Ok(Ast::MultiHash(entries))
    }

    fn function(&mut self, name: String, start: usize) -> Result<Ast> {
        let mut args = Vec::new();
        if *self.peek() == Token::RParen {
            self.advance();
        } else {
            loop {
                args.push(self.expr(0)?);
                match self.advance() {
                    Token::Comma => continue,
                    Token::RParen => break,
                    other => return Err(self.unexpected(other)),
                }
            }
        }
        functions::check_call(&name, args.len()).map_err(|err| match err {
            QueryError::Syntax { message, .. } => QueryError::syntax(start, message),
            other => other,
        })?;
        Ok(Ast::Function(name, args))
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Identifier(name) => format!("identifier '{}'", name),
        Token::QuotedIdentifier(name) => format!("quoted identifier \"{}\"", name),
        Token::RawString(s) => format!("string '{}'", s),
        Token::Literal(v) => format!("literal `{}`", v),
        Token::Number(n) => format!("number {}", n),
        Token::Comparator(op) => format!("'{}'", op),
        Token::Eof => "end of expression".to_string(),
        other => {
            let text = match other {
                Token::Dot => ".",
                Token::Star => "*",
                Token::Flatten => "[]",
                Token::Filter => "[?",
                Token::LBracket => "[",
                Token::RBracket => "]",
                Token::LBrace => "{",
                Token::RBrace => "}",
                Token::LParen => "(",
                Token::RParen => ")",
                Token::Comma => ",",
                Token::Colon => ":",
                Token::Pipe => "|",
                Token::Or => "||",
                Token::And => "&&",
                Token::Not => "!",
                Token::At => "@",
                _ => "token",
            };
            format!("'{}'", text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Op;

    fn field(name: &str) -> Box<Ast> {
        Box::new(Ast::Field(name.to_string()))
    }

    #[test]
    fn parse_index() {
        assert_eq!(parse("[0]").unwrap(), Ast::Index(0));
    }

    #[test]
    fn parse_subexpression() {
        assert_eq!(
            parse("a.b").unwrap(),
            Ast::Subexpr(field("a"), field("b"))
        );
    }

    #[test]
    fn parse_wildcard_projection() {
        assert_eq!(
            parse("items[*].name").unwrap(),
            Ast::Projection(field("items"), field("name"))
        );
    }

    #[test]
    fn parse_projection_stops_at_pipe() {
        assert_eq!(
            parse("[*].name | [0]").unwrap(),
            Ast::Pipe(
                Box::new(Ast::Projection(Box::new(Ast::Identity), field("name"))),
                Box::new(Ast::Index(0))
            )
        );
    }

    #[test]
    fn parse_filter_with_comparison() {
        assert_eq!(
            parse("[?size > `10`].name").unwrap(),
            Ast::Filter {
                lhs: Box::new(Ast::Identity),
                cond: Box::new(Ast::Comparison(
                    Op::Gt,
                    field("size"),
                    Box::new(Ast::Literal(Value::from(10)))
                )),
                rhs: field("name"),
            }
        );
    }

    #[test]
    fn parse_and_binds_tighter_than_or() {
        assert_eq!(
            parse("a || b && c").unwrap(),
            Ast::Or(
                field("a"),
                Box::new(Ast::And(field("b"), field("c")))
            )
        );
    }

    #[test]
    fn parse_slice() {
        assert_eq!(
            parse("[1:-1:2]").unwrap(),
            Ast::Projection(
                Box::new(Ast::Slice {
                    start: Some(1),
                    stop: Some(-1),
                    step: Some(2)
                }),
                Box::new(Ast::Identity)
            )
        );
    }

    #[test]
    fn parse_multi_select() {
        assert_eq!(
            parse("{n: name, s: size}").unwrap(),
            Ast::MultiHash(vec![
                ("n".into(), Ast::Field("name".into())),
                ("s".into(), Ast::Field("size".into())),
            ])
        );
        assert_eq!(
            parse("a.[b, c]").unwrap(),
            Ast::Subexpr(
                field("a"),
                Box::new(Ast::MultiList(vec![
                    Ast::Field("b".into()),
                    Ast::Field("c".into())
                ]))
            )
        );
    }

    #[test]
    fn parse_function_call() {
        assert_eq!(
            parse("length(@)").unwrap(),
            Ast::Function("length".into(), vec![Ast::Identity])
        );
    }

    #[test]
    fn parse_rejects_unknown_function() {
        assert_eq!(
            parse("frobnicate(@)"),
            Err(QueryError::UnknownFunction("frobnicate".into()))
        );
    }

    #[test]
    fn parse_rejects_bad_arity() {
        assert!(matches!(
            parse("length(a, b)"),
            Err(QueryError::InvalidArity { .. })
        ));
    }

    #[test]
    fn parse_errors() {
        for bad in ["a.", "[0", "a[0:1:0]", "{a b}", "a b", "(a", "a.1", ""] {
            assert!(parse(bad).is_err(), "expected error for {:?}", bad);
        }
    }
}
