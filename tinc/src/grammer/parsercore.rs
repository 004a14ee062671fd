use super::ast::{BinOp, Decl, Expr, Head, Root, Stmt};
use super::grammar::{Grammar, Rule};
use super::token::{Token, TokenKind};
use crate::error::Error;

/// Outcome of trying one rule at one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parse<T> {
    /// The rule's leading tokens do not apply; nothing was consumed.
    NoMatch,
    /// Parsed node and the position of the first unconsumed token.
    Matched(T, usize),
}

/// `Err` is a committed syntax error.
pub type ParseResult<T> = Result<Parse<T>, Error>;

pub struct Parser<'a> {
    tokens: &'a [Token],
    grammar: &'a Grammar,
    end: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], grammar: &'a Grammar) -> Self {
        let offset = tokens.last().map_or(0, |t| t.offset);
        Parser {
            tokens,
            grammar,
            end: Token::new(TokenKind::End, offset),
        }
    }
}

// ----------------------------------------------------------------------------
// Token access
// ----------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// Token at `pos`; past the end this is always `End`.
    pub fn peek(&self, pos: usize) -> &Token {
        self.tokens.get(pos).unwrap_or(&self.end)
    }

    /// Check the token at `pos` against a condition
    pub fn check_if<F: Fn(&TokenKind) -> bool>(&self, pos: usize, cond: F) -> bool {
        cond(&self.peek(pos).kind)
    }

    /// Token at `pos` must match; returns the next position
    pub fn expect_tobe<F: Fn(&TokenKind) -> bool>(
        &self,
        pos: usize,
        cond: F,
        message: &str,
    ) -> Result<usize, Error> {
        let token = self.peek(pos);
        if cond(&token.kind) {
            Ok(pos + 1)
        } else {
            Err(Error::syntax(token.offset, message))
        }
    }

    /// Identifier at `pos` or a syntax error
    pub fn expect_ident(&self, pos: usize, message: &str) -> Result<(String, usize), Error> {
        match &self.peek(pos).kind {
            TokenKind::Ident(name) => Ok((name.clone(), pos + 1)),
            _ => Err(Error::syntax(self.peek(pos).offset, message)),
        }
    }

    /// First rule that matches at `pos` wins.
    fn first_match<T>(&self, rules: &[(&'static str, Rule<T>)], pos: usize) -> ParseResult<T> {
        for (_, rule) in rules {
            if let Parse::Matched(node, next) = rule(self, pos)? {
                return Ok(Parse::Matched(node, next));
            }
        }
        Ok(Parse::NoMatch)
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $pos:expr, $kind:pat) => {
        $parser.check_if($pos, |kind| matches!(kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $pos:expr, $kind:pat, $message:expr) => {
        $parser.expect_tobe($pos, |kind| matches!(kind, $kind), $message)?
    };
}

// ----------------------------------------------------------------------------
// Drivers
// ----------------------------------------------------------------------------

impl<'a> Parser<'a> {
    /// Parse top-level declarations until `End`.
    pub fn parse(&self) -> Result<Root, Error> {
        let mut decls: Vec<Decl> = vec![];
        let mut pos = 0;
        while !check!(self, pos, TokenKind::End) {
            match self.first_match(&self.grammar.root, pos)? {
                Parse::Matched(decl, next) => {
                    decls.push(decl);
                    pos = next;
                }
                Parse::NoMatch => {
                    return Err(Error::syntax(self.peek(pos).offset, "unrecognized statement"));
                }
            }
        }
        Ok(Root(decls))
    }

    /// Parse exactly one statement; a modifier takes the following statement as its body.
    pub fn parse_statement(&self, pos: usize) -> Result<(Stmt, usize), Error> {
        match self.first_match(&self.grammar.statement, pos)? {
            Parse::Matched(Head::Stmt(stmt), next) => Ok((stmt, next)),
            Parse::Matched(Head::Modifier(modifier), next) => {
                let (body, next) = self.parse_statement(next)?;
                Ok((modifier.bind(body), next))
            }
            Parse::NoMatch => {
                let token = self.peek(pos);
                let message = match token.kind {
                    TokenKind::End => "expected '}' at the end of scope",
                    TokenKind::RCurly => "expected statement",
                    _ => "unrecognized statement",
                };
                Err(Error::syntax(token.offset, message))
            }
        }
    }

    /// One value atom.
    pub fn parse_value(&self, pos: usize) -> ParseResult<Expr> {
        self.first_match(&self.grammar.value, pos)
    }

    /// Values joined by binary operators, folded left to right.
    pub fn parse_expression(&self, pos: usize) -> ParseResult<Expr> {
        let Parse::Matched(mut expr, mut pos) = self.parse_value(pos)? else {
            return Ok(Parse::NoMatch);
        };
        while let Some(op) = BinOp::from_token(&self.peek(pos).kind) {
            let message = format!("expected value after '{}'", op.symbol());
            let (right, next) = self.expect_value(pos + 1, &message)?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
            pos = next;
        }
        Ok(Parse::Matched(expr, pos))
    }

    /// Committed form of [`Parser::parse_expression`].
    pub fn expect_expression(&self, pos: usize, message: &str) -> Result<(Expr, usize), Error> {
        match self.parse_expression(pos)? {
            Parse::Matched(expr, next) => Ok((expr, next)),
            Parse::NoMatch => Err(Error::syntax(self.peek(pos).offset, message)),
        }
    }

    fn expect_value(&self, pos: usize, message: &str) -> Result<(Expr, usize), Error> {
        match self.parse_value(pos)? {
            Parse::Matched(expr, next) => Ok((expr, next)),
            Parse::NoMatch => Err(Error::syntax(self.peek(pos).offset, message)),
        }
    }
}
