//! Rules of the standard grammar.

use super::ast::{Decl, Expr, Head, Modifier, Scope, Stmt};
use super::parsercore::{Parse, ParseResult, Parser};
use super::token::TokenKind;
use crate::error::Error;
use crate::{check, expect};

// ----------------------------------------------------------------------------
// Root rules
// ----------------------------------------------------------------------------

/// `func name(arg, ...) { ... }`
pub fn func_decl(p: &Parser<'_>, pos: usize) -> ParseResult<Decl> {
    if !check!(p, pos, TokenKind::KwFunc) {
        return Ok(Parse::NoMatch);
    }
    let offset = p.peek(pos + 1).offset;
    let (name, pos) = p.expect_ident(pos + 1, "expected identifier after 'func'")?;
    let mut pos = expect!(p, pos, TokenKind::LParen, "expected '(' after function name");

    let mut args = vec![];
    if !check!(p, pos, TokenKind::RParen) {
        loop {
            let (arg, next) = p.expect_ident(pos, "expected parameter name")?;
            args.push(arg);
            pos = next;
            if !check!(p, pos, TokenKind::Comma) {
                break;
            }
            pos += 1;
        }
    }
    let pos = expect!(p, pos, TokenKind::RParen, "expected ')' or ',' after parameter");

    match scope(p, pos)? {
        Parse::Matched(body, next) => Ok(Parse::Matched(
            Decl::Func {
                name,
                args,
                body,
                offset,
            },
            next,
        )),
        Parse::NoMatch => Err(Error::syntax(
            p.peek(pos).offset,
            "expected '{' to open the function body",
        )),
    }
}

/// `var name;`
pub fn global_var(p: &Parser<'_>, pos: usize) -> ParseResult<Decl> {
    if !check!(p, pos, TokenKind::KwVar) {
        return Ok(Parse::NoMatch);
    }
    let (name, pos) = p.expect_ident(pos + 1, "expected variable name after 'var'")?;
    let pos = expect!(p, pos, TokenKind::Semicolon, "expected ';' after global variable");
    Ok(Parse::Matched(Decl::Global { name }, pos))
}

// ----------------------------------------------------------------------------
// Statement rules
// ----------------------------------------------------------------------------

/// `{ statement* }`
pub fn scope(p: &Parser<'_>, pos: usize) -> ParseResult<Scope> {
    if !check!(p, pos, TokenKind::LCurly) {
        return Ok(Parse::NoMatch);
    }
    let mut stmts = vec![];
    let mut pos = pos + 1;
    loop {
        match &p.peek(pos).kind {
            TokenKind::RCurly => return Ok(Parse::Matched(Scope(stmts), pos + 1)),
            TokenKind::End => {
                return Err(Error::syntax(
                    p.peek(pos).offset,
                    "expected '}' at the end of scope",
                ))
            }
            _ => {
                let (stmt, next) = p.parse_statement(pos)?;
                stmts.push(stmt);
                pos = next;
            }
        }
    }
}

pub fn scope_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    Ok(match scope(p, pos)? {
        Parse::Matched(scope, next) => Parse::Matched(Head::Stmt(Stmt::Scope(scope)), next),
        Parse::NoMatch => Parse::NoMatch,
    })
}

/// `if cond` (body attached by the parser)
pub fn if_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    if !check!(p, pos, TokenKind::KwIf) {
        return Ok(Parse::NoMatch);
    }
    let (cond, pos) = p.expect_expression(pos + 1, "expected condition after 'if'")?;
    Ok(Parse::Matched(Head::Modifier(Modifier::If(cond)), pos))
}

/// `while cond` (body attached by the parser)
pub fn while_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    if !check!(p, pos, TokenKind::KwWhile) {
        return Ok(Parse::NoMatch);
    }
    let (cond, pos) = p.expect_expression(pos + 1, "expected condition after 'while'")?;
    Ok(Parse::Matched(Head::Modifier(Modifier::While(cond)), pos))
}

/// `var name [= expr];`
pub fn var_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    if !check!(p, pos, TokenKind::KwVar) {
        return Ok(Parse::NoMatch);
    }
    let offset = p.peek(pos + 1).offset;
    let (name, mut pos) = p.expect_ident(pos + 1, "expected variable name after 'var'")?;
    let mut init = None;
    if check!(p, pos, TokenKind::Equal) {
        let (value, next) = p.expect_expression(pos + 1, "expected expression after '='")?;
        init = Some(value);
        pos = next;
    }
    let pos = expect!(p, pos, TokenKind::Semicolon, "expected ';'");
    Ok(Parse::Matched(Head::Stmt(Stmt::Var { name, init, offset }), pos))
}

/// `return [expr];`
pub fn return_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    if !check!(p, pos, TokenKind::KwReturn) {
        return Ok(Parse::NoMatch);
    }
    let (value, pos) = match p.parse_expression(pos + 1)? {
        Parse::Matched(value, next) => (Some(value), next),
        Parse::NoMatch => (None, pos + 1),
    };
    let pos = expect!(p, pos, TokenKind::Semicolon, "expected ';'");
    Ok(Parse::Matched(Head::Stmt(Stmt::Return(value)), pos))
}

/// `write addr value;`
pub fn write_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    if !check!(p, pos, TokenKind::KwWrite) {
        return Ok(Parse::NoMatch);
    }
    let (addr, pos) = p.expect_expression(pos + 1, "expected address after 'write'")?;
    let (value, pos) = p.expect_expression(pos, "expected value to write")?;
    let pos = expect!(p, pos, TokenKind::Semicolon, "expected ';'");
    Ok(Parse::Matched(Head::Stmt(Stmt::Write { addr, value }), pos))
}

/// `name = expr;`
pub fn assign_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    let TokenKind::Ident(name) = &p.peek(pos).kind else {
        return Ok(Parse::NoMatch);
    };
    if !check!(p, pos + 1, TokenKind::Equal) {
        return Ok(Parse::NoMatch);
    }
    let offset = p.peek(pos).offset;
    let (value, pos) = p.expect_expression(pos + 2, "expected expression after '='")?;
    let pos = expect!(p, pos, TokenKind::Semicolon, "expected ';'");
    let stmt = Stmt::Assign {
        name: name.clone(),
        value,
        offset,
    };
    Ok(Parse::Matched(Head::Stmt(stmt), pos))
}

/// `expr;`
pub fn expr_stmt(p: &Parser<'_>, pos: usize) -> ParseResult<Head> {
    let Parse::Matched(expr, pos) = p.parse_expression(pos)? else {
        return Ok(Parse::NoMatch);
    };
    let pos = expect!(p, pos, TokenKind::Semicolon, "expected ';'");
    Ok(Parse::Matched(Head::Stmt(Stmt::Expr(expr)), pos))
}

// ----------------------------------------------------------------------------
// Value rules
// ----------------------------------------------------------------------------

pub fn integer(p: &Parser<'_>, pos: usize) -> ParseResult<Expr> {
    Ok(match p.peek(pos).kind {
        TokenKind::Number(n) => Parse::Matched(Expr::Int(n), pos + 1),
        _ => Parse::NoMatch,
    })
}

/// `name(expr, ...)`
pub fn call(p: &Parser<'_>, pos: usize) -> ParseResult<Expr> {
    let TokenKind::Ident(name) = &p.peek(pos).kind else {
        return Ok(Parse::NoMatch);
    };
    if !check!(p, pos + 1, TokenKind::LParen) {
        return Ok(Parse::NoMatch);
    }
    let offset = p.peek(pos).offset;
    let mut pos = pos + 2;
    let mut args = vec![];
    if !check!(p, pos, TokenKind::RParen) {
        loop {
            let (arg, next) = p.expect_expression(pos, "expected argument expression")?;
            args.push(arg);
            pos = next;
            if !check!(p, pos, TokenKind::Comma) {
                break;
            }
            pos += 1;
        }
    }
    let pos = expect!(p, pos, TokenKind::RParen, "expected ')' or ',' after argument");
    let name = name.clone();
    Ok(Parse::Matched(Expr::Call { name, args, offset }, pos))
}

pub fn variable(p: &Parser<'_>, pos: usize) -> ParseResult<Expr> {
    Ok(match &p.peek(pos).kind {
        TokenKind::Ident(name) => Parse::Matched(
            Expr::Var {
                name: name.clone(),
                offset: p.peek(pos).offset,
            },
            pos + 1,
        ),
        _ => Parse::NoMatch,
    })
}

/// `( expr )`
pub fn parentheses(p: &Parser<'_>, pos: usize) -> ParseResult<Expr> {
    if !check!(p, pos, TokenKind::LParen) {
        return Ok(Parse::NoMatch);
    }
    let (inner, pos) = p.expect_expression(pos + 1, "expected expression after '('")?;
    let pos = expect!(p, pos, TokenKind::RParen, "expected ')'");
    Ok(Parse::Matched(Expr::Paren(Box::new(inner)), pos))
}
