use super::token::TokenKind;
use arch::Opcode;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root(pub Vec<Decl>);

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Func {
        name: String,
        args: Vec<String>,
        body: Scope,
        offset: usize,
    },
    Global {
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope(pub Vec<Stmt>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Scope(Scope),
    Var {
        name: String,
        init: Option<Expr>,
        offset: usize,
    },
    Assign {
        name: String,
        value: Expr,
        offset: usize,
    },
    Write {
        addr: Expr,
        value: Expr,
    },
    Return(Option<Expr>),
    If {
        cond: Expr,
        body: Box<Stmt>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Expr(Expr),
}

/// Head of an `if`/`while` whose body statement has not been parsed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    If(Expr),
    While(Expr),
}

impl Modifier {
    pub fn bind(self, body: Stmt) -> Stmt {
        let body = Box::new(body);
        match self {
            Modifier::If(cond) => Stmt::If { cond, body },
            Modifier::While(cond) => Stmt::While { cond, body },
        }
    }
}

/// What a statement rule yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Stmt(Stmt),
    Modifier(Modifier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(u16),
    Var {
        name: String,
        offset: usize,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        offset: usize,
    },
    Paren(Box<Expr>),
    /// Operators fold strictly left to right: `a - b * c` is `(a - b) * c`.
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        use TokenKind::*;
        Some(match kind {
            Plus => BinOp::Add,
            Minus => BinOp::Sub,
            Star => BinOp::Mul,
            Slash => BinOp::Div,
            Percent => BinOp::Mod,
            Ampasand => BinOp::And,
            Pipe => BinOp::Or,
            Caret => BinOp::Xor,
            LAngleLAngle => BinOp::Shl,
            RAngleRAngle => BinOp::Shr,
            EqualEqual => BinOp::Eq,
            ExclEqual => BinOp::Neq,
            LAngle => BinOp::Lt,
            RAngle => BinOp::Gt,
            LAngleEqual => BinOp::Le,
            RAngleEqual => BinOp::Ge,
            _ => return None,
        })
    }

    pub fn opcode(self) -> Opcode {
        match self {
            BinOp::Add => Opcode::ADD,
            BinOp::Sub => Opcode::SUB,
            BinOp::Mul => Opcode::MUL,
            BinOp::Div => Opcode::DIV,
            BinOp::Mod => Opcode::MOD,
            BinOp::And => Opcode::AND,
            BinOp::Or => Opcode::OR,
            BinOp::Xor => Opcode::XOR,
            BinOp::Shl => Opcode::SHL,
            BinOp::Shr => Opcode::SHR,
            BinOp::Eq => Opcode::EQ,
            BinOp::Neq => Opcode::NEQ,
            BinOp::Lt => Opcode::LT,
            BinOp::Gt => Opcode::GT,
            BinOp::Le => Opcode::LE,
            BinOp::Ge => Opcode::GE,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
        }
    }
}

// ----------------------------------------------------------------------------
// Tree dump
// ----------------------------------------------------------------------------

const INDENT: &str = "    ";

fn line(out: &mut String, indent: usize, text: impl std::fmt::Display) {
    let _ = writeln!(out, "{}{}", INDENT.repeat(indent), text);
}

impl Root {
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for decl in &self.0 {
            decl.describe(0, &mut out);
        }
        out
    }
}

impl Decl {
    pub fn describe(&self, indent: usize, out: &mut String) {
        match self {
            Decl::Func { name, args, body, .. } => {
                line(out, indent, format!("func {}({})", name, args.join(", ")));
                body.describe(indent + 1, out);
            }
            Decl::Global { name } => line(out, indent, format!("global {name}")),
        }
    }
}

impl Scope {
    pub fn describe(&self, indent: usize, out: &mut String) {
        line(out, indent, "scope");
        for stmt in &self.0 {
            stmt.describe(indent + 1, out);
        }
    }
}

impl Stmt {
    pub fn describe(&self, indent: usize, out: &mut String) {
        match self {
            Stmt::Scope(scope) => scope.describe(indent, out),
            Stmt::Var { name, init, .. } => {
                line(out, indent, format!("var {name}"));
                if let Some(init) = init {
                    init.describe(indent + 1, out);
                }
            }
            Stmt::Assign { name, value, .. } => {
                line(out, indent, format!("assign {name}"));
                value.describe(indent + 1, out);
            }
            Stmt::Write { addr, value } => {
                line(out, indent, "write");
                addr.describe(indent + 1, out);
                value.describe(indent + 1, out);
            }
            Stmt::Return(value) => {
                line(out, indent, "return");
                if let Some(value) = value {
                    value.describe(indent + 1, out);
                }
            }
            Stmt::If { cond, body } => {
                line(out, indent, "if");
                cond.describe(indent + 1, out);
                body.describe(indent + 1, out);
            }
            Stmt::While { cond, body } => {
                line(out, indent, "while");
                cond.describe(indent + 1, out);
                body.describe(indent + 1, out);
            }
            Stmt::Expr(expr) => {
                line(out, indent, "expr");
                expr.describe(indent + 1, out);
            }
        }
    }
}

impl Expr {
    pub fn describe(&self, indent: usize, out: &mut String) {
        match self {
            Expr::Int(n) => line(out, indent, n),
            Expr::Var { name, .. } => line(out, indent, name),
            Expr::Call { name, args, .. } => {
                line(out, indent, format!("call {name}"));
                for arg in args {
                    arg.describe(indent + 1, out);
                }
            }
            Expr::Paren(inner) => {
                line(out, indent, "()");
                inner.describe(indent + 1, out);
            }
            Expr::Binary { left, op, right } => {
                line(out, indent, op.symbol());
                left.describe(indent + 1, out);
                right.describe(indent + 1, out);
            }
        }
    }
}
