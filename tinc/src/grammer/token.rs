use std::fmt;

/// A token and the byte offset where it starts. Equality ignores the offset.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Token { kind, offset }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Double character tokens
    EqualEqual,   // '=='
    ExclEqual,    // '!='
    LAngleEqual,  // '<='
    RAngleEqual,  // '>='
    LAngleLAngle, // '<<'
    RAngleRAngle, // '>>'

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    Percent,   // '%'
    Ampasand,  // '&'
    Pipe,      // '|'
    Caret,     // '^'
    LAngle,    // '<'
    RAngle,    // '>'
    LParen,    // '('
    RParen,    // ')'
    LCurly,    // '{'
    RCurly,    // '}'
    Semicolon, // ';'
    Comma,     // ','

    // Keywords
    KwFunc,   // "func"
    KwIf,     // "if"
    KwWhile,  // "while"
    KwVar,    // "var"
    KwReturn, // "return"
    KwWrite,  // "write"

    Ident(String),
    Number(u16),

    End,
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<Self> {
        use TokenKind::*;
        Some(match word {
            "func" => KwFunc,
            "if" => KwIf,
            "while" => KwWhile,
            "var" => KwVar,
            "return" => KwReturn,
            "write" => KwWrite,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            EqualEqual => "==",
            ExclEqual => "!=",
            LAngleEqual => "<=",
            RAngleEqual => ">=",
            LAngleLAngle => "<<",
            RAngleRAngle => ">>",
            Equal => "=",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Ampasand => "&",
            Pipe => "|",
            Caret => "^",
            LAngle => "<",
            RAngle => ">",
            LParen => "(",
            RParen => ")",
            LCurly => "{",
            RCurly => "}",
            Semicolon => ";",
            Comma => ",",
            KwFunc => "func",
            KwIf => "if",
            KwWhile => "while",
            KwVar => "var",
            KwReturn => "return",
            KwWrite => "write",
            Ident(name) => return write!(f, "identifier `{name}`"),
            Number(n) => return write!(f, "constant {n}"),
            End => "end of input",
        };
        write!(f, "'{s}'")
    }
}
