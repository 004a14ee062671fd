use super::token::{Token, TokenKind};
use crate::error::Error;
use std::iter::Peekable;
use std::num::IntErrorKind;
use std::str::CharIndices;

pub struct Lexer<'a> {
    code: &'a str,
    iter: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            code,
            iter: code.char_indices().peekable(),
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<(usize, char)> {
        self.iter.clone().nth(n)
    }
    fn consume(&mut self) -> Option<(usize, char)> {
        self.iter.next()
    }
    fn consume_while<F: Fn(char) -> bool>(&mut self, cond: F) -> &'a str {
        let start = self.iter.peek().map_or(self.code.len(), |(i, _)| *i);
        while self.iter.next_if(|(_, c)| cond(*c)).is_some() {}
        let end = self.iter.peek().map_or(self.code.len(), |(i, _)| *i);
        &self.code[start..end]
    }
}

// ----------------------------------------------------------------------------
// Lexer
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    /// Tokenize the whole input. The last token is always [`TokenKind::End`].
    pub fn parse(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        while let Some((idx, ch0)) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            // 1. Double character token
            if let Some((_, ch1)) = self.peek_nth(1) {
                if let Some(kind) = double_char_token(ch0, ch1) {
                    self.consume();
                    self.consume();
                    tokens.push(Token::new(kind, idx));
                    continue;
                }
            }

            // 2. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, idx));
                continue;
            }

            // 3. Number literal
            if ch0.is_ascii_digit() {
                let word = self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
                tokens.push(Token::new(TokenKind::Number(parse_number(word, idx)?), idx));
                continue;
            }

            // 4. Char literal
            if ch0 == '\'' {
                tokens.push(Token::new(self.parse_char(idx)?, idx));
                continue;
            }

            // 5. Keyword or identifier
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                let word = self.consume_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let kind = TokenKind::keyword(word)
                    .unwrap_or_else(|| TokenKind::Ident(word.to_string()));
                tokens.push(Token::new(kind, idx));
                continue;
            }

            return Err(Error::syntax(idx, format!("unexpected character '{ch0}'")));
        }
        tokens.push(Token::new(TokenKind::End, self.code.len()));
        Ok(tokens)
    }

    fn parse_char(&mut self, idx: usize) -> Result<TokenKind, Error> {
        let invalid = || Error::syntax(idx, "invalid character literal");
        self.consume(); // consume opening '
        let (_, ch1) = self.consume().ok_or_else(invalid)?;
        let value = if ch1 == '\\' {
            let (_, ch2) = self.consume().ok_or_else(invalid)?;
            match ch2 {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                '\\' => '\\',
                '\'' => '\'',
                _ => return Err(invalid()),
            }
        } else {
            ch1
        };
        match self.consume() {
            Some((_, '\'')) => {}
            _ => return Err(invalid()),
        }
        let value = u16::try_from(u32::from(value))
            .map_err(|_| Error::syntax(idx, "integer literal out of range"))?;
        Ok(TokenKind::Number(value))
    }
}

fn parse_number(word: &str, offset: usize) -> Result<u16, Error> {
    let (digits, radix) = if let Some(d) = word.strip_prefix("0x") {
        (d, 16)
    } else if let Some(d) = word.strip_prefix("0b") {
        (d, 2)
    } else {
        (word, 10)
    };
    let digits = digits.replace('_', "");
    let out_of_range = || Error::syntax(offset, "integer literal out of range");
    let value = u32::from_str_radix(&digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => out_of_range(),
        _ => Error::syntax(offset, format!("invalid integer literal '{word}'")),
    })?;
    u16::try_from(value).map_err(|_| out_of_range())
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match (ch0, ch1) {
        ('=', '=') => EqualEqual,
        ('!', '=') => ExclEqual,
        ('<', '=') => LAngleEqual,
        ('>', '=') => RAngleEqual,
        ('<', '<') => LAngleLAngle,
        ('>', '>') => RAngleRAngle,
        _ => return None,
    })
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ch {
        '=' => Equal,
        '+' => Plus,
        '-' => Minus,
        '*' => Star,
        '/' => Slash,
        '%' => Percent,
        '&' => Ampasand,
        '|' => Pipe,
        '^' => Caret,
        '<' => LAngle,
        '>' => RAngle,
        '(' => LParen,
        ')' => RParen,
        '{' => LCurly,
        '}' => RCurly,
        ';' => Semicolon,
        ',' => Comma,
        _ => return None,
    })
}
