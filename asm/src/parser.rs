use arch::{Arg, Asm, Inst, Opcode, Operand, Reg};

use crate::error::Error;

/// Parse one line of a listing. Blank lines and `;` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Asm>, Error> {
    let code = match line.split_once(';') {
        Some((code, _comment)) => code,
        None => line,
    };
    let words: Vec<&str> = code.split_whitespace().collect();

    let Some(head) = words.first() else {
        return Ok(None);
    };

    // main:
    if let Some(label) = head.strip_suffix(':') {
        if words.len() > 1 {
            return Err(Error::TrailingArgument(label.to_string()));
        }
        return Ok(Some(Asm::Label(label.to_string())));
    }

    let op = Opcode::parse(head).map_err(|_| Error::UnknownOperation(head.to_string()))?;
    let mut words = words[1..].iter();
    let mut args = vec![];
    for arg in op.arg_field() {
        if arg == Arg::Pad {
            args.push(Operand::Pad);
            continue;
        }
        let word = words
            .next()
            .ok_or_else(|| Error::MissingArgument(op.to_string()))?;
        args.push(parse_arg(arg, word)?);
    }
    if words.next().is_some() {
        return Err(Error::TrailingArgument(op.to_string()));
    }
    Ok(Some(Asm::Inst(Inst { op, args })))
}

/// Parse a whole listing. Errors carry the 0-based line index.
pub fn parse(text: &str) -> Result<Vec<Asm>, Error> {
    let mut program = vec![];
    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(asm)) => program.push(asm),
            Ok(None) => {}
            Err(e) => return Err(Error::AtLine(idx, Box::new(e))),
        }
    }
    Ok(program)
}

fn parse_arg(arg: Arg, word: &str) -> Result<Operand, Error> {
    let fail = |kind: &str| Error::ParseArgument(word.to_string(), kind.to_string());
    match arg {
        Arg::Reg => Reg::parse(word).map(Operand::Reg).map_err(|_| fail("register")),
        Arg::Imm8 => word
            .parse::<i8>()
            .map(Operand::Imm8)
            .map_err(|_| fail("imm8")),
        Arg::Imm16 => match parse_with_prefix(word) {
            Some(val) => Ok(Operand::Imm16(val)),
            None if is_label(word) => Ok(Operand::Ref(word.to_string())),
            None => Err(fail("imm16 or label")),
        },
        Arg::Pad => Ok(Operand::Pad),
    }
}

fn parse_with_prefix(s: &str) -> Option<u16> {
    let (num, radix) = if let Some(num) = s.strip_prefix("0x") {
        (num, 16)
    } else if let Some(num) = s.strip_prefix("0b") {
        (num, 2)
    } else {
        (s, 10)
    };
    u16::from_str_radix(num, radix).ok()
}

fn is_label(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
