use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Opcode {
    HALT,
    ADD,
    SUB,
    MUL,
    DIV,
    MOD,
    AND,
    OR,
    XOR,
    SHL,
    SHR,
    EQ,
    NEQ,
    LT,
    GT,
    LE,
    GE,
    MOV,
    IMM,
    MEMR,
    MEMW,
    PUSH,
    POP,
    JMP,
    JMPIF,
    JMPR,
    WORD,
}

impl Opcode {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_uppercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }

    pub fn is_alu(&self) -> bool {
        use Opcode::*;
        matches!(
            self,
            ADD | SUB | MUL | DIV | MOD | AND | OR | XOR | SHL | SHR | EQ | NEQ | LT | GT | LE | GE
        )
    }

    /// Encoded size in bytes, opcode included.
    pub fn len(&self) -> u16 {
        match self {
            Opcode::HALT => 2,
            _ => 4,
        }
    }
}

/// One operand slot of an encoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    Reg,
    Imm8,
    Imm16,
    Pad,
}

impl Arg {
    pub fn size(&self) -> u16 {
        match self {
            Arg::Imm16 => 2,
            _ => 1,
        }
    }
}

impl Opcode {
    pub fn arg_field(&self) -> Vec<Arg> {
        use Opcode::*;
        match self {
            HALT => vec![Arg::Pad],
            ADD | SUB | MUL | DIV | MOD | AND | OR | XOR | SHL | SHR | EQ | NEQ | LT | GT | LE
            | GE => vec![Arg::Reg, Arg::Reg, Arg::Reg],
            MOV => vec![Arg::Reg, Arg::Pad, Arg::Reg],
            IMM => vec![Arg::Reg, Arg::Imm16],
            MEMR => vec![Arg::Reg, Arg::Imm8, Arg::Reg],
            MEMW => vec![Arg::Reg, Arg::Reg, Arg::Imm8],
            PUSH => vec![Arg::Pad, Arg::Reg, Arg::Pad],
            POP => vec![Arg::Pad, Arg::Pad, Arg::Reg],
            JMP => vec![Arg::Imm16, Arg::Pad],
            JMPIF => vec![Arg::Reg, Arg::Imm16],
            JMPR => vec![Arg::Reg, Arg::Pad, Arg::Pad],
            WORD => vec![Arg::Pad, Arg::Imm16],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse() {
        assert_eq!(Opcode::parse("add"), Ok(Opcode::ADD));
        assert_eq!(Opcode::parse("JmpIf"), Ok(Opcode::JMPIF));
        assert!(Opcode::parse("hoge").is_err());
    }

    #[test]
    fn layout_matches_declared_length() {
        for op in Opcode::iter() {
            let size: u16 = 1 + op.arg_field().iter().map(Arg::size).sum::<u16>();
            assert_eq!(size, op.len(), "{op}");
        }
    }

    #[test]
    fn numbering() {
        assert_eq!(u8::from(Opcode::HALT), 0x00);
        assert_eq!(u8::from(Opcode::GE), 0x10);
        assert_eq!(Opcode::try_from(0x1A).ok(), Some(Opcode::WORD));
        assert!(Opcode::try_from(0x1B).is_err());
    }
}
