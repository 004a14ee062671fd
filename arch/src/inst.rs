use crate::{
    error::Error,
    op::{Arg, Opcode},
    reg::Reg,
};
use color_print::cformat;
use std::fmt;

/// Offset of the data cell inside a `WORD` record.
pub const CELL_OFFSET: i8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm8(i8),
    Imm16(u16),
    /// Address of a label, filled in by the assembler.
    Ref(String),
    Pad,
}

impl Operand {
    fn arg(&self) -> Arg {
        match self {
            Operand::Reg(_) => Arg::Reg,
            Operand::Imm8(_) => Arg::Imm8,
            Operand::Imm16(_) | Operand::Ref(_) => Arg::Imm16,
            Operand::Pad => Arg::Pad,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{r}"),
            Operand::Imm8(v) => write!(f, "{v}"),
            Operand::Imm16(v) => write!(f, "{v}"),
            Operand::Ref(name) => write!(f, "{name}"),
            Operand::Pad => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inst {
    pub op: Opcode,
    pub args: Vec<Operand>,
}

/// One line of a program: an instruction or a zero-length label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asm {
    Label(String),
    Inst(Inst),
}

impl Asm {
    pub fn len(&self) -> u16 {
        match self {
            Asm::Label(_) => 0,
            Asm::Inst(inst) => inst.len(),
        }
    }

    pub fn cformat(&self) -> String {
        match self {
            Asm::Label(name) => cformat!("<m>{}</m>:", name),
            Asm::Inst(inst) => format!("    {}", inst.cformat()),
        }
    }
}

impl From<Inst> for Asm {
    fn from(inst: Inst) -> Self {
        Asm::Inst(inst)
    }
}

impl fmt::Display for Asm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asm::Label(name) => write!(f, "{name}:"),
            Asm::Inst(inst) => write!(f, "    {inst}"),
        }
    }
}

// ----------------------------------------------------------------------------
// Constructors
// ----------------------------------------------------------------------------

impl Inst {
    fn new(op: Opcode, args: Vec<Operand>) -> Self {
        Inst { op, args }
    }

    pub fn halt() -> Self {
        Self::new(Opcode::HALT, vec![Operand::Pad])
    }

    /// `save = a OP b`
    pub fn calc(op: Opcode, a: Reg, b: Reg, save: Reg) -> Self {
        debug_assert!(op.is_alu());
        Self::new(op, vec![Operand::Reg(a), Operand::Reg(b), Operand::Reg(save)])
    }

    pub fn mov(src: Reg, save: Reg) -> Self {
        Self::new(Opcode::MOV, vec![Operand::Reg(src), Operand::Pad, Operand::Reg(save)])
    }

    pub fn imm(save: Reg, value: u16) -> Self {
        Self::new(Opcode::IMM, vec![Operand::Reg(save), Operand::Imm16(value)])
    }

    pub fn imm_label(save: Reg, label: &str) -> Self {
        Self::new(
            Opcode::IMM,
            vec![Operand::Reg(save), Operand::Ref(label.to_string())],
        )
    }

    pub fn memr(addr: Reg, offset: i8, save: Reg) -> Self {
        Self::new(
            Opcode::MEMR,
            vec![Operand::Reg(addr), Operand::Imm8(offset), Operand::Reg(save)],
        )
    }

    pub fn memw(addr: Reg, value: Reg, offset: i8) -> Self {
        Self::new(
            Opcode::MEMW,
            vec![Operand::Reg(addr), Operand::Reg(value), Operand::Imm8(offset)],
        )
    }

    pub fn push(src: Reg) -> Self {
        Self::new(Opcode::PUSH, vec![Operand::Pad, Operand::Reg(src), Operand::Pad])
    }

    pub fn pop(save: Reg) -> Self {
        Self::new(Opcode::POP, vec![Operand::Pad, Operand::Pad, Operand::Reg(save)])
    }

    pub fn jmp(label: &str) -> Self {
        Self::new(Opcode::JMP, vec![Operand::Ref(label.to_string()), Operand::Pad])
    }

    pub fn jmpif(cond: Reg, label: &str) -> Self {
        Self::new(
            Opcode::JMPIF,
            vec![Operand::Reg(cond), Operand::Ref(label.to_string())],
        )
    }

    pub fn jmpr(target: Reg) -> Self {
        Self::new(Opcode::JMPR, vec![Operand::Reg(target), Operand::Pad, Operand::Pad])
    }

    pub fn word(value: u16) -> Self {
        Self::new(Opcode::WORD, vec![Operand::Pad, Operand::Imm16(value)])
    }
}

// ----------------------------------------------------------------------------
// Encoding
// ----------------------------------------------------------------------------

impl Inst {
    /// Declared encoded length in bytes.
    pub fn len(&self) -> u16 {
        self.op.len()
    }

    /// Operands in layout order, skipping pads.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.args.iter().filter(|a| !matches!(a, Operand::Pad))
    }

    /// Serialize, resolving label references through `resolve`.
    /// The result is not checked against [`Inst::len`]; the assembler does that.
    pub fn encode<E>(&self, resolve: impl Fn(&str) -> Result<u16, E>) -> Result<Vec<u8>, E> {
        let mut bin = vec![self.op.into()];
        for arg in &self.args {
            match arg {
                Operand::Reg(r) => bin.push(r.id()),
                Operand::Imm8(v) => bin.push(*v as u8),
                Operand::Imm16(v) => bin.extend(v.to_le_bytes()),
                Operand::Ref(name) => bin.extend(resolve(name)?.to_le_bytes()),
                Operand::Pad => bin.push(0),
            }
        }
        Ok(bin)
    }

    /// Decode one instruction starting at `addr`.
    pub fn decode(bin: &[u8], addr: usize) -> Result<Inst, Error> {
        let code = *bin.get(addr).ok_or(Error::Truncated(addr, "opcode".into(), 1))?;
        let op = Opcode::try_from(code).map_err(|_| Error::UnknownOpcode(code, addr))?;
        let end = addr + op.len() as usize;
        let body = bin
            .get(addr + 1..end)
            .ok_or_else(|| Error::Truncated(addr, op.to_string(), op.len()))?;

        let mut args = vec![];
        let mut idx = 0;
        for arg in op.arg_field() {
            args.push(match arg {
                Arg::Reg => Operand::Reg(
                    Reg::try_from(body[idx])
                        .map_err(|_| Error::UnknownRegister(body[idx], addr))?,
                ),
                Arg::Imm8 => Operand::Imm8(body[idx] as i8),
                Arg::Imm16 => Operand::Imm16(u16::from_le_bytes([body[idx], body[idx + 1]])),
                Arg::Pad => Operand::Pad,
            });
            idx += arg.size() as usize;
        }
        Ok(Inst { op, args })
    }

    /// True when every operand has the kind its opcode layout expects.
    pub fn is_well_formed(&self) -> bool {
        let field = self.op.arg_field();
        field.len() == self.args.len() && field.iter().zip(&self.args).all(|(f, a)| *f == a.arg())
    }
}

// ----------------------------------------------------------------------------
// Text
// ----------------------------------------------------------------------------

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for arg in self.operands() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        let args: Vec<String> = self
            .operands()
            .map(|arg| match arg {
                Operand::Reg(r) => cformat!("<y>{}</>", r),
                Operand::Imm8(v) => cformat!("<c>{}</>", v),
                Operand::Imm16(v) => cformat!("<c>0x{:04X}</>", v),
                Operand::Ref(name) => cformat!("<m>{}</>", name),
                Operand::Pad => String::new(),
            })
            .collect();
        let op = format!("{:<5}", self.op.to_string());
        cformat!("<r>{}</> {}", op, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn no_labels(name: &str) -> Result<u16, String> {
        Err(name.to_string())
    }

    macro_rules! test_enc {
        ($name:ident, $inst:expr, $bin:expr) => {
            #[test]
            fn $name() {
                let inst = $inst;
                assert!(inst.is_well_formed());
                let bin = inst.encode(no_labels).unwrap();
                assert_eq!(bin, $bin);
                assert_eq!(bin.len() as u16, inst.len());
                assert_eq!(Inst::decode(&bin, 0).unwrap(), inst);
            }
        };
    }

    test_enc!(halt, Inst::halt(), vec![0x00, 0x00]);
    test_enc!(sub, Inst::calc(Opcode::SUB, Reg::REXPR, Reg::RRET, Reg::RRET), vec![0x02, 5, 0, 0]);
    test_enc!(mov, Inst::mov(Reg::RSP, Reg::RSB), vec![0x11, 7, 0, 6]);
    test_enc!(imm, Inst::imm(Reg::R2, 0x1234), vec![0x12, 2, 0x34, 0x12]);
    test_enc!(memr, Inst::memr(Reg::RSB, -6, Reg::RRET), vec![0x13, 6, 0xFA, 0]);
    test_enc!(memw, Inst::memw(Reg::RSB, Reg::RRET, 4), vec![0x14, 6, 0, 4]);
    test_enc!(push, Inst::push(Reg::REXPR), vec![0x15, 0, 5, 0]);
    test_enc!(pop, Inst::pop(Reg::RADDR), vec![0x16, 0, 0, 1]);
    test_enc!(jmpr, Inst::jmpr(Reg::RADDR), vec![0x19, 1, 0, 0]);
    test_enc!(word, Inst::word(0), vec![0x1A, 0, 0, 0]);

    #[test]
    fn resolve_ref() {
        let inst = Inst::jmpif(Reg::RRET, "loop");
        let bin = inst
            .encode(|name| {
                assert_eq!(name, "loop");
                Ok::<_, Infallible>(0x0102)
            })
            .unwrap();
        assert_eq!(bin, vec![0x18, 0, 0x02, 0x01]);
        assert_eq!(
            Inst::decode(&bin, 0).unwrap().args[1],
            Operand::Imm16(0x0102)
        );
    }

    #[test]
    fn unresolved_ref() {
        assert_eq!(Inst::jmp("nowhere").encode(no_labels), Err("nowhere".to_string()));
    }

    #[test]
    fn decode_errors() {
        assert_eq!(Inst::decode(&[0xEE, 0, 0, 0], 0), Err(Error::UnknownOpcode(0xEE, 0)));
        assert!(matches!(Inst::decode(&[0x01, 0], 0), Err(Error::Truncated(0, _, 4))));
        assert_eq!(
            Inst::decode(&[0x00, 0x00, 0x15, 0, 9, 0], 2),
            Err(Error::UnknownRegister(9, 2))
        );
        assert_eq!(
            Inst::decode(&[0x01, 0, 1, 0xFF], 0),
            Err(Error::UnknownRegister(0xFF, 0))
        );
    }

    #[test]
    fn text() {
        assert_eq!(Inst::memr(Reg::RSB, -4, Reg::RRET).to_string(), "MEMR RSB -4 RRET");
        assert_eq!(Inst::imm_label(Reg::RADDR, "var_g").to_string(), "IMM RADDR var_g");
        assert_eq!(Inst::push(Reg::REXPR).to_string(), "PUSH REXPR");
        assert_eq!(Inst::halt().to_string(), "HALT");
        assert_eq!(Asm::Label("func_main".into()).to_string(), "func_main:");
        assert_eq!(Asm::from(Inst::word(7)).to_string(), "    WORD 7");
    }
}
