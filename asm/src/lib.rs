pub mod error;
pub mod label;
pub mod parser;
pub mod util;

pub use error::Error;
pub use label::Labels;

use arch::{Asm, Inst};

/// Assemble a program into bytes starting at address 0.
pub fn assemble(program: &[Asm]) -> Result<Vec<u8>, Error> {
    let labels = Labels::collect(program)?;
    encode(program, &labels)
}

/// Second pass: serialize every instruction against a finished label table.
pub fn encode(program: &[Asm], labels: &Labels) -> Result<Vec<u8>, Error> {
    let mut bin = Vec::new();
    for line in program {
        if let Asm::Inst(inst) = line {
            let bytes = inst.encode(|name| labels.resolve(name))?;
            if bytes.len() != inst.len() as usize {
                return Err(Error::LengthMismatch {
                    inst: inst.to_string(),
                    declared: inst.len(),
                    actual: bytes.len(),
                });
            }
            bin.extend(bytes);
        }
    }
    Ok(bin)
}

/// Mnemonic text, one line per label or instruction. No label resolution.
pub fn listing(program: &[Asm]) -> String {
    program.iter().map(|line| format!("{line}\n")).collect()
}

/// Decode a whole binary into `(address, instruction)` pairs.
pub fn disassemble(bin: &[u8]) -> Result<Vec<(u16, Inst)>, Error> {
    let mut insts = vec![];
    let mut addr = 0;
    while addr < bin.len() {
        let inst = Inst::decode(bin, addr)?;
        let next = addr + inst.len() as usize;
        insts.push((addr as u16, inst));
        addr = next;
    }
    Ok(insts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::{Opcode, Operand, Reg};

    fn program() -> Vec<Asm> {
        vec![
            Inst::imm_label(Reg::RADDR, "ret").into(),
            Inst::push(Reg::RADDR).into(),
            Inst::jmp("func_main").into(),
            Asm::Label("ret".into()),
            Inst::halt().into(),
            Asm::Label("func_main".into()),
            Inst::imm(Reg::RRET, 42).into(),
            Inst::pop(Reg::RADDR).into(),
            Inst::jmpr(Reg::RADDR).into(),
        ]
    }

    #[test]
    fn forward_and_backward_refs() {
        let bin = assemble(&program()).unwrap();
        assert_eq!(bin.len(), 4 + 4 + 4 + 2 + 4 + 4 + 4);
        // IMM RADDR ret(=12)
        assert_eq!(&bin[0..4], &[0x12, 1, 12, 0]);
        // JMP func_main(=14)
        assert_eq!(&bin[8..12], &[0x17, 14, 0, 0]);
    }

    #[test]
    fn undefined_label() {
        let program = vec![Inst::jmp("func_missing").into()];
        let err = assemble(&program).unwrap_err();
        assert_eq!(err.to_string(), "undefined symbol 'func_missing'");
    }

    #[test]
    fn length_mismatch_is_internal_error() {
        let broken = Inst {
            op: Opcode::PUSH,
            args: vec![Operand::Reg(Reg::RRET)],
        };
        let err = assemble(&[broken.into()]).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch { declared: 4, actual: 2, .. }
        ));
    }

    #[test]
    fn listing_text() {
        let text = listing(&program());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    IMM RADDR ret");
        assert_eq!(lines[3], "ret:");
        assert_eq!(lines[6], "    IMM RRET 42");
    }

    #[test]
    fn disassembly_matches_listing() {
        let program = program();
        let decoded: Vec<String> = disassemble(&assemble(&program).unwrap())
            .unwrap()
            .into_iter()
            .map(|(_, inst)| inst.op.to_string())
            .collect();
        let listed: Vec<String> = listing(&program)
            .lines()
            .filter(|l| !l.ends_with(':'))
            .map(|l| l.split_whitespace().next().unwrap().to_string())
            .collect();
        assert_eq!(decoded, listed);
    }

    #[test]
    fn listing_reassembles() {
        let program = program();
        let reparsed = parser::parse(&listing(&program)).unwrap();
        assert_eq!(reparsed, program);
    }
}
