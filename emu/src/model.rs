use arch::{alu::valu, Inst, Opcode, Operand, Reg};

use crate::error::Error;

/// Initial value of both `RSP` and `RSB`.
pub const STACK_BASE: u16 = 0x8000;

const MEM_SIZE: usize = 0x1_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Halted,
    Timeout,
}

#[derive(Debug, Clone)]
pub struct State {
    reg: [u16; 8],
    mem: Vec<u8>,
    pc: u16,
    halted: bool,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

// Register & memory access
impl State {
    pub fn get(&self, reg: Reg) -> u16 {
        self.reg[reg.id() as usize]
    }

    pub fn set(&mut self, reg: Reg, val: u16) {
        self.reg[reg.id() as usize] = val;
    }

    pub fn load(&self, addr: u16) -> u16 {
        let lo = self.mem[addr as usize];
        let hi = self.mem[addr.wrapping_add(1) as usize];
        u16::from_le_bytes([lo, hi])
    }

    pub fn store(&mut self, addr: u16, val: u16) {
        let [lo, hi] = val.to_le_bytes();
        self.mem[addr as usize] = lo;
        self.mem[addr.wrapping_add(1) as usize] = hi;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn is_terminated(&self) -> bool {
        self.halted
    }
}

impl State {
    pub fn new() -> Self {
        let mut state = State {
            reg: [0; 8],
            mem: vec![0; MEM_SIZE],
            pc: 0,
            halted: false,
        };
        state.set(Reg::RSP, STACK_BASE);
        state.set(Reg::RSB, STACK_BASE);
        state
    }

    /// Place `bin` at address 0.
    pub fn with_program(bin: &[u8]) -> Result<Self, Error> {
        if bin.len() > MEM_SIZE {
            return Err(Error::ProgramTooLarge(bin.len()));
        }
        let mut state = State::new();
        state.mem[..bin.len()].copy_from_slice(bin);
        Ok(state)
    }

    pub fn load_rom_file(fname: &str) -> Result<Self, Error> {
        let bin = std::fs::read(fname).map_err(|e| Error::FileOpen(fname.to_string(), e))?;
        Self::with_program(&bin)
    }

    /// Execute one instruction. Returns its address and decoded form.
    pub fn exec(&mut self) -> Result<(u16, Inst), Error> {
        use Opcode::*;
        use Operand::{Imm16, Imm8, Pad, Reg as R};

        let pc = self.pc;
        let inst = Inst::decode(&self.mem, pc as usize)?;
        let mut next = pc.wrapping_add(inst.len());

        match (inst.op, inst.args.as_slice()) {
            (HALT, _) => {
                self.halted = true;
                next = pc;
            }
            (op, [R(a), R(b), R(save)]) if op.is_alu() => {
                let val = valu(op, self.get(*a), self.get(*b)).ok_or(Error::DivisionByZero(pc))?;
                self.set(*save, val);
            }
            (MOV, [R(src), Pad, R(save)]) => self.set(*save, self.get(*src)),
            (IMM, [R(save), Imm16(val)]) => self.set(*save, *val),
            (MEMR, [R(addr), Imm8(off), R(save)]) => {
                let addr = self.get(*addr).wrapping_add_signed(*off as i16);
                self.set(*save, self.load(addr));
            }
            (MEMW, [R(addr), R(val), Imm8(off)]) => {
                let addr = self.get(*addr).wrapping_add_signed(*off as i16);
                self.store(addr, self.get(*val));
            }
            (PUSH, [Pad, R(src), Pad]) => {
                let sp = self.get(Reg::RSP);
                self.store(sp, self.get(*src));
                self.set(Reg::RSP, sp.wrapping_add(2));
            }
            (POP, [Pad, Pad, R(save)]) => {
                let sp = self.get(Reg::RSP).wrapping_sub(2);
                self.set(Reg::RSP, sp);
                self.set(*save, self.load(sp));
            }
            (JMP, [Imm16(target), Pad]) => next = *target,
            (JMPIF, [R(cond), Imm16(target)]) => {
                if self.get(*cond) != 0 {
                    next = *target;
                }
            }
            (JMPR, [R(target), Pad, Pad]) => next = self.get(*target),
            (WORD, _) => return Err(Error::ExecutedData(pc)),
            _ => return Err(Error::Malformed(pc)),
        }

        self.pc = next;
        Ok((pc, inst))
    }

    /// Execute until `HALT` or until `tmax` instructions have run.
    pub fn run(&mut self, tmax: u64) -> Result<Exit, Error> {
        for _ in 0..tmax {
            if self.halted {
                return Ok(Exit::Halted);
            }
            self.exec()?;
        }
        Ok(if self.halted { Exit::Halted } else { Exit::Timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch::Asm;

    fn run(program: Vec<Asm>) -> State {
        let bin = tinasm::assemble(&program).unwrap();
        let mut state = State::with_program(&bin).unwrap();
        assert_eq!(state.run(1000).unwrap(), Exit::Halted);
        state
    }

    #[test]
    fn push_pop() {
        let state = run(vec![
            Inst::imm(Reg::R2, 7).into(),
            Inst::push(Reg::R2).into(),
            Inst::pop(Reg::R3).into(),
            Inst::halt().into(),
        ]);
        assert_eq!(state.get(Reg::R3), 7);
        assert_eq!(state.get(Reg::RSP), STACK_BASE);
        assert_eq!(state.load(STACK_BASE), 7);
    }

    #[test]
    fn memory_offsets() {
        let state = run(vec![
            Inst::imm(Reg::RRET, 0x1234).into(),
            Inst::memw(Reg::RSB, Reg::RRET, -4).into(),
            Inst::memr(Reg::RSB, -4, Reg::R4).into(),
            Inst::halt().into(),
        ]);
        assert_eq!(state.get(Reg::R4), 0x1234);
        assert_eq!(state.load(STACK_BASE - 4), 0x1234);
    }

    #[test]
    fn conditional_jump() {
        let state = run(vec![
            Inst::imm(Reg::RRET, 0).into(),
            Inst::jmpif(Reg::RRET, "skip").into(),
            Inst::imm(Reg::R2, 1).into(),
            Asm::Label("skip".into()),
            Inst::halt().into(),
        ]);
        assert_eq!(state.get(Reg::R2), 1);
    }

    #[test]
    fn division_by_zero() {
        let bin = tinasm::assemble(&[
            Inst::calc(Opcode::DIV, Reg::R2, Reg::R3, Reg::RRET).into(),
            Inst::halt().into(),
        ])
        .unwrap();
        let mut state = State::with_program(&bin).unwrap();
        assert!(matches!(state.run(10), Err(Error::DivisionByZero(0))));
    }

    #[test]
    fn corrupt_register_byte() {
        // PUSH with register id 12
        let mut state = State::with_program(&[0x15, 0, 12, 0]).unwrap();
        assert!(matches!(
            state.run(10),
            Err(Error::Decode(arch::Error::UnknownRegister(12, 0)))
        ));
    }

    #[test]
    fn timeout() {
        let bin = tinasm::assemble(&[Asm::Label("l".into()), Inst::jmp("l").into()]).unwrap();
        let mut state = State::with_program(&bin).unwrap();
        assert_eq!(state.run(50).unwrap(), Exit::Timeout);
    }
}
