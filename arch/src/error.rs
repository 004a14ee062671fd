use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown opcode 0x{0:02X} at 0x{1:04X}")]
    UnknownOpcode(u8, usize),

    #[error("Unknown register 0x{0:02X} in instruction at 0x{1:04X}")]
    UnknownRegister(u8, usize),

    #[error("Truncated instruction at 0x{0:04X}: {1} needs {2} bytes")]
    Truncated(usize, String, u16),
}
