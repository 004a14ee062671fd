use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] arch::Error),

    #[error("Division by zero at 0x{0:04X}")]
    DivisionByZero(u16),

    #[error("Executed data word at 0x{0:04X}")]
    ExecutedData(u16),

    #[error("Malformed instruction at 0x{0:04X}")]
    Malformed(u16),

    #[error("Program does not fit in memory ({0} bytes)")]
    ProgramTooLarge(usize),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Config(String, #[source] serde_yaml::Error),
}
