pub mod alu;
pub mod error;
pub mod inst;
pub mod op;
pub mod reg;

pub use error::Error;
pub use inst::{Asm, Inst, Operand, CELL_OFFSET};
pub use op::{Arg, Opcode};
pub use reg::Reg;
