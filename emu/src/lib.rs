pub mod error;
pub mod hooks;
pub mod model;

pub use error::Error;
pub use model::{Exit, State, STACK_BASE};
