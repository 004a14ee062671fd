pub mod dump;

use crate::model::State;
use arch::Inst;

pub trait Hook {
    fn init(&mut self, state: State) -> State;
    fn exec(&mut self, time: u64, addr: u16, inst: &Inst, state: State) -> State;
}
