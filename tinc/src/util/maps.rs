use crate::compile::{Frame, Program};
use crate::error::Error;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tinasm::Labels;

/// Label addresses and frame layouts, written next to the binary for debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMap {
    pub labels: IndexMap<String, u16>,
    pub frames: IndexMap<String, Frame>,
}

impl SymbolMap {
    pub fn generate(program: &Program, labels: &Labels) -> Self {
        SymbolMap {
            labels: labels
                .iter()
                .map(|(name, addr)| (name.to_string(), addr))
                .collect(),
            frames: program.frames.clone(),
        }
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}
