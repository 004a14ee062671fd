use arch::Asm;
use indexmap::IndexMap;

use crate::error::Error;

/// Label name to absolute byte address, in program order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    labels: IndexMap<String, u16>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// First pass: walk the program with a running address and record each label.
    pub fn collect(program: &[Asm]) -> Result<Self, Error> {
        let mut labels = Labels::new();
        let mut pc: usize = 0;
        for line in program {
            let addr = u16::try_from(pc).map_err(|_| Error::ProgramTooLarge(pc))?;
            if let Asm::Label(name) = line {
                labels.insert(name, addr)?;
            }
            pc += line.len() as usize;
        }
        // the last instruction may end exactly at the top of memory
        if pc > 0x1_0000 {
            return Err(Error::ProgramTooLarge(pc));
        }
        Ok(labels)
    }

    pub fn insert(&mut self, name: &str, addr: u16) -> Result<(), Error> {
        if self.labels.contains_key(name) {
            return Err(Error::RedefinedLabel(name.to_string()));
        }
        self.labels.insert(name.to_string(), addr);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.labels.get(name).copied()
    }

    pub fn resolve(&self, name: &str) -> Result<u16, Error> {
        self.get(name)
            .ok_or_else(|| Error::UndefinedLabel(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.labels.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
