use indexmap::IndexMap;

use crate::error::Error;

/// Size of one stack slot in bytes.
pub const WORD: i16 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolData {
    Function { arity: usize },
    /// Local or parameter, relative to the frame base.
    Variable { offset: i8 },
    /// One-cell data record at `label`.
    Global { label: String },
}

/// Where a variable lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place<'a> {
    Local(i8),
    Global(&'a str),
}

/// Name resolution for one scope. Child scopes get their own copy via [`Symbols::fork`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbols {
    map: IndexMap<String, SymbolData>,
}

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot for a nested scope; bindings made in it never reach `self`.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Bind `name`, replacing (shadowing) any previous binding.
    pub fn bind(&mut self, name: &str, data: SymbolData) -> Option<SymbolData> {
        self.map.insert(name.to_string(), data)
    }

    pub fn get(&self, name: &str) -> Option<&SymbolData> {
        self.map.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolData)> {
        self.map.iter().map(|(name, data)| (name.as_str(), data))
    }

    fn lookup(&self, name: &str, offset: Option<usize>) -> Result<&SymbolData, Error> {
        self.get(name).ok_or_else(|| Error::UndefinedSymbol {
            name: name.to_string(),
            offset,
        })
    }

    /// Arity of the function `name`.
    pub fn function(&self, name: &str, offset: Option<usize>) -> Result<usize, Error> {
        match self.lookup(name, offset)? {
            SymbolData::Function { arity } => Ok(*arity),
            _ => Err(Error::IncorrectSymbolKind {
                name: name.to_string(),
                expected: "function",
                offset,
            }),
        }
    }

    pub fn variable(&self, name: &str, offset: Option<usize>) -> Result<Place<'_>, Error> {
        match self.lookup(name, offset)? {
            SymbolData::Variable { offset: slot } => Ok(Place::Local(*slot)),
            SymbolData::Global { label } => Ok(Place::Global(label)),
            SymbolData::Function { .. } => Err(Error::IncorrectSymbolKind {
                name: name.to_string(),
                expected: "variable",
                offset,
            }),
        }
    }
}

/// Hands out the local slots of one function: 0, 2, 4, ...
#[derive(Debug, Clone, Default)]
pub struct StackManager {
    next: i16,
}

impl StackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> i16 {
        let offset = self.next;
        self.next += WORD;
        offset
    }

    /// Bytes reserved for locals so far.
    pub fn size(&self) -> u16 {
        self.next as u16
    }
}

/// Per-compilation counter for unique label suffixes.
#[derive(Debug, Clone, Default)]
pub struct IdManager {
    next: usize,
}

impl IdManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// `prefix_<id>` with a fresh id.
    pub fn label(&mut self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.request())
    }
}
