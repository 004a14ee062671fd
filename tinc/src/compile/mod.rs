pub mod func;

use crate::{
    error::Error,
    grammer::ast::{Decl, Root},
    symbols::{IdManager, SymbolData, Symbols},
};
use arch::{Asm, Inst};
use func::{code, FuncCompiler};
use indexmap::IndexMap;
use itertools::chain;
use serde::{Deserialize, Serialize};

/// Generated instruction stream plus per-function frame layouts.
#[derive(Debug, Clone)]
pub struct Program {
    pub code: Vec<Asm>,
    pub frames: IndexMap<String, Frame>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Bytes reserved for locals.
    pub size: u16,
    pub args: Vec<Slot>,
    pub locals: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub offset: i8,
}

impl Slot {
    pub fn new(name: &str, offset: i8) -> Self {
        Slot {
            name: name.to_string(),
            offset,
        }
    }
}

pub fn func_label(name: &str) -> String {
    format!("func_{name}")
}

pub fn return_label(name: &str) -> String {
    format!("return_{name}")
}

pub fn global_label(name: &str) -> String {
    format!("var_{name}")
}

/// Lower a whole program. The entry sequence calls `main()` and halts,
/// ahead of every declaration.
pub fn generate(root: &Root) -> Result<Program, Error> {
    let mut ids = IdManager::new();
    let mut symbols = Symbols::new();
    let mut frames = IndexMap::new();
    let mut body = vec![];
    let mut main_at = None;

    for decl in &root.0 {
        match decl {
            Decl::Func {
                name,
                args,
                body: scope,
                offset,
            } => {
                if name == "main" {
                    main_at = Some(*offset);
                }
                symbols.bind(name, SymbolData::Function { arity: args.len() });
                let (insts, frame) = FuncCompiler::new(name, &mut ids).compile(args, scope, &symbols)?;
                body.extend(insts);
                frames.insert(name.clone(), frame);
            }
            Decl::Global { name } => {
                let label = global_label(name);
                symbols.bind(name, SymbolData::Global { label: label.clone() });
                body.extend(code![Asm::Label(label), Inst::word(0)]);
            }
        }
    }

    let arity = symbols.function("main", None)?;
    if arity != 0 {
        return Err(Error::ArityMismatch {
            name: "main".to_string(),
            expected: arity,
            got: 0,
            offset: main_at,
        });
    }
    let entry = func::call(&mut ids, "main", vec![]);

    Ok(Program {
        code: chain!(entry, code![Inst::halt()], body).collect(),
        frames,
    })
}
