use crate::{
    compile::{func_label, return_label, Frame, Slot},
    error::Error,
    grammer::ast::{Expr, Scope, Stmt},
    symbols::{IdManager, Place, StackManager, SymbolData, Symbols, WORD},
};
use arch::{Asm, Inst, Opcode, Reg, CELL_OFFSET};
use itertools::chain;

/// Build a `Vec<Asm>` from instructions and labels.
macro_rules! code {
    ($($line:expr),* $(,)?) => {
        vec![$(Asm::from($line)),*]
    };
}

pub(crate) use code;

pub struct FuncCompiler<'a> {
    name: &'a str,
    ids: &'a mut IdManager,
    stack: StackManager,
    frame: Frame,
}

impl<'a> FuncCompiler<'a> {
    pub fn new(name: &'a str, ids: &'a mut IdManager) -> Self {
        Self {
            name,
            ids,
            stack: StackManager::new(),
            frame: Frame::default(),
        }
    }

    pub fn compile(
        mut self,
        args: &[String],
        body: &Scope,
        root: &Symbols,
    ) -> Result<(Vec<Asm>, Frame), Error> {
        let mut symbols = root.fork();

        // Parameters sit below the saved frame base and return address
        let (n, word) = (args.len() as i64, i64::from(WORD));
        for (i, name) in args.iter().enumerate() {
            let offset = self.slot(-2 * word - word * (n - i as i64))?;
            symbols.bind(name, SymbolData::Variable { offset });
            self.frame.args.push(Slot::new(name, offset));
        }

        let body = self.compile_scope(body, &symbols)?;
        let size = self.stack.size();
        self.frame.size = size;

        let insts = chain!(self.prologue(size), body, self.epilogue()).collect();
        Ok((insts, self.frame))
    }

    fn prologue(&self, size: u16) -> Vec<Asm> {
        code![
            Asm::Label(func_label(self.name)),
            Inst::push(Reg::RSB),
            Inst::mov(Reg::RSP, Reg::RSB),
            Inst::imm(Reg::R2, size),
            Inst::calc(Opcode::ADD, Reg::RSB, Reg::R2, Reg::RSP),
        ]
    }

    // Leaves RRET untouched
    fn epilogue(&self) -> Vec<Asm> {
        code![
            Asm::Label(return_label(self.name)),
            Inst::mov(Reg::RSB, Reg::RSP),
            Inst::pop(Reg::RSB),
            Inst::pop(Reg::RADDR),
            Inst::jmpr(Reg::RADDR),
        ]
    }

    fn slot(&self, offset: i64) -> Result<i8, Error> {
        i8::try_from(offset).map_err(|_| Error::FrameOverflow(self.name.to_string()))
    }
}

// ----------------------------------------------------------------------------
// Statements
// ----------------------------------------------------------------------------

impl<'a> FuncCompiler<'a> {
    fn compile_scope(&mut self, scope: &Scope, outer: &Symbols) -> Result<Vec<Asm>, Error> {
        let mut symbols = outer.fork();
        let mut insts = vec![];
        for stmt in &scope.0 {
            insts.extend(self.compile_stmt(stmt, &mut symbols)?);
        }
        Ok(insts)
    }

    fn compile_stmt(&mut self, stmt: &Stmt, symbols: &mut Symbols) -> Result<Vec<Asm>, Error> {
        match stmt {
            Stmt::Scope(scope) => self.compile_scope(scope, symbols),

            Stmt::Var { name, init, .. } => {
                let offset = self.stack.allocate();
                let offset = self.slot(offset.into())?;
                symbols.bind(name, SymbolData::Variable { offset });
                self.frame.locals.push(Slot::new(name, offset));
                match init {
                    Some(init) => Ok(chain!(
                        self.compile_expr(init, symbols)?,
                        store(Place::Local(offset))
                    )
                    .collect()),
                    None => Ok(vec![]),
                }
            }

            Stmt::Assign {
                name,
                value,
                offset,
            } => {
                let place = symbols.variable(name, Some(*offset))?;
                Ok(chain!(self.compile_expr(value, symbols)?, store(place)).collect())
            }

            Stmt::Write { addr, value } => Ok(chain!(
                self.compile_expr(addr, symbols)?,
                code![Inst::push(Reg::RRET)],
                self.compile_expr(value, symbols)?,
                code![
                    Inst::pop(Reg::REXPR),
                    Inst::memw(Reg::REXPR, Reg::RRET, 0),
                ]
            )
            .collect()),

            Stmt::Return(value) => {
                let value = match value {
                    Some(value) => self.compile_expr(value, symbols)?,
                    None => vec![],
                };
                Ok(chain!(value, code![Inst::jmp(&return_label(self.name))]).collect())
            }

            Stmt::If { cond, body } => {
                let cond = self.compile_expr(cond, symbols)?;
                let begin = self.ids.label("if_begin");
                let end = self.ids.label("if_end");
                Ok(chain!(
                    cond,
                    code![
                        Inst::jmpif(Reg::RRET, &begin),
                        Inst::jmp(&end),
                        Asm::Label(begin),
                    ],
                    self.compile_stmt(body, symbols)?,
                    code![Asm::Label(end)]
                )
                .collect())
            }

            Stmt::While { cond, body } => {
                let head = self.ids.label("while_head");
                let cond = self.compile_expr(cond, symbols)?;
                let begin = self.ids.label("while_body");
                let end = self.ids.label("while_end");
                Ok(chain!(
                    code![Asm::Label(head.clone())],
                    cond,
                    code![
                        Inst::jmpif(Reg::RRET, &begin),
                        Inst::jmp(&end),
                        Asm::Label(begin),
                    ],
                    self.compile_stmt(body, symbols)?,
                    code![Inst::jmp(&head), Asm::Label(end)]
                )
                .collect())
            }

            Stmt::Expr(expr) => self.compile_expr(expr, symbols),
        }
    }
}

// ----------------------------------------------------------------------------
// Expressions (result in RRET)
// ----------------------------------------------------------------------------

impl<'a> FuncCompiler<'a> {
    fn compile_expr(&mut self, expr: &Expr, symbols: &Symbols) -> Result<Vec<Asm>, Error> {
        match expr {
            Expr::Int(n) => Ok(code![Inst::imm(Reg::RRET, *n)]),

            Expr::Var { name, offset } => Ok(load(symbols.variable(name, Some(*offset))?)),

            Expr::Paren(inner) => self.compile_expr(inner, symbols),

            Expr::Binary { left, op, right } => Ok(chain!(
                self.compile_expr(left, symbols)?,
                code![Inst::mov(Reg::RRET, Reg::REXPR), Inst::push(Reg::REXPR)],
                self.compile_expr(right, symbols)?,
                code![
                    Inst::pop(Reg::REXPR),
                    Inst::calc(op.opcode(), Reg::REXPR, Reg::RRET, Reg::RRET),
                ]
            )
            .collect()),

            Expr::Call { name, args, offset } => {
                let arity = symbols.function(name, Some(*offset))?;
                if arity != args.len() {
                    return Err(Error::ArityMismatch {
                        name: name.clone(),
                        expected: arity,
                        got: args.len(),
                        offset: Some(*offset),
                    });
                }
                let args = args
                    .iter()
                    .map(|arg| self.compile_expr(arg, symbols))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(call(self.ids, name, args))
            }
        }
    }
}

/// Call sequence for `name`, given the already compiled arguments.
/// The caller pops the arguments once the callee returns.
pub fn call(ids: &mut IdManager, name: &str, args: Vec<Vec<Asm>>) -> Vec<Asm> {
    let ret = ids.label("call_ret");
    let n = args.len();
    chain!(
        args.into_iter()
            .flat_map(|arg| chain!(arg, code![Inst::push(Reg::RRET)])),
        code![
            Inst::imm_label(Reg::RADDR, &ret),
            Inst::push(Reg::RADDR),
            Inst::jmp(&func_label(name)),
            Asm::Label(ret),
        ],
        std::iter::repeat(Asm::from(Inst::pop(Reg::RADDR))).take(n)
    )
    .collect()
}

fn load(place: Place<'_>) -> Vec<Asm> {
    match place {
        Place::Local(offset) => code![Inst::memr(Reg::RSB, offset, Reg::RRET)],
        Place::Global(label) => code![
            Inst::imm_label(Reg::RADDR, label),
            Inst::memr(Reg::RADDR, CELL_OFFSET, Reg::RRET),
        ],
    }
}

fn store(place: Place<'_>) -> Vec<Asm> {
    match place {
        Place::Local(offset) => code![Inst::memw(Reg::RSB, Reg::RRET, offset)],
        Place::Global(label) => code![
            Inst::imm_label(Reg::RADDR, label),
            Inst::memw(Reg::RADDR, Reg::RRET, CELL_OFFSET),
        ],
    }
}
