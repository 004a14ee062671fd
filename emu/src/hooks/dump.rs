use arch::{Inst, Reg};
use color_print::cprintln;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use crate::error::Error;
use crate::model::State;

use super::Hook;

#[derive(Debug)]
pub struct Dump {
    file: Option<String>,
    all: bool,
    list: List,
}

/// pc -> what to print when that pc executes
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct List(pub HashMap<u16, Config>);

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stack: bool,
    #[serde(default)]
    pub heap: Vec<u16>,
}

impl Dump {
    pub fn arg(file: Option<String>, all: bool) -> Result<Self, Error> {
        let list = match &file {
            Some(fname) => {
                let reader = File::open(fname)
                    .map(BufReader::new)
                    .map_err(|e| Error::FileOpen(fname.clone(), e))?;
                serde_yaml::from_reader(reader).map_err(|e| Error::Config(fname.clone(), e))?
            }
            None => List::default(),
        };
        Ok(Self { file, all, list })
    }

    fn get(&self, pc: u16) -> Option<&Config> {
        self.list.0.get(&pc)
    }
}

impl Hook for Dump {
    fn init(&mut self, state: State) -> State {
        if self.all {
            println!(" * Dump all");
        }
        if let Some(fname) = &self.file {
            println!(" * Dump[{}] {:?}", self.list.0.len(), fname);
        }
        state
    }

    fn exec(&mut self, time: u64, addr: u16, inst: &Inst, cpu: State) -> State {
        if let Some(cfg) = self.get(addr) {
            print_inst(time, addr, inst);
            print_reg(&cpu);
            if cfg.stack {
                print_stack(&cpu);
            }
            print_heap(&cpu, &cfg.heap);
        } else if self.all {
            print_inst(time, addr, inst);
            print_reg(&cpu);
        }
        cpu
    }
}

fn print_inst(time: u64, addr: u16, inst: &Inst) {
    cprintln!("[{:0>6}] <b>{:04X}</> {}", time, addr, inst.cformat());
}

fn print_reg(cpu: &State) {
    println!(" +-------------+-------------+-------------+-------------+");
    println!(
        " |  RRET: {:0>4X} | RADDR: {:0>4X} |    R2: {:0>4X} |    R3: {:0>4X} |",
        cpu.get(Reg::RRET),
        cpu.get(Reg::RADDR),
        cpu.get(Reg::R2),
        cpu.get(Reg::R3)
    );
    println!(
        " |    R4: {:0>4X} | REXPR: {:0>4X} |   RSB: {:0>4X} |   RSP: {:0>4X} |",
        cpu.get(Reg::R4),
        cpu.get(Reg::REXPR),
        cpu.get(Reg::RSB),
        cpu.get(Reg::RSP)
    );
    println!(" +-------------+-------------+-------------+-------------+");
}

fn print_stack(cpu: &State) {
    let sb = cpu.get(Reg::RSB);
    let sp = cpu.get(Reg::RSP);
    let mut addr = sb.saturating_sub(6);
    while addr < sp {
        let mark = if addr == sb { "<- RSB" } else { "" };
        println!(" | {:0>4X} : {:0>4X} {:<40}|", addr, cpu.load(addr), mark);
        addr += 2;
    }
    println!(" +-------------------------------------------------------+");
}

fn print_heap(cpu: &State, addrs: &[u16]) {
    for addr in addrs {
        println!(" | {:0>4X} : {:0>4X} {:<40}|", addr, cpu.load(*addr), "");
    }
    if !addrs.is_empty() {
        println!(" +-------------------------------------------------------+");
    }
}
