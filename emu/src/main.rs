use clap::Parser;
use color_print::cprintln;

use tinemu::hooks::{dump::Dump, Hook};
use tinemu::{Error, State};

#[derive(Parser, Debug)]
#[clap(name = "tinemu", version, about = "Emulator for the tinc stack machine")]
struct Args {
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    #[arg(short, long)]
    dump_cfg: Option<String>,

    #[arg(short = 'a', long)]
    dump_all: bool,

    #[arg(default_value = "main.bin")]
    input_file: String,
}

fn main() {
    let args = Args::parse();
    println!("tinemu");

    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    if let Err(e) = run(args) {
        cprintln!("<red,bold>error</>: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    // ------------------------------------------------------------------------
    // Initialize state machine model
    let mut state = State::load_rom_file(&args.input_file)?;

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Dump::arg(args.dump_cfg, args.dump_all)?)];
    state = hooks.iter_mut().fold(state, |state, hook| hook.init(state));

    // ------------------------------------------------------------------------
    // Main loop
    for time in 0..args.tmax.unwrap_or(u64::MAX) {
        let (addr, inst) = state.exec()?;
        state = hooks
            .iter_mut()
            .fold(state, |state, hook| hook.exec(time, addr, &inst, state));
        if state.is_terminated() {
            println!("[HALT] after {} steps", time + 1);
            break;
        }
    }

    // Exit
    println!("=================================================");
    cprintln!("RRET = <g>{}</>", state.get(arch::Reg::RRET));
    Ok(())
}
