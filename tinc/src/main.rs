use clap::Parser;
use color_print::cprintln;
use tinc::{Artifact, Error, Format, Options};

#[derive(Debug, clap::Parser)]
#[clap(version, about)]
struct Args {
    /// Input file
    #[clap(default_value = "main.tc")]
    input: String,

    /// Output file
    #[clap(short, long, default_value = "main.bin")]
    output: String,

    /// Emit a mnemonic listing instead of machine code
    #[clap(short, long)]
    text: bool,

    /// Write label addresses and frame layouts as YAML
    #[clap(short, long)]
    symbols: Option<String>,

    #[clap(long)]
    debug_preprocess: bool,

    #[clap(long)]
    debug_tokens: bool,

    #[clap(long)]
    debug_tree: bool,

    #[clap(long)]
    debug_assembly: bool,
}

fn main() {
    let args = Args::parse();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            Error::FileRead(args.input.clone(), e).print_diag(&args.input, "");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args, &source) {
        e.print_diag(&args.input, &source);
        std::process::exit(1);
    }
}

fn run(args: &Args, source: &str) -> Result<(), Error> {
    let options = Options {
        debug_preprocess: args.debug_preprocess,
        debug_tokens: args.debug_tokens,
        debug_tree: args.debug_tree,
        debug_assembly: args.debug_assembly,
        format: if args.text { Format::Text } else { Format::Binary },
    };

    println!("1. Compile {}", args.input);
    let compiled = tinc::compile(source, &options)?;

    println!("2. Write {}", args.output);
    let bytes = match &compiled.artifact {
        Artifact::Binary(bin) => bin.as_slice(),
        Artifact::Text(text) => text.as_bytes(),
    };
    std::fs::write(&args.output, bytes).map_err(|e| Error::FileWrite(args.output.clone(), e))?;
    cprintln!("  > <g>{}</> bytes", bytes.len());

    if let Some(path) = &args.symbols {
        println!("3. Write symbols {}", path);
        std::fs::write(path, compiled.symbols.to_yaml()?)
            .map_err(|e| Error::FileWrite(path.clone(), e))?;
    }
    Ok(())
}
