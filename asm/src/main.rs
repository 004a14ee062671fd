use color_print::cprintln;
use std::io::Write;
use tinasm::{parser, util::print_dump, Error, Labels};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input listing
    #[clap(default_value = "main.s")]
    input: String,

    /// Output file
    #[clap(short, long, default_value = "main.bin")]
    output: String,

    /// Dump assembly code
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("tinasm");

    let text = match std::fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(e) => {
            Error::FileOpen(args.input.clone(), e).print_diag(&args.input, "");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args, &text) {
        e.print_diag(&args.input, &text);
        std::process::exit(1);
    }
}

fn run(args: &Args, text: &str) -> Result<(), Error> {
    println!("1. Read File and Parse Lines");
    println!("  < {}", args.input);
    let program = parser::parse(text)?;

    println!("2. Resolve Labels");
    let labels = Labels::collect(&program)?;
    cprintln!("  <g>{}</> labels", labels.len());

    println!("3. Generate Binary");
    let bin = tinasm::encode(&program, &labels)?;
    println!("  > {} ({} bytes)", args.output, bin.len());
    let mut file = std::fs::File::create(&args.output)
        .map_err(|e| Error::FileCreate(args.output.clone(), e))?;
    file.write_all(&bin)
        .map_err(|e| Error::FileWrite(args.output.clone(), e))?;

    if args.dump {
        print_dump(&program, &labels);
    }
    Ok(())
}
