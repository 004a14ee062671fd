use crate::grammer::token::Token;
use arch::Asm;
use color_print::cprintln;

pub fn print_section(title: &str, body: &str) {
    cprintln!("<bold>{}</>", title);
    println!("---------------------------------");
    print!("{}", body);
    if !body.ends_with('\n') {
        println!();
    }
    println!("---------------------------------");
}

pub fn print_tokens(tokens: &[Token]) {
    cprintln!("<bold>Tokens:</>");
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>4} @{:<5} {}", idx, token.offset, token.kind);
    }
}

pub fn print_assembly(code: &[Asm]) {
    cprintln!("<bold>Assembly:</>");
    for line in code {
        println!("{}", line.cformat());
    }
}
