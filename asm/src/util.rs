use crate::label::Labels;
use arch::Asm;
use color_print::cformat;

/// Print a program with resolved addresses and encoded bytes.
pub fn print_dump(program: &[Asm], labels: &Labels) {
    println!("-------------------+-----------------------------------------------------");
    let mut pc: u16 = 0;
    for line in program {
        match line {
            Asm::Label(name) => {
                println!("{:19}| {}", "", cformat!("<g>{}:</>", name));
            }
            Asm::Inst(inst) => {
                let bin_str = match inst.encode(|name| labels.resolve(name)) {
                    Ok(bin) => bin
                        .iter()
                        .map(|b| format!("{:02X}", b))
                        .collect::<Vec<_>>()
                        .join(" "),
                    Err(_) => cformat!("<r,s>!! !! !! !!</>"),
                };
                println!("[{:04X}] {:<11} |     {}", pc, bin_str, inst.cformat());
                pc = pc.wrapping_add(inst.len());
            }
        }
    }
    println!("-------------------+-----------------------------------------------------");
}
