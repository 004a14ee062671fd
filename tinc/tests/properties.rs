use std::collections::HashSet;
use tinc::{compile, Artifact, Compiled, Format, Options, SymbolMap};

fn binary(code: &str) -> (Vec<u8>, SymbolMap) {
    let Compiled { artifact, symbols } = compile(code, &Options::default()).unwrap();
    match artifact {
        Artifact::Binary(bin) => (bin, symbols),
        Artifact::Text(_) => panic!("expected a binary"),
    }
}

fn text(code: &str) -> String {
    let options = Options {
        format: Format::Text,
        ..Default::default()
    };
    match compile(code, &options).unwrap().artifact {
        Artifact::Text(text) => text,
        Artifact::Binary(_) => panic!("expected a text listing"),
    }
}

const SAMPLE: &str = "
var total;
func add(a, b) { return a + b; }
func main() {
    var i = 0;
    while i < 5 {
        if i % 2 == 0 total = add(total, i);
        i = i + 1;
    }
    write 0x7000 total;
    return total;
}
";

#[test]
fn deterministic() {
    let (a, map_a) = binary(SAMPLE);
    let (b, map_b) = binary(SAMPLE);
    assert_eq!(a, b);
    assert_eq!(map_a, map_b);
    assert_eq!(text(SAMPLE), text(SAMPLE));
}

#[test]
fn labels_are_unique() {
    for n in 1..=12 {
        let nested = "if 1 ".repeat(n) + "{ }";
        let sequential = "while 0 { } ".repeat(n);
        let code = format!("func main() {{ {nested} {sequential} if 1 while 0 {{ }} }}");

        let listing = text(&code);
        let labels: Vec<&str> = listing
            .lines()
            .filter_map(|line| line.strip_suffix(':'))
            .collect();
        let unique: HashSet<&str> = labels.iter().copied().collect();
        assert_eq!(labels.len(), unique.len(), "{code}");
        // if: 2 labels, while: 3, plus func/return/entry call_ret
        assert_eq!(labels.len(), 2 * (n + 1) + 3 * (n + 1) + 3);

        // the assembler would reject a redefinition
        binary(&code);
    }
}

#[test]
fn local_offsets_are_dense() {
    for k in 1..=10 {
        // spread the locals over nested scopes
        let body: String = (0..k)
            .map(|i| format!("{{ var v{i} = {i}; "))
            .chain((0..k).map(|_| "} ".to_string()))
            .collect();
        let (_, symbols) = binary(&format!("func main() {{ {body}}}"));
        let frame = &symbols.frames["main"];
        let offsets: Vec<i8> = frame.locals.iter().map(|slot| slot.offset).collect();
        let expect: Vec<i8> = (0..k).map(|i| 2 * i as i8).collect();
        assert_eq!(offsets, expect);
        assert_eq!(frame.size, 2 * k as u16);
    }
}

#[test]
fn disassembly_matches_listing() {
    let (bin, _) = binary(SAMPLE);
    let listed: Vec<String> = text(SAMPLE)
        .lines()
        .filter(|line| line.starts_with("    "))
        .map(|line| line.split_whitespace().next().unwrap().to_string())
        .collect();
    let decoded: Vec<String> = tinasm::disassemble(&bin)
        .unwrap()
        .into_iter()
        .map(|(_, inst)| inst.op.to_string())
        .collect();
    assert_eq!(listed, decoded);
}

#[test]
fn labels_resolve_to_code_addresses() {
    let (bin, symbols) = binary(SAMPLE);
    let decoded = tinasm::disassemble(&bin).unwrap();
    let starts: HashSet<u16> = decoded.iter().map(|(addr, _)| *addr).collect();
    for (name, addr) in &symbols.labels {
        assert!(
            starts.contains(addr) || *addr as usize == bin.len(),
            "{name} at {addr}"
        );
    }
    // the entry sequence precedes every function
    let halt = decoded
        .iter()
        .find(|(_, inst)| inst.op == arch::Opcode::HALT)
        .map(|(addr, _)| *addr)
        .unwrap();
    assert!(symbols.labels["func_add"] > halt);
    assert!(symbols.labels["func_main"] > symbols.labels["func_add"]);
}

#[test]
fn symbol_map_yaml() {
    let (_, symbols) = binary(SAMPLE);
    let yaml = symbols.to_yaml().unwrap();
    println!("{yaml}");
    assert!(yaml.contains("func_main:"));
    assert!(yaml.contains("var_total:"));
    let back: SymbolMap = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, symbols);
}
