use tinc::{compile, Artifact, Compiled, Error, Format, Options, Slot};

fn build(code: &str) -> Result<Compiled, Error> {
    let options = Options {
        format: Format::Text,
        ..Default::default()
    };
    compile(code, &options)
}

fn listing(code: &str) -> String {
    match build(code).unwrap().artifact {
        Artifact::Text(text) => {
            println!("{text}");
            text
        }
        Artifact::Binary(_) => panic!("expected a text listing"),
    }
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// `block` appears as consecutive lines of `text`.
fn contains_block(text: &str, block: &[&str]) -> bool {
    lines(text).windows(block.len()).any(|w| w == block)
}

#[test]
fn entry_calls_main_then_halts() {
    let text = listing("func main() { var x = 2 + 3; return x; }");
    let lines = lines(&text);
    assert!(lines[0].starts_with("    IMM RADDR call_ret_"));
    assert_eq!(lines[1], "    PUSH RADDR");
    assert_eq!(lines[2], "    JMP func_main");
    assert!(lines[3].starts_with("call_ret_"));
    assert_eq!(lines[4], "    HALT");
    assert_eq!(lines[5], "func_main:");
    assert!(text.contains("    MEMW RSB RRET 0\n"));
    assert!(text.contains("    MEMR RSB 0 RRET\n"));
}

#[test]
fn prologue_and_epilogue() {
    let text = listing("func f(a, b) { var x; return a; } func main() { return f(1, 2); }");
    assert!(contains_block(
        &text,
        &[
            "func_f:",
            "    PUSH RSB",
            "    MOV RSP RSB",
            "    IMM R2 2",
            "    ADD RSB R2 RSP",
        ]
    ));
    assert!(contains_block(
        &text,
        &[
            "return_f:",
            "    MOV RSB RSP",
            "    POP RSB",
            "    POP RADDR",
            "    JMPR RADDR",
        ]
    ));
    // first parameter sits farthest below the frame base
    assert!(text.contains("    MEMR RSB -8 RRET\n"));
}

#[test]
fn caller_pops_arguments() {
    let text = listing("func f(a, b) { return a; } func main() { return f(1, 2); }");
    let lines = lines(&text);
    let jmp = lines.iter().position(|l| *l == "    JMP func_f").unwrap();
    assert_eq!(lines[jmp - 3], "    PUSH RRET");
    assert!(lines[jmp - 2].starts_with("    IMM RADDR call_ret_"));
    assert_eq!(lines[jmp - 1], "    PUSH RADDR");
    assert!(lines[jmp + 1].starts_with("call_ret_"));
    assert_eq!(lines[jmp + 2], "    POP RADDR");
    assert_eq!(lines[jmp + 3], "    POP RADDR");
    assert_ne!(lines[jmp + 4], "    POP RADDR");
}

#[test]
fn binary_operator() {
    let text = listing("func main() { return 1 - 2; }");
    assert!(contains_block(
        &text,
        &[
            "    IMM RRET 1",
            "    MOV RRET REXPR",
            "    PUSH REXPR",
            "    IMM RRET 2",
            "    POP REXPR",
            "    SUB REXPR RRET RRET",
            "    JMP return_main",
        ]
    ));
}

#[test]
fn global_access() {
    let text = listing("var g; func main() { g = 5; return g; }");
    assert!(contains_block(&text, &["var_g:", "    WORD 0"]));
    assert!(contains_block(
        &text,
        &["    IMM RRET 5", "    IMM RADDR var_g", "    MEMW RADDR RRET 2"]
    ));
    assert!(contains_block(
        &text,
        &["    IMM RADDR var_g", "    MEMR RADDR 2 RRET"]
    ));
}

#[test]
fn write_statement() {
    let text = listing("func main() { write 100 7; }");
    assert!(contains_block(
        &text,
        &[
            "    IMM RRET 100",
            "    PUSH RRET",
            "    IMM RRET 7",
            "    POP REXPR",
            "    MEMW REXPR RRET 0",
        ]
    ));
}

#[test]
fn if_lowering() {
    let text = listing("func main() { if 1 return 2; return 3; }");
    assert!(contains_block(
        &text,
        &[
            "    IMM RRET 1",
            "    JMPIF RRET if_begin_0",
            "    JMP if_end_1",
            "if_begin_0:",
            "    IMM RRET 2",
            "    JMP return_main",
            "if_end_1:",
        ]
    ));
}

#[test]
fn while_has_one_backward_jump() {
    let text = listing("func main() { while (1) { } }");
    let lines = lines(&text);
    let mut backward = 0;
    for (idx, line) in lines.iter().enumerate() {
        if let Some(target) = line.strip_prefix("    JMP ") {
            let label = format!("{target}:");
            if lines[..idx].contains(&label.as_str()) {
                backward += 1;
            }
        }
    }
    assert_eq!(backward, 1);
    assert!(contains_block(
        &text,
        &["    JMP while_head_0", "while_end_2:"]
    ));
}

#[test]
fn arity_mismatch() {
    let err = build("func foo(a) { return a; } func main() { return foo(1, 2); }").unwrap_err();
    assert!(err.to_string().contains("expected 1, got 2"));
    assert!(matches!(err, Error::ArityMismatch { expected: 1, got: 2, .. }));

    let err = build("func main(a) { }").unwrap_err();
    assert!(matches!(err, Error::ArityMismatch { offset: Some(5), .. }));
}

#[test]
fn undefined_symbols() {
    let err = build("func main() { return y; }").unwrap_err();
    assert_eq!(err.to_string(), "undefined symbol 'y'");
    assert_eq!(err.offset(), Some(21));

    // declarations are visible only after they appear
    let err = build("func main() { return f(); } func f() { return 1; }").unwrap_err();
    assert_eq!(err.to_string(), "undefined symbol 'f'");

    let err = build("func f() { }").unwrap_err();
    assert_eq!(err.to_string(), "undefined symbol 'main'");
    assert_eq!(err.offset(), None);

    // a scope's bindings end with it
    let err = build("func main() { { var x; } return x; }").unwrap_err();
    assert_eq!(err.to_string(), "undefined symbol 'x'");
}

#[test]
fn wrong_symbol_kind() {
    let err = build("func main() { var x; return x(); }").unwrap_err();
    assert_eq!(err.to_string(), "symbol 'x' is not a function");

    let err = build("func f() { } func main() { f = 1; }").unwrap_err();
    assert_eq!(err.to_string(), "symbol 'f' is not a variable");
}

#[test]
fn recursion_sees_itself() {
    let text = listing("func main() { return main(); }");
    assert_eq!(text.matches("    JMP func_main\n").count(), 2);
}

#[test]
fn frame_layout() {
    let compiled = build("func f(a, b, c) { var x; { var y; } var z; } func main() { }").unwrap();
    let frame = &compiled.symbols.frames["f"];
    assert_eq!(
        frame.args,
        vec![Slot::new("a", -10), Slot::new("b", -8), Slot::new("c", -6)]
    );
    assert_eq!(
        frame.locals,
        vec![Slot::new("x", 0), Slot::new("y", 2), Slot::new("z", 4)]
    );
    assert_eq!(frame.size, 6);
    assert_eq!(compiled.symbols.frames["main"].size, 0);
}

#[test]
fn frame_overflow() {
    let locals = |n: usize| -> String {
        let body: String = (0..n).map(|i| format!("var v{i}; ")).collect();
        format!("func main() {{ {body}}}")
    };
    assert!(build(&locals(64)).is_ok());
    let err = build(&locals(65)).unwrap_err();
    assert!(matches!(err, Error::FrameOverflow(ref name) if name == "main"));
}

#[test]
fn parameter_overflow() {
    let params = |n: usize| -> String {
        let names: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
        format!("func f({}) {{ }} func main() {{ }}", names.join(", "))
    };
    let compiled = build(&params(62)).unwrap();
    assert_eq!(compiled.symbols.frames["f"].args[0].offset, -128);

    for n in [63, 17_000] {
        let err = build(&params(n)).unwrap_err();
        assert!(matches!(err, Error::FrameOverflow(ref name) if name == "f"), "{n}");
    }
}

#[test]
fn main_arity_points_at_declaration() {
    let err = build("var g;\nfunc main(a) { }").unwrap_err();
    assert!(matches!(err, Error::ArityMismatch { expected: 1, got: 0, .. }));
    assert_eq!(err.offset(), Some(12));
}

#[test]
fn duplicate_function_is_a_label_clash() {
    let err = build("func main() { } func main() { }").unwrap_err();
    assert!(matches!(err, Error::Assembly(tinasm::Error::RedefinedLabel(_))));
}
