use tinc::ast::{BinOp, Expr};
use tinc::{tokenize, Error, Grammar, Parse, ParseResult, Parser, TokenKind, STANDARD};

fn tree_with(code: &str, grammar: &Grammar) -> Result<String, Error> {
    let tokens = tokenize(code)?;
    Ok(Parser::new(&tokens, grammar).parse()?.describe())
}

fn case(code: &str, expect: &str) {
    let tree = tree_with(code, &STANDARD).unwrap();
    println!("{code}\n{tree}");
    assert_eq!(tree, expect);
}

fn fails(code: &str, offset: usize, message: &str) {
    let err = tree_with(code, &STANDARD).unwrap_err();
    println!("{code}\n{err}");
    assert_eq!(err.to_string(), message);
    assert_eq!(err.offset(), Some(offset));
}

#[test]
fn function_with_locals() {
    case(
        "func main() { var x = 2 + 3; return x; }",
        "\
func main()
    scope
        var x
            +
                2
                3
        return
            x
",
    );
}

#[test]
fn globals_and_params() {
    case(
        "var g; func add(a, b) { g = a + b; return; }",
        "\
global g
func add(a, b)
    scope
        assign g
            +
                a
                b
        return
",
    );
}

#[test]
fn no_precedence() {
    // (2 + 3) * 4
    case(
        "func main() { return 2 + 3 * 4; }",
        "\
func main()
    scope
        return
            *
                +
                    2
                    3
                4
",
    );
    case(
        "func main() { return 2 + (3 * 4); }",
        "\
func main()
    scope
        return
            +
                2
                ()
                    *
                        3
                        4
",
    );
}

#[test]
fn modifiers_take_next_statement() {
    case(
        "func f() { if x while y z = 1; w = 2; }",
        "\
func f()
    scope
        if
            x
            while
                y
                assign z
                    1
        assign w
            2
",
    );
}

#[test]
fn calls_and_writes() {
    case(
        "func f() { g(1, h()); g; write 0x7000 'A'; {} }",
        "\
func f()
    scope
        expr
            call g
                1
                call h
        expr
            g
        write
            28672
            65
        scope
",
    );
}

#[test]
fn comments_are_skipped() {
    case(
        "// head\nfunc main() { /* a /* nested */ b */ return 1; }",
        "\
func main()
    scope
        return
            1
",
    );
}

#[test]
fn errors() {
    fails("func main() { return 1 }", 23, "expected ';'");
    fails("func main() { var x = 1;", 24, "expected '}' at the end of scope");
    fails("func main( { }", 11, "expected parameter name");
    fails("func f(a b) {}", 9, "expected ')' or ',' after parameter");
    fails("func main() { x = ; }", 18, "expected expression after '='");
    fails("func main() { 1 + ; }", 18, "expected value after '+'");
    fails("func main() { if }", 17, "expected condition after 'if'");
    fails("func main() { if 1 }", 19, "expected statement");
    fails("func main() { ) }", 14, "unrecognized statement");
    fails("func f() { g(1 2); }", 15, "expected ')' or ',' after argument");
    fails("func f() return 1;", 9, "expected '{' to open the function body");
    fails("var;", 3, "expected variable name after 'var'");
    fails("return 1;", 0, "unrecognized statement");
    fails("func main() { } */", 16, "closed unopened multiline comment");
}

#[test]
fn standard_rule_order() {
    let (root, statement, value) = STANDARD.names();
    assert_eq!(root, vec!["function", "global"]);
    assert_eq!(
        statement,
        vec!["scope", "if", "while", "var", "return", "write", "assign", "expression"]
    );
    assert_eq!(value, vec!["integer", "call", "variable", "parentheses"]);
}

// `-v` as `0 - v`
fn negate(p: &Parser<'_>, pos: usize) -> ParseResult<Expr> {
    if !p.check_if(pos, |kind| matches!(kind, TokenKind::Minus)) {
        return Ok(Parse::NoMatch);
    }
    match p.parse_value(pos + 1)? {
        Parse::Matched(value, next) => Ok(Parse::Matched(
            Expr::Binary {
                left: Box::new(Expr::Int(0)),
                op: BinOp::Sub,
                right: Box::new(value),
            },
            next,
        )),
        Parse::NoMatch => Err(Error::syntax(p.peek(pos + 1).offset, "expected value after '-'")),
    }
}

#[test]
fn registered_rule() {
    let code = "func main() { return -5; }";
    assert_eq!(
        tree_with(code, &STANDARD).unwrap_err().to_string(),
        "expected ';'"
    );

    let mut grammar = Grammar::standard();
    grammar.add_value("negate", negate);
    assert_eq!(
        tree_with(code, &grammar).unwrap(),
        "\
func main()
    scope
        return
            -
                0
                5
"
    );
}

#[test]
fn first_match_wins() {
    use tinc::grammer::parser;

    // `variable` ahead of `call` swallows the callee name
    let mut grammar = Grammar::new();
    grammar.add_root("function", parser::func_decl);
    grammar
        .add_statement("return", parser::return_stmt)
        .add_statement("expression", parser::expr_stmt);
    grammar
        .add_value("integer", parser::integer)
        .add_value("variable", parser::variable)
        .add_value("call", parser::call);

    let err = tree_with("func main() { f(1); }", &grammar).unwrap_err();
    assert_eq!(err.to_string(), "expected ';'");
    assert_eq!(err.offset(), Some(15));
}
