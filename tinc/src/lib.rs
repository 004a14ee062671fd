pub mod compile;
pub mod error;
pub mod grammer;
pub mod preprocess;
pub mod symbols;
pub mod util;

pub use compile::{generate, Frame, Program, Slot};
pub use error::Error;
pub use grammer::ast;
pub use grammer::grammar::{Grammar, Rule, STANDARD};
pub use grammer::lexer::Lexer;
pub use grammer::parsercore::{Parse, ParseResult, Parser};
pub use grammer::token::{Token, TokenKind};
pub use preprocess::preprocess;
pub use util::maps::SymbolMap;

use tinasm::Labels;
use util::display::{print_assembly, print_section, print_tokens};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Binary,
    Text,
}

/// Which stage dumps to print and which artifact to produce.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub debug_preprocess: bool,
    pub debug_tokens: bool,
    pub debug_tree: bool,
    pub debug_assembly: bool,
    pub format: Format,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Binary(Vec<u8>),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Compiled {
    pub artifact: Artifact,
    pub symbols: SymbolMap,
}

/// Preprocess and tokenize.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(&preprocess(source)?).parse()
}

/// Parse with the standard grammar.
pub fn parse(tokens: &[Token]) -> Result<ast::Root, Error> {
    Parser::new(tokens, &STANDARD).parse()
}

/// Run the whole pipeline with the standard grammar.
pub fn compile(source: &str, options: &Options) -> Result<Compiled, Error> {
    compile_with(source, options, &STANDARD)
}

pub fn compile_with(source: &str, options: &Options, grammar: &Grammar) -> Result<Compiled, Error> {
    let code = preprocess(source)?;
    if options.debug_preprocess {
        print_section("Preprocessed code:", &code);
    }

    let tokens = Lexer::new(&code).parse()?;
    if options.debug_tokens {
        print_tokens(&tokens);
    }

    let root = Parser::new(&tokens, grammar).parse()?;
    if options.debug_tree {
        print_section("Syntax tree:", &root.describe());
    }

    let program = generate(&root)?;
    if options.debug_assembly {
        print_assembly(&program.code);
    }

    let labels = Labels::collect(&program.code)?;
    let symbols = SymbolMap::generate(&program, &labels);
    let artifact = match options.format {
        Format::Binary => Artifact::Binary(tinasm::encode(&program.code, &labels)?),
        Format::Text => Artifact::Text(tinasm::listing(&program.code)),
    };
    Ok(Compiled { artifact, symbols })
}
