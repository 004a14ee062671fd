use super::ast::{Decl, Expr, Head};
use super::parser;
use super::parsercore::{ParseResult, Parser};
use once_cell::sync::Lazy;

/// A grammar rule: probe at a token position.
pub type Rule<T> = fn(&Parser<'_>, usize) -> ParseResult<T>;

/// Ordered rule lists. Rules are tried in registration order and the first match wins.
#[derive(Clone, Default)]
pub struct Grammar {
    pub(crate) root: Vec<(&'static str, Rule<Decl>)>,
    pub(crate) statement: Vec<(&'static str, Rule<Head>)>,
    pub(crate) value: Vec<(&'static str, Rule<Expr>)>,
}

/// The standard grammar, built once and shared read-only.
pub static STANDARD: Lazy<Grammar> = Lazy::new(Grammar::standard);

impl Grammar {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut grammar = Grammar::new();
        grammar
            .add_root("function", parser::func_decl)
            .add_root("global", parser::global_var);
        grammar
            .add_statement("scope", parser::scope_stmt)
            .add_statement("if", parser::if_stmt)
            .add_statement("while", parser::while_stmt)
            .add_statement("var", parser::var_stmt)
            .add_statement("return", parser::return_stmt)
            .add_statement("write", parser::write_stmt)
            .add_statement("assign", parser::assign_stmt)
            .add_statement("expression", parser::expr_stmt);
        grammar
            .add_value("integer", parser::integer)
            .add_value("call", parser::call)
            .add_value("variable", parser::variable)
            .add_value("parentheses", parser::parentheses);
        grammar
    }

    pub fn add_root(&mut self, name: &'static str, rule: Rule<Decl>) -> &mut Self {
        self.root.push((name, rule));
        self
    }

    pub fn add_statement(&mut self, name: &'static str, rule: Rule<Head>) -> &mut Self {
        self.statement.push((name, rule));
        self
    }

    pub fn add_value(&mut self, name: &'static str, rule: Rule<Expr>) -> &mut Self {
        self.value.push((name, rule));
        self
    }

    /// Rule names in (root, statement, value) order.
    pub fn names(&self) -> (Vec<&str>, Vec<&str>, Vec<&str>) {
        (
            self.root.iter().map(|(n, _)| *n).collect(),
            self.statement.iter().map(|(n, _)| *n).collect(),
            self.value.iter().map(|(n, _)| *n).collect(),
        )
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (root, statement, value) = self.names();
        f.debug_struct("Grammar")
            .field("root", &root)
            .field("statement", &statement)
            .field("value", &value)
            .finish()
    }
}
