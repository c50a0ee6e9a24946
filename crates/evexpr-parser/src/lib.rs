//! Parser for event-sheet expressions.
//!
//! Turns source text into an owned [`Expr`] tree. Parsing never fails: bad
//! input yields [`ErrorNode`](ast::ErrorNode)s in the tree plus a list of
//! [`ParseError`]s, so later stages always have a root to walk.

pub mod ast;
pub mod error;
mod parser;

use evexpr_lexer::Lexer;

pub use ast::{debug_tree, Expr, ExprKind};
pub use error::ParseError;

/// The result of parsing one expression.
#[derive(Debug, Clone)]
pub struct Parse {
    root: Expr,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Errors and warnings, in the order they were found.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// True when no error was reported. Warnings do not count.
    pub fn ok(&self) -> bool {
        self.errors.iter().all(|e| !e.is_error())
    }

    pub fn into_parts(self) -> (Expr, Vec<ParseError>) {
        (self.root, self.errors)
    }
}

/// Parse a complete expression.
pub fn parse(source: &str) -> Parse {
    let tokens = Lexer::tokenize(source);
    let mut p = parser::Parser::new(tokens, source);
    let root = parser::parse_root(&mut p);
    let errors = p.finish();
    Parse { root, errors }
}
