//! Semantic checking of event sheet expressions.
//!
//! [`check_expression`] is the whole pipeline: parse the text, then
//! validate the tree against the metadata registry and the declared
//! objects. The result always carries a tree, a type and every problem
//! found, however malformed the input.
//!
//! - [`ty`]: semantic types and parameter kind families
//! - [`validate`]: the validator
//! - [`diagnostics`]: ariadne and JSON rendering

pub mod diagnostics;
pub mod ty;
pub mod validate;

use serde::Serialize;
use tracing::{debug, trace};

use evexpr_common::diagnostic::Diagnostic;
use evexpr_metadata::{MetadataProvider, ObjectsScope};
use evexpr_parser::Expr;

pub use ty::{ParameterFamily, SemanticType};
pub use validate::{validate, Validation};

/// The outcome of checking one expression.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionReport {
    pub root: Expr,
    /// Resolved type of the whole expression.
    #[serde(rename = "type")]
    pub ty: SemanticType,
    /// Parse diagnostics first, then validation diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

impl ExpressionReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// Parse and validate `source` where a value of type `expected` is required.
pub fn check_expression(
    source: &str,
    expected: SemanticType,
    provider: &dyn MetadataProvider,
    objects: &ObjectsScope,
) -> ExpressionReport {
    trace!(source, %expected, "checking expression");

    let (root, errors) = evexpr_parser::parse(source).into_parts();
    let validation = validate(&root, expected, provider, objects);

    let mut diagnostics: Vec<Diagnostic> = errors.into_iter().map(Diagnostic::from).collect();
    diagnostics.extend(validation.diagnostics);

    debug!(
        %expected,
        resolved = %validation.ty,
        diagnostics = diagnostics.len(),
        "expression checked"
    );

    ExpressionReport {
        root,
        ty: validation.ty,
        diagnostics,
    }
}
