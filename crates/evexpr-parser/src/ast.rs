//! Owned, typed AST for expressions.
//!
//! Every node is an [`Expr`]: a [`Span`] plus one [`ExprKind`] variant.
//! Consumers walk the tree with exhaustive `match`es; there is no visitor
//! trait. The tree is immutable once [`crate::parse`] returns it.

use std::fmt::{self, Write};

use evexpr_common::span::Span;
use serde::Serialize;

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The name, if this node is a bare identifier.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Number {
        value: f64,
        /// The literal as written, e.g. `.50`.
        text: String,
    },
    /// String literal with escapes decoded.
    String { value: String },
    /// A bare name. Whether it is an object or a variable depends on the
    /// parameter it is written in.
    Identifier { name: String },
    Variable(VariableAccessor),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(FunctionCall),
    /// Nothing was written.
    Empty,
    Error(ErrorNode),
}

/// A name written in the source together with its own location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Name {
    pub text: String,
    pub span: Span,
}

impl Name {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// `Var.child[index]...` -- chained access on a variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableAccessor {
    pub name: Name,
    pub accessors: Vec<Accessor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Accessor {
    /// `.child`
    Child { name: String, span: Span },
    /// `[expression]`
    Index { index: Box<Expr>, span: Span },
}

/// One of the three call shapes: `Func()`, `Object.Func()` and
/// `Object.Behavior::Func()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub object: Option<Name>,
    pub behavior: Option<Name>,
    pub function: Name,
    pub parameters: Vec<Expr>,
}

impl FunctionCall {
    /// Index, in the metadata parameter list, of the first parameter the
    /// user writes. Object and behavior names are implicit leading
    /// parameters supplied by the call syntax.
    pub fn written_parameters_first_index(&self) -> usize {
        written_parameters_first_index(self.object.is_some(), self.behavior.is_some())
    }
}

/// 0 for free functions, 1 for object functions, 2 for behavior functions.
pub fn written_parameters_first_index(has_object: bool, has_behavior: bool) -> usize {
    match (has_object, has_behavior) {
        (_, true) => 2,
        (true, false) => 1,
        (false, false) => 0,
    }
}

/// Produced when the parser could not match the grammar. Always a leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNode {
    pub reason: String,
    /// The source text the node stands for.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ── Debug tree ───────────────────────────────────────────────────────────

/// Render the tree as one `KIND@start..end` line per node, children
/// indented by two spaces. Used by snapshot tests and the `ast` command.
pub fn debug_tree(expr: &Expr) -> String {
    let mut out = String::new();
    write_node(&mut out, expr, 0);
    out
}

fn write_node(out: &mut String, expr: &Expr, depth: usize) {
    let indent = "  ".repeat(depth);
    let span = expr.span;
    let _ = write!(out, "{indent}");
    match &expr.kind {
        ExprKind::Number { text, .. } => {
            let _ = writeln!(out, "NUMBER@{}..{} {text}", span.start, span.end);
        }
        ExprKind::String { value } => {
            let _ = writeln!(out, "STRING@{}..{} {value:?}", span.start, span.end);
        }
        ExprKind::Identifier { name } => {
            let _ = writeln!(out, "IDENTIFIER@{}..{} {name}", span.start, span.end);
        }
        ExprKind::Variable(var) => {
            let _ = writeln!(out, "VARIABLE@{}..{} {}", span.start, span.end, var.name.text);
            for accessor in &var.accessors {
                match accessor {
                    Accessor::Child { name, span } => {
                        let _ = writeln!(out, "{indent}  CHILD@{}..{} {name}", span.start, span.end);
                    }
                    Accessor::Index { index, span } => {
                        let _ = writeln!(out, "{indent}  INDEX@{}..{}", span.start, span.end);
                        write_node(out, index, depth + 2);
                    }
                }
            }
        }
        ExprKind::Unary { op, operand } => {
            let _ = writeln!(out, "UNARY@{}..{} {}", span.start, span.end, op.symbol());
            write_node(out, operand, depth + 1);
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let _ = writeln!(out, "BINARY@{}..{} {}", span.start, span.end, op.symbol());
            write_node(out, lhs, depth + 1);
            write_node(out, rhs, depth + 1);
        }
        ExprKind::Call(call) => {
            let mut callee = String::new();
            if let Some(object) = &call.object {
                callee.push_str(&object.text);
                callee.push('.');
            }
            if let Some(behavior) = &call.behavior {
                callee.push_str(&behavior.text);
                callee.push_str("::");
            }
            callee.push_str(&call.function.text);
            let _ = writeln!(out, "CALL@{}..{} {callee}", span.start, span.end);
            for param in &call.parameters {
                write_node(out, param, depth + 1);
            }
        }
        ExprKind::Empty => {
            let _ = writeln!(out, "EMPTY@{}..{}", span.start, span.end);
        }
        ExprKind::Error(err) => {
            let _ = writeln!(out, "ERROR@{}..{} {:?}", span.start, span.end, err.text);
        }
    }
}
