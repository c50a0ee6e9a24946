//! Diagnostics reported by the parser and the validator.
//!
//! Diagnostics are data, not control flow: every stage appends to a list
//! and keeps going, so the editor can underline all problems of an
//! expression at once.

use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// Whether a diagnostic blocks the expression or is merely reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Stable identifier of a diagnostic. The snake_case string form is part
/// of the public contract with the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    // ── Syntax ─────────────────────────────────────────────────────────
    SyntaxError,
    MissingOperand,
    UnterminatedString,
    UnmatchedParenthesis,
    UnexpectedClosingParenthesis,
    UnterminatedParameters,
    UnterminatedIndex,
    ExtraCharacters,
    RedundantParentheses,
    NestingTooDeep,

    // ── Resolution and types ───────────────────────────────────────────
    TypeError,
    InvalidFunctionName,
    TooFewParameters,
    TooManyParameters,
    ParameterTypeMismatch,
    MalformedObjectParameter,
    MalformedBehaviorParameter,
    MalformedVariableParameter,
    UnexpectedIdentifier,
    InvalidOperator,
    EmptyExpression,
    UnsupportedObjectCapability,
    MissingObjectContext,
    InvalidBehaviorName,
    UndeclaredObjectVariable,

    // ── Registry defects ───────────────────────────────────────────────
    UnknownParameterType,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::SyntaxError => "syntax_error",
            DiagnosticCode::MissingOperand => "missing_operand",
            DiagnosticCode::UnterminatedString => "unterminated_string",
            DiagnosticCode::UnmatchedParenthesis => "unmatched_parenthesis",
            DiagnosticCode::UnexpectedClosingParenthesis => "unexpected_closing_parenthesis",
            DiagnosticCode::UnterminatedParameters => "unterminated_parameters",
            DiagnosticCode::UnterminatedIndex => "unterminated_index",
            DiagnosticCode::ExtraCharacters => "extra_characters",
            DiagnosticCode::RedundantParentheses => "redundant_parentheses",
            DiagnosticCode::NestingTooDeep => "nesting_too_deep",
            DiagnosticCode::TypeError => "type_error",
            DiagnosticCode::InvalidFunctionName => "invalid_function_name",
            DiagnosticCode::TooFewParameters => "too_few_parameters",
            DiagnosticCode::TooManyParameters => "too_many_parameters",
            DiagnosticCode::ParameterTypeMismatch => "parameter_type_mismatch",
            DiagnosticCode::MalformedObjectParameter => "malformed_object_parameter",
            DiagnosticCode::MalformedBehaviorParameter => "malformed_behavior_parameter",
            DiagnosticCode::MalformedVariableParameter => "malformed_variable_parameter",
            DiagnosticCode::UnexpectedIdentifier => "unexpected_identifier",
            DiagnosticCode::InvalidOperator => "invalid_operator",
            DiagnosticCode::EmptyExpression => "empty_expression",
            DiagnosticCode::UnsupportedObjectCapability => "unsupported_object_capability",
            DiagnosticCode::MissingObjectContext => "missing_object_context",
            DiagnosticCode::InvalidBehaviorName => "invalid_behavior_name",
            DiagnosticCode::UndeclaredObjectVariable => "undeclared_object_variable",
            DiagnosticCode::UnknownParameterType => "unknown_parameter_type",
        }
    }

    /// Whether the code comes from the parser rather than the validator.
    pub fn is_syntax(self) -> bool {
        matches!(
            self,
            DiagnosticCode::SyntaxError
                | DiagnosticCode::MissingOperand
                | DiagnosticCode::UnterminatedString
                | DiagnosticCode::UnmatchedParenthesis
                | DiagnosticCode::UnexpectedClosingParenthesis
                | DiagnosticCode::UnterminatedParameters
                | DiagnosticCode::UnterminatedIndex
                | DiagnosticCode::ExtraCharacters
                | DiagnosticCode::RedundantParentheses
                | DiagnosticCode::NestingTooDeep
        )
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found in an expression, tied to the exact source range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Span,
    pub severity: Severity,
    /// Optional secondary location, e.g. where an unclosed `(` was opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<(String, Span)>,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            severity: Severity::Error,
            related: None,
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message, span)
        }
    }

    /// Attach a related location with its own label.
    pub fn with_related(mut self, message: impl Into<String>, span: Span) -> Self {
        self.related = Some((message.into(), span));
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}..{}: {}",
            self.severity, self.code, self.span.start, self.span.end, self.message
        )
    }
}
