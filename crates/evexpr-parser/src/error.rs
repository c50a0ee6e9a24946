//! Parse error type for the expression parser.

use std::fmt;

use evexpr_common::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use evexpr_common::span::Span;

/// A syntax problem with location information and optional related span.
///
/// Parse errors never abort parsing: the parser records one, emits an
/// error node when it has to, and continues with the rest of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub code: DiagnosticCode,
    pub message: String,
    /// Primary source location where the problem was detected.
    pub span: Span,
    pub severity: Severity,
    /// Optional related location, e.g. "opened here" for an unclosed `(`.
    pub related: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
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
            ..Self::new(code, message, span)
        }
    }

    pub fn with_related(mut self, related_message: impl Into<String>, related_span: Span) -> Self {
        self.related = Some((related_message.into(), related_span));
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            code: self.code,
            message: self.message.clone(),
            span: self.span,
            severity: self.severity,
            related: self.related.clone(),
        }
    }
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        Diagnostic {
            code: err.code,
            message: err.message,
            span: err.span,
            severity: err.severity,
            related: err.related,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
