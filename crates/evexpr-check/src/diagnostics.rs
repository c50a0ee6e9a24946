//! Ariadne-based rendering of expression diagnostics.
//!
//! Human output is a labeled report with the diagnostic code and, when a
//! fix is obvious, a help line. JSON output is one compact object per
//! diagnostic for editor integrations.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use evexpr_common::diagnostic::{Diagnostic, DiagnosticCode, Severity};
use evexpr_common::span::LineIndex;

/// How diagnostics are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticOptions {
    pub color: bool,
    pub json: bool,
}

impl DiagnosticOptions {
    pub fn colorless() -> Self {
        Self {
            color: false,
            json: false,
        }
    }

    pub fn json_mode() -> Self {
        Self {
            color: false,
            json: true,
        }
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            color: true,
            json: false,
        }
    }
}

// ── Fix Suggestions ────────────────────────────────────────────────────

fn help(code: DiagnosticCode) -> Option<&'static str> {
    let help = match code {
        DiagnosticCode::UnterminatedString => "add a `\"` at the end of the text",
        DiagnosticCode::UnmatchedParenthesis => "add a `)` to close the group",
        DiagnosticCode::UnexpectedClosingParenthesis => "remove this `)`",
        DiagnosticCode::UnterminatedParameters => "add a `)` after the last parameter",
        DiagnosticCode::UnterminatedIndex => "add a `]` after the index",
        DiagnosticCode::RedundantParentheses => "remove the extra pair of parentheses",
        DiagnosticCode::MalformedObjectParameter => "write only the name of an object",
        DiagnosticCode::MalformedBehaviorParameter => "write only the name of a behavior",
        DiagnosticCode::MalformedVariableParameter => "write only the name of a variable",
        DiagnosticCode::MissingObjectContext => "write the object before this parameter",
        DiagnosticCode::UnknownParameterType => "the extension declaring this expression is misconfigured",
        _ => return None,
    };
    Some(help)
}

// ── Rendering ──────────────────────────────────────────────────────────

/// Clamp a span into the source, widening empty spans to one character
/// where possible so the label has something to point at.
fn clamp(range: Range<usize>, source_len: usize) -> Range<usize> {
    let start = range.start.min(source_len);
    let end = range.end.min(source_len).max(start);
    if start == end {
        start..(end + 1).min(source_len)
    } else {
        start..end
    }
}

/// Render one diagnostic as a human-readable report or a JSON line.
pub fn render_diagnostic(
    diagnostic: &Diagnostic,
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> String {
    if options.json {
        return render_json(diagnostic, source, filename);
    }

    let config = Config::default().with_color(options.color);
    let range = clamp(diagnostic.span.to_range(), source.len());
    let (kind, color) = match diagnostic.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
    };

    let mut builder = Report::build(kind, range.clone())
        .with_code(diagnostic.code.as_str())
        .with_message(&diagnostic.message)
        .with_config(config)
        .with_label(
            Label::new(range)
                .with_message(short_label(diagnostic))
                .with_color(color),
        );

    if let Some((message, span)) = &diagnostic.related {
        builder = builder.with_label(
            Label::new(clamp(span.to_range(), source.len()))
                .with_message(message)
                .with_color(Color::Blue),
        );
    }

    if let Some(help) = help(diagnostic.code) {
        builder = builder.with_help(help);
    }

    let report = builder.finish();
    let mut buf = Vec::new();
    if report.write(Source::from(source), &mut buf).is_err() {
        return format!("{diagnostic}\n");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// First line of the message, used as the label under the source.
fn short_label(diagnostic: &Diagnostic) -> &str {
    diagnostic
        .message
        .lines()
        .next()
        .unwrap_or(&diagnostic.message)
}

fn render_json(diagnostic: &Diagnostic, source: &str, filename: &str) -> String {
    let lines = LineIndex::new(source);
    let (line, column) = lines.line_col(diagnostic.span.start);
    let mut spans = vec![serde_json::json!({
        "start": diagnostic.span.start,
        "end": diagnostic.span.end,
        "label": short_label(diagnostic),
    })];
    if let Some((message, span)) = &diagnostic.related {
        spans.push(serde_json::json!({
            "start": span.start,
            "end": span.end,
            "label": message,
        }));
    }
    serde_json::json!({
        "code": diagnostic.code.as_str(),
        "severity": diagnostic.severity,
        "message": diagnostic.message,
        "file": filename,
        "line": line,
        "column": column,
        "spans": spans,
        "fix": help(diagnostic.code),
    })
    .to_string()
}

/// Render every diagnostic, in order.
pub fn render_all(
    diagnostics: &[Diagnostic],
    source: &str,
    filename: &str,
    options: &DiagnosticOptions,
) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| render_diagnostic(d, source, filename, options))
        .collect()
}
