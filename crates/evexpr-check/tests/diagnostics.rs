//! Rendering of expression diagnostics through ariadne and as JSON.

use evexpr_check::diagnostics::{render_all, render_diagnostic, DiagnosticOptions};
use evexpr_check::{check_expression, SemanticType};
use evexpr_common::diagnostic::Diagnostic;
use evexpr_metadata::{ObjectsScope, Platform};

// ── Helpers ────────────────────────────────────────────────────────────

fn diagnostics_for(src: &str, expected: SemanticType) -> Vec<Diagnostic> {
    let report = check_expression(src, expected, &Platform::with_builtins(), &ObjectsScope::default());
    assert!(
        !report.diagnostics.is_empty(),
        "expected at least one diagnostic for source: {src:?}"
    );
    report.diagnostics
}

fn render_first(src: &str, expected: SemanticType, options: &DiagnosticOptions) -> String {
    let diagnostics = diagnostics_for(src, expected);
    render_diagnostic(&diagnostics[0], src, "scene.json", options)
}

// ── Human-readable output ──────────────────────────────────────────────

#[test]
fn report_shows_code_and_message() {
    let output = render_first("UndefinedFunction()", SemanticType::Number, &DiagnosticOptions::colorless());
    assert!(output.contains("invalid_function_name"), "{output}");
    assert!(output.contains("Cannot find an expression with this name: UndefinedFunction"), "{output}");
    assert!(output.contains("UndefinedFunction()"), "source line missing: {output}");
}

#[test]
fn colorless_output_has_no_escape_codes() {
    let output = render_first("abs(1)", SemanticType::String, &DiagnosticOptions::colorless());
    assert!(!output.contains('\u{1b}'), "{output}");
    assert!(output.contains("ToString"), "{output}");
}

#[test]
fn warnings_render_as_warnings() {
    let output = render_first("((1))", SemanticType::Number, &DiagnosticOptions::colorless());
    assert!(output.contains("Warning"), "{output}");
    assert!(output.contains("remove the extra pair of parentheses"), "{output}");
}

#[test]
fn related_span_gets_its_own_label() {
    let diagnostics = diagnostics_for("max(1, (2", SemanticType::Number);
    let unmatched = diagnostics
        .iter()
        .find(|d| d.related.is_some())
        .expect("a diagnostic with a related span");
    let output = render_diagnostic(unmatched, "max(1, (2", "scene.json", &DiagnosticOptions::colorless());
    assert!(output.contains("opened here"), "{output}");
}

#[test]
fn render_all_keeps_order() {
    let src = "UndefinedFunction(1";
    let diagnostics = diagnostics_for(src, SemanticType::Number);
    let rendered = render_all(&diagnostics, src, "scene.json", &DiagnosticOptions::colorless());
    assert_eq!(rendered.len(), 2);
    assert!(rendered[0].contains("unterminated_parameters"));
    assert!(rendered[1].contains("invalid_function_name"));
}

// ── JSON output ────────────────────────────────────────────────────────

#[test]
fn json_output_mode() {
    let output = render_first("UndefinedFunction()", SemanticType::Number, &DiagnosticOptions::json_mode());
    let parsed: serde_json::Value = serde_json::from_str(&output)
        .unwrap_or_else(|e| panic!("invalid JSON output: {e}\n{output}"));
    assert_eq!(parsed["code"], "invalid_function_name");
    assert_eq!(parsed["severity"], "error");
    assert_eq!(parsed["file"], "scene.json");
    assert_eq!(parsed["line"], 1);
    assert_eq!(parsed["column"], 1);
    assert_eq!(parsed["spans"][0]["start"], 0);
    assert_eq!(parsed["spans"][0]["end"], 19);
    assert!(parsed["fix"].is_null());
}

#[test]
fn json_one_line() {
    let output = render_first("UndefinedFunction()", SemanticType::Number, &DiagnosticOptions::json_mode());
    assert!(!output.contains('\n'), "JSON output should be one line: {output}");
}

#[test]
fn json_includes_related_span_and_fix() {
    let src = "1 + (2";
    let diagnostics = diagnostics_for(src, SemanticType::Number);
    let unmatched = diagnostics
        .iter()
        .find(|d| d.related.is_some())
        .expect("a diagnostic with a related span");
    let output = render_diagnostic(unmatched, src, "scene.json", &DiagnosticOptions::json_mode());
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["code"], "unmatched_parenthesis");
    assert_eq!(parsed["spans"].as_array().map(Vec::len), Some(2));
    assert_eq!(parsed["spans"][1]["start"], 4);
    assert!(parsed["fix"].as_str().is_some());
}
