//! Expression parser integration tests using insta snapshots.
//!
//! Each test parses an expression and snapshots the debug tree, followed by
//! the reported problems (code and span), to pin down precedence, spans and
//! error recovery.

use evexpr_common::diagnostic::{DiagnosticCode, Severity};
use evexpr_common::span::Span;
use evexpr_parser::ast::ExprKind;
use evexpr_parser::{debug_tree, parse};
use insta::assert_snapshot;

fn parse_and_debug(source: &str) -> String {
    let parse = parse(source);
    let tree = debug_tree(parse.root());
    if parse.errors().is_empty() {
        return tree;
    }
    format!(
        "{}errors:\n{}",
        tree,
        parse
            .errors()
            .iter()
            .map(|e| format!("  - {} @{}..{}", e.code, e.span.start, e.span.end))
            .collect::<Vec<_>>()
            .join("\n")
    )
}

// ── Literals ───────────────────────────────────────────────────────────

#[test]
fn literal_fraction_without_integer_part() {
    assert_snapshot!(parse_and_debug(".5"), @"NUMBER@0..2 .5");
}

#[test]
fn literal_string_with_escaped_quote() {
    assert_snapshot!(parse_and_debug(r#""a\"b""#), @r#"STRING@0..6 "a\"b""#);
}

#[test]
fn empty_input() {
    assert_snapshot!(parse_and_debug(""), @"EMPTY@0..0");
}

#[test]
fn number_value_is_decoded() {
    let parse = parse("12.25");
    match &parse.root().kind {
        ExprKind::Number { value, text } => {
            assert_eq!(*value, 12.25);
            assert_eq!(text, "12.25");
        }
        other => panic!("expected number, got {other:?}"),
    }
}

// ── Precedence ─────────────────────────────────────────────────────────

#[test]
fn mul_binds_tighter_than_add() {
    assert_snapshot!(parse_and_debug("1 + 2 * 3"), @r"
    BINARY@0..9 +
      NUMBER@0..1 1
      BINARY@4..9 *
        NUMBER@4..5 2
        NUMBER@8..9 3
    ");
}

#[test]
fn sub_is_left_associative() {
    assert_snapshot!(parse_and_debug("1 - 2 - 3"), @r"
    BINARY@0..9 -
      BINARY@0..5 -
        NUMBER@0..1 1
        NUMBER@4..5 2
      NUMBER@8..9 3
    ");
}

#[test]
fn pow_is_right_associative() {
    assert_snapshot!(parse_and_debug("2 ^ 3 ^ 2"), @r"
    BINARY@0..9 ^
      NUMBER@0..1 2
      BINARY@4..9 ^
        NUMBER@4..5 3
        NUMBER@8..9 2
    ");
}

#[test]
fn prefix_minus_applies_after_pow() {
    assert_snapshot!(parse_and_debug("-2 ^ 2"), @r"
    UNARY@0..6 -
      BINARY@1..6 ^
        NUMBER@1..2 2
        NUMBER@5..6 2
    ");
}

#[test]
fn parentheses_override_precedence_and_widen_span() {
    assert_snapshot!(parse_and_debug("(1 + 2) * 3"), @r"
    BINARY@0..11 *
      BINARY@0..7 +
        NUMBER@1..2 1
        NUMBER@5..6 2
      NUMBER@10..11 3
    ");
}

#[test]
fn unary_on_identifier() {
    assert_snapshot!(parse_and_debug("-x"), @r"
    UNARY@0..2 -
      IDENTIFIER@1..2 x
    ");
}

// ── Calls and variables ────────────────────────────────────────────────

#[test]
fn free_function_call() {
    assert_snapshot!(parse_and_debug("ToString(1)"), @r"
    CALL@0..11 ToString
      NUMBER@9..10 1
    ");
}

#[test]
fn object_function_without_parameters() {
    assert_snapshot!(parse_and_debug("Player.X()"), @"CALL@0..10 Player.X");
}

#[test]
fn behavior_function_call() {
    assert_snapshot!(parse_and_debug("Player.Physics::Speed(2)"), @r"
    CALL@0..24 Player.Physics::Speed
      NUMBER@22..23 2
    ");
}

#[test]
fn call_shapes_set_first_written_index() {
    let cases = [("F()", 0), ("O.F()", 1), ("O.B::F()", 2)];
    for (source, expected) in cases {
        let parse = parse(source);
        match &parse.root().kind {
            ExprKind::Call(call) => {
                assert_eq!(call.written_parameters_first_index(), expected, "{source}")
            }
            other => panic!("expected call for {source}, got {other:?}"),
        }
    }
}

#[test]
fn call_names_keep_their_own_spans() {
    let parse = parse("Player.Physics::Speed()");
    let ExprKind::Call(call) = &parse.root().kind else {
        panic!("expected call");
    };
    assert_eq!(call.object.as_ref().map(|o| o.span), Some(Span::new(0, 6)));
    assert_eq!(call.behavior.as_ref().map(|b| b.span), Some(Span::new(7, 14)));
    assert_eq!(call.function.span, Span::new(16, 21));
}

#[test]
fn variable_with_index_and_child() {
    assert_snapshot!(parse_and_debug("Scores[i + 1].best"), @r"
    VARIABLE@0..18 Scores
      INDEX@6..13
        BINARY@7..12 +
          IDENTIFIER@7..8 i
          NUMBER@11..12 1
      CHILD@13..18 best
    ");
}

#[test]
fn dotted_name_without_call_is_variable() {
    assert_snapshot!(parse_and_debug("Player.score"), @r"
    VARIABLE@0..12 Player
      CHILD@6..12 score
    ");
}

// ── Error recovery ─────────────────────────────────────────────────────

#[test]
fn unclosed_group_becomes_error_node() {
    assert_snapshot!(parse_and_debug("1 + (2 *"), @r#"
    BINARY@0..8 +
      NUMBER@0..1 1
      ERROR@4..8 "(2 *"
    errors:
      - missing_operand @8..8
      - unmatched_parenthesis @4..8
    "#);
}

#[test]
fn unmatched_parenthesis_points_at_opening() {
    let parse = parse("1 + (2 *");
    let error = parse
        .errors()
        .iter()
        .find(|e| e.code == DiagnosticCode::UnmatchedParenthesis)
        .expect("unmatched parenthesis reported");
    assert_eq!(error.related.as_ref().map(|r| r.1), Some(Span::new(4, 5)));
}

#[test]
fn missing_right_operand() {
    assert_snapshot!(parse_and_debug("1 +"), @r#"
    BINARY@0..3 +
      NUMBER@0..1 1
      ERROR@3..3 ""
    errors:
      - missing_operand @3..3
    "#);
}

#[test]
fn bad_operand_consumes_to_next_boundary() {
    assert_snapshot!(parse_and_debug("1 + * 2"), @r#"
    BINARY@0..7 +
      NUMBER@0..1 1
      ERROR@4..7 "* 2"
    errors:
      - syntax_error @4..7
    "#);
}

#[test]
fn unterminated_string() {
    assert_snapshot!(parse_and_debug(r#""abc"#), @r#"
    ERROR@0..4 "\"abc"
    errors:
      - unterminated_string @0..4
    "#);
}

#[test]
fn unterminated_parameters_keep_the_call() {
    assert_snapshot!(parse_and_debug("Func(1, 2"), @r"
    CALL@0..9 Func
      NUMBER@5..6 1
      NUMBER@8..9 2
    errors:
      - unterminated_parameters @4..9
    ");
}

#[test]
fn empty_parameters_around_comma() {
    assert_snapshot!(parse_and_debug("Func(,)"), @r#"
    CALL@0..7 Func
      ERROR@5..5 ""
      ERROR@6..6 ""
    errors:
      - syntax_error @5..5
      - missing_operand @6..6
    "#);
}

#[test]
fn unterminated_index() {
    assert_snapshot!(parse_and_debug("Var[0"), @r"
    VARIABLE@0..5 Var
      INDEX@3..5
        NUMBER@4..5 0
    errors:
      - unterminated_index @3..5
    ");
}

#[test]
fn behavior_function_name_missing() {
    assert_snapshot!(parse_and_debug("Player.Physics::"), @r#"
    ERROR@0..16 "Player.Physics::"
    errors:
      - syntax_error @16..16
    "#);
}

#[test]
fn stray_closing_parenthesis() {
    assert_snapshot!(parse_and_debug("1 + 2)"), @r"
    BINARY@0..5 +
      NUMBER@0..1 1
      NUMBER@4..5 2
    errors:
      - unexpected_closing_parenthesis @5..6
    ");
}

#[test]
fn extra_characters_after_expression() {
    assert_snapshot!(parse_and_debug("1 2"), @r"
    NUMBER@0..1 1
    errors:
      - extra_characters @2..3
    ");
}

#[test]
fn empty_group() {
    assert_snapshot!(parse_and_debug("()"), @r#"
    ERROR@0..2 ""
    errors:
      - missing_operand @1..1
    "#);
}

#[test]
fn redundant_parentheses_warn_only() {
    assert_snapshot!(parse_and_debug("((x))"), @r"
    IDENTIFIER@0..5 x
    errors:
      - redundant_parentheses @0..5
    ");
    let parse = parse("((x))");
    assert!(parse.ok());
    assert_eq!(parse.errors()[0].severity, Severity::Warning);
}

#[test]
fn parse_always_has_a_root() {
    for source in ["", ")", "(((", "+", "\"", "A.", "A[", "F(", "$", "1 ::"] {
        let parse = parse(source);
        let span = parse.root().span;
        assert!(span.end as usize <= source.len(), "{source:?}: {span:?}");
        if !source.is_empty() {
            assert!(!parse.ok(), "{source:?} should report an error");
        }
    }
}

// ── Nesting limit ──────────────────────────────────────────────────────

fn error_codes(source: &str) -> Vec<DiagnosticCode> {
    parse(source).errors().iter().map(|e| e.code).collect()
}

#[test]
fn deeply_nested_parentheses_are_one_error() {
    let n = 100_000;
    let source = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    let parse = parse(&source);

    assert_eq!(parse.errors().len(), 1);
    let error = &parse.errors()[0];
    assert_eq!(error.code, DiagnosticCode::NestingTooDeep);
    assert_eq!(error.span.start, 200);
    // The outer groups still close.
    assert_eq!(parse.root().span, Span::new(0, source.len() as u32));
}

#[test]
fn deeply_nested_unary_operators_are_one_error() {
    let source = format!("{}1", "-".repeat(100_000));
    assert_eq!(error_codes(&source), vec![DiagnosticCode::NestingTooDeep]);
    assert_eq!(parse(&source).root().span, Span::new(0, source.len() as u32));
}

#[test]
fn long_operator_chains_are_bounded() {
    let sum = format!("{}1", "1 + ".repeat(100_000));
    assert_eq!(error_codes(&sum), vec![DiagnosticCode::NestingTooDeep]);

    let power = format!("{}2", "2 ^ ".repeat(100_000));
    assert_eq!(error_codes(&power), vec![DiagnosticCode::NestingTooDeep]);
}

#[test]
fn nesting_limit_resumes_after_the_deep_argument() {
    let deep = format!("{}1{}", "(".repeat(1_000), ")".repeat(1_000));
    let source = format!("max({deep}, 2) + $");
    let codes = error_codes(&source);
    assert_eq!(codes[0], DiagnosticCode::NestingTooDeep);
    // Parsing continues with the second argument and the rest of the input.
    assert_eq!(codes[1], DiagnosticCode::SyntaxError);
    assert_eq!(codes.len(), 2);
    let parsed = parse(&source);
    let ExprKind::Binary { lhs, .. } = &parsed.root().kind else {
        panic!("expected a binary root");
    };
    let ExprKind::Call(call) = &lhs.kind else {
        panic!("expected a call");
    };
    assert_eq!(call.parameters.len(), 2);
}

#[test]
fn moderate_nesting_is_accepted() {
    let unary = format!("{}1", "-".repeat(150));
    assert!(parse(&unary).errors().is_empty());

    let calls = format!("{}1{}", "abs(".repeat(100), ")".repeat(100));
    assert!(parse(&calls).errors().is_empty());
}
