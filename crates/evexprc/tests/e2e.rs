//! End-to-end tests for the `evexprc` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn evexprc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_evexprc"))
}

fn run(args: &[&str]) -> Output {
    Command::new(evexprc_bin())
        .args(args)
        .env("EVEXPR_LOG", "off")
        .output()
        .expect("failed to invoke evexprc")
}

fn json_lines(stderr: &[u8]) -> Vec<Value> {
    let stderr = String::from_utf8_lossy(stderr);
    serde_json::Deserializer::from_str(&stderr)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .expect("stderr should be JSON lines")
}

const CATALOG: &str = r#"{
  "name": "Inventory",
  "expressions": [
    {
      "name": "ItemCount",
      "returnType": "number",
      "parameters": [{ "type": "string" }]
    }
  ],
  "objects": [
    {
      "type": "Inventory::Chest",
      "expressions": [
        { "name": "Capacity", "returnType": "number", "parameters": [{ "type": "object" }] }
      ]
    }
  ]
}"#;

const MANIFEST: &str = r#"
metadata = ["inventory.json"]

[scene.objects.Chest]
type = "Inventory::Chest"
variables = ["Gold"]

[scene.objects.Player]
type = "Sprite"
behaviors = { Platformer = "PlatformBehavior::PlatformerObjectBehavior" }
"#;

fn write_project(dir: &Path) -> PathBuf {
    fs::write(dir.join("inventory.json"), CATALOG).unwrap();
    let manifest = dir.join("evexpr.toml");
    fs::write(&manifest, MANIFEST).unwrap();
    manifest
}

#[test]
fn valid_expression_prints_type() {
    let output = run(&["check", "--no-color", "1 + abs(-2) * 3"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "type: number");
    assert!(output.stderr.is_empty());
}

#[test]
fn string_expected_type() {
    let output = run(&["check", "--expected", "string", "--no-color", r#""a" + ToString(1)"#]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "type: string");
}

#[test]
fn unknown_expected_type_is_rejected() {
    let output = run(&["check", "--expected", "colour", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("colour"));
}

#[test]
fn errors_exit_nonzero_and_render_code() {
    let output = run(&["check", "--no-color", "abs(1, 2)"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too_many_parameters"), "stderr: {stderr}");
    assert!(!stderr.contains('\u{1b}'));
}

#[test]
fn json_mode_emits_one_object_per_diagnostic() {
    let output = run(&["check", "--json", "1 + (2 *"]);
    assert_eq!(output.status.code(), Some(1));

    let diagnostics = json_lines(&output.stderr);
    let codes: Vec<&str> = diagnostics
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["missing_operand", "unmatched_parenthesis"]);
    assert_eq!(diagnostics[1]["file"], "<expression>");
    assert_eq!(diagnostics[1]["column"], 5);

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["errors"], 2);
    assert_eq!(summary["warnings"], 0);
}

#[test]
fn warnings_do_not_fail() {
    let output = run(&["check", "--json", "((1))"]);
    assert!(output.status.success());
    let diagnostics = json_lines(&output.stderr);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["severity"], "warning");
    assert_eq!(diagnostics[0]["code"], "redundant_parentheses");
}

#[test]
fn project_manifest_supplies_catalogs_and_objects() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write_project(dir.path());
    let manifest = manifest.to_str().unwrap();

    let output = run(&[
        "check",
        "--project",
        manifest,
        "--no-color",
        r#"ItemCount("bag") + Chest.Capacity() + Player.Platformer::MaxSpeed()"#,
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let output = run(&["check", "--project", manifest, "--json", "Chest.Variable(Silver)"]);
    assert!(output.status.success());
    let diagnostics = json_lines(&output.stderr);
    assert_eq!(diagnostics[0]["code"], "undeclared_object_variable");
}

#[test]
fn metadata_flag_loads_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("inventory.json");
    fs::write(&catalog, CATALOG).unwrap();

    let without = run(&["check", "--json", r#"ItemCount("bag")"#]);
    assert_eq!(without.status.code(), Some(1));
    assert_eq!(json_lines(&without.stderr)[0]["code"], "invalid_function_name");

    let with = run(&[
        "check",
        "--metadata",
        catalog.to_str().unwrap(),
        "--json",
        r#"ItemCount("bag")"#,
    ]);
    assert!(with.status.success());
}

#[test]
fn no_builtins_drops_standard_functions() {
    let output = run(&["check", "--no-builtins", "--json", "abs(1)"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_lines(&output.stderr)[0]["code"], "invalid_function_name");
}

#[test]
fn missing_catalog_is_a_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.json");

    let output = run(&["check", "--metadata", absent.to_str().unwrap(), "1"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("absent.json"));

    let output = run(&["check", "--json", "--metadata", absent.to_str().unwrap(), "1"]);
    let diagnostics = json_lines(&output.stderr);
    assert_eq!(diagnostics[0]["code"], "setup_error");
}

#[test]
fn tokens_subcommand_lists_tokens() {
    let output = run(&["tokens", "a + 1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("0..1"));
    assert!(lines[3].contains("5..5"));
}

#[test]
fn ast_subcommand_prints_tree() {
    let output = run(&["ast", "1 + 2"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("BINARY@0..5"));

    let output = run(&["ast", "1 +"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing_operand"));
}

#[test]
fn deep_nesting_exits_with_a_diagnostic() {
    let n = 10_000;
    let source = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    let output = run(&["check", "--json", &source]);
    assert_eq!(output.status.code(), Some(1));
    let diagnostics = json_lines(&output.stderr);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["code"], "nesting_too_deep");
}
