//! Integration tests for the tokenweave CLI.
//!
//! These tests run the built binary against token files in a temporary
//! directory.

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;

mod common;
use common::{alias, document, literal, run_tokenweave_in_dir, write_json};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

fn valid_tokens() -> Value {
    document(vec![
        literal("brand", json!("#0055ff")),
        alias("button", "brand"),
        alias("link", "brand"),
    ])
}

fn broken_tokens() -> Value {
    document(vec![alias("a", "b"), alias("b", "a"), alias("c", "ghost")])
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn test_cli_help(temp_dir: TempDir) {
    let output = run_tokenweave_in_dir(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    for command in ["analyze", "validate", "graph", "chord", "visualize"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[rstest]
fn test_cli_no_args(temp_dir: TempDir) {
    let output = run_tokenweave_in_dir(temp_dir.path(), &[]);
    assert!(output.status.success());
}

// ============================================================================
// Analyze and Validate
// ============================================================================

#[rstest]
fn test_analyze_text(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &valid_tokens());
    let output = run_tokenweave_in_dir(temp_dir.path(), &["analyze", "tokens.json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dependency Analysis"));
    assert!(stdout.contains("brand"));
    assert!(stdout.contains("Token system is valid"));
}

#[rstest]
fn test_analyze_json(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &valid_tokens());
    let output = run_tokenweave_in_dir(temp_dir.path(), &["--json", "analyze", "tokens.json"]);

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["totalTokens"], 3);
    assert_eq!(value["mostReferenced"][0]["tokenId"], "brand");
    assert_eq!(value["mostReferenced"][0]["usageCount"], 2);
    assert_eq!(value["rootTokens"], json!(["brand"]));
}

#[rstest]
fn test_validate_valid_exits_zero(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &valid_tokens());
    let output = run_tokenweave_in_dir(temp_dir.path(), &["validate", "tokens.json"]);
    assert!(output.status.success());
}

#[rstest]
fn test_validate_invalid_exits_nonzero(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &broken_tokens());
    let output = run_tokenweave_in_dir(temp_dir.path(), &["--json", "validate", "tokens.json"]);

    assert!(!output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["isValid"], false);
    assert_eq!(value["errors"].as_array().unwrap().len(), 1);
    assert_eq!(value["errors"][0]["kind"], "missing_reference");
    assert_eq!(value["errors"][0]["referencedId"], "ghost");
}

#[rstest]
fn test_missing_file_fails(temp_dir: TempDir) {
    let output = run_tokenweave_in_dir(temp_dir.path(), &["analyze", "nope.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.json"));
}

#[rstest]
fn test_document_without_tokens_fails(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &json!({ "dimensions": [] }));
    let output = run_tokenweave_in_dir(temp_dir.path(), &["analyze", "tokens.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tokens"));
}

// ============================================================================
// Configuration
// ============================================================================

#[rstest]
fn test_config_overrides_thresholds(temp_dir: TempDir) {
    write_json(
        temp_dir.path(),
        "tokens.json",
        &document(vec![
            literal("base", json!(0)),
            alias("one", "base"),
            alias("two", "one"),
        ]),
    );
    std::fs::write(temp_dir.path().join("tw.yaml"), "deep-nesting-threshold: 1\n").unwrap();

    let output = run_tokenweave_in_dir(
        temp_dir.path(),
        &["--json", "--config", "tw.yaml", "validate", "tokens.json"],
    );

    assert!(output.status.success());
    let value = stdout_json(&output);
    let deep: Vec<_> = value["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|w| w["kind"] == "deep_nesting")
        .map(|w| w["tokenId"].clone())
        .collect();
    assert_eq!(deep, vec![json!("two")]);
}

#[rstest]
fn test_invalid_config_fails(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &valid_tokens());
    std::fs::write(temp_dir.path().join("tw.yaml"), "no-such-key: 3\n").unwrap();

    let output = run_tokenweave_in_dir(
        temp_dir.path(),
        &["--config", "tw.yaml", "analyze", "tokens.json"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tw.yaml"));
}

// ============================================================================
// Projections
// ============================================================================

#[rstest]
#[case(&["--json", "graph", "tokens.json"], "dependency-graph")]
#[case(&["--json", "chord", "tokens.json"], "chord-diagram")]
#[case(&["--json", "visualize", "dependency-graph", "tokens.json"], "dependency-graph")]
#[case(&["--json", "visualize", "chord-diagram", "tokens.json"], "chord-diagram")]
fn test_projections_json(temp_dir: TempDir, #[case] args: &[&str], #[case] expected: &str) {
    write_json(temp_dir.path(), "tokens.json", &valid_tokens());
    let output = run_tokenweave_in_dir(temp_dir.path(), args);

    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value["type"], expected);
    assert!(value["data"]["nodes"].is_array());
}

#[rstest]
fn test_graph_text(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &valid_tokens());
    let output = run_tokenweave_in_dir(temp_dir.path(), &["graph", "tokens.json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dependency Graph"));
    assert!(stdout.contains("Edges:     2"));
}

#[rstest]
fn test_visualize_unknown_key_fails(temp_dir: TempDir) {
    write_json(temp_dir.path(), "tokens.json", &valid_tokens());
    let output = run_tokenweave_in_dir(temp_dir.path(), &["visualize", "sankey", "tokens.json"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sankey"));
    assert!(stderr.contains("chord-diagram"));
}
