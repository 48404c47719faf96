//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tokenweave::domain::TokenSystem;

/// Path of the tokenweave binary built for this test run
pub fn tokenweave_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tokenweave"))
}

/// Run the tokenweave binary in the specified directory
pub fn run_tokenweave_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(tokenweave_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute tokenweave binary")
}

/// A literal token with one global value
pub fn literal(id: &str, value: Value) -> Value {
    json!({
        "id": id,
        "displayName": id,
        "resolvedValueTypeId": "color",
        "valuesByMode": [{ "modeIds": [], "value": value }]
    })
}

/// A token whose global value aliases `target`
pub fn alias(id: &str, target: &str) -> Value {
    literal(id, json!({ "tokenId": target }))
}

/// Build a token system document from token documents
pub fn document(tokens: Vec<Value>) -> Value {
    json!({ "tokens": tokens })
}

/// Parse a token system from token documents
pub fn system(tokens: Vec<Value>) -> TokenSystem {
    TokenSystem::from_json(&document(tokens).to_string()).expect("valid token system")
}

/// Write a JSON document into `dir` and return its path
pub fn write_json(dir: &Path, name: &str, document: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(document).unwrap())
        .expect("Failed to write fixture");
    path
}
