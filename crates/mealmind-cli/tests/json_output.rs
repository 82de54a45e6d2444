//! End-to-end tests for `--json` output of the `mealmind` binary
//!
//! The binary runs against the mock AI backend and a mock TheMealDB server;
//! stdout must be a single JSON document even with info logging enabled.

use std::process::Output;

use mealmind_core::test_utils::MockMealDbServer;
use tempfile::TempDir;
use tokio::process::Command;

/// Command with the mock backend, a test key and an empty data directory
fn mealmind(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mealmind"));
    cmd.env("AI_BACKEND", "mock")
        .env("GEMINI_API_KEY", "test-key")
        .env("XDG_DATA_HOME", data_dir.path())
        .env("HOME", data_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "mealmind failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[tokio::test]
async fn test_generate_json_is_parseable() {
    let data_dir = tempfile::tempdir().unwrap();
    let output = mealmind(&data_dir)
        .args(["--json", "generate", "rice, egg"])
        .output()
        .await
        .unwrap();

    let json = stdout_json(&output);
    assert_eq!(json.as_array().unwrap().len(), 3);

    // Logging still happens, on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Sending AI request"));
}

#[tokio::test]
async fn test_stats_json_is_parseable() {
    let server = MockMealDbServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();
    let output = mealmind(&data_dir)
        .env("MEALDB_BASE_URL", server.url())
        .args(["--json", "stats", "52772"])
        .output()
        .await
        .unwrap();

    let json = stdout_json(&output);
    assert_eq!(json["source"], "ai");
    assert!(json["time"].is_u64());
    assert!(json["calories"].is_u64());
}

#[tokio::test]
async fn test_vary_json_is_parseable() {
    let server = MockMealDbServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();
    let output = mealmind(&data_dir)
        .env("MEALDB_BASE_URL", server.url())
        .args(["--json", "vary", "52772", "--request", "make it vegan"])
        .output()
        .await
        .unwrap();

    let json = stdout_json(&output);
    assert!(json["title"].is_string());
    assert!(json["instructions"].is_array());
}

#[tokio::test]
async fn test_prompts_list_json_is_parseable() {
    let data_dir = tempfile::tempdir().unwrap();
    let output = mealmind(&data_dir)
        .args(["--json", "prompts", "list"])
        .output()
        .await
        .unwrap();

    let json = stdout_json(&output);
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["variation", "stats_estimate", "ingredient_generation"]);
}
