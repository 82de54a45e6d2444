//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use mealmind_core::ai::{AIClient, AiConfig, MockBackend, MockReply, RequestBuilder};
use mealmind_core::prompts::PromptLibrary;
use mealmind_core::test_utils::MockMealDbServer;
use mealmind_core::{AIGateway, MealDbClient};

use crate::commands::{self, truncate, Output};

fn gateway(mock: &MockBackend, api_key: Option<&str>) -> AIGateway {
    AIGateway::new(
        AIClient::Mock(mock.clone()),
        RequestBuilder::embedded(),
        &AiConfig::new(api_key),
    )
}

// ========== Recipe Command Tests ==========

#[tokio::test]
async fn test_cmd_search() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());

    assert!(commands::cmd_search(&client, "teriyaki", Output::Text).await.is_ok());
    assert!(commands::cmd_search(&client, "teriyaki", Output::Json).await.is_ok());
    assert!(commands::cmd_search(&client, "nothing", Output::Text).await.is_ok());
}

#[tokio::test]
async fn test_cmd_categories_and_category() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());

    assert!(commands::cmd_categories(&client, Output::Text).await.is_ok());
    assert!(commands::cmd_category(&client, "Seafood", Output::Text).await.is_ok());
    assert!(commands::cmd_category(&client, "Goat", Output::Json).await.is_ok());
}

#[tokio::test]
async fn test_cmd_show() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());

    assert!(commands::cmd_show(&client, "52772", Output::Text).await.is_ok());
    assert!(commands::cmd_random(&client, Output::Json).await.is_ok());
}

#[tokio::test]
async fn test_cmd_show_missing_recipe() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());

    let result = commands::cmd_show(&client, "1", Output::Text).await;
    assert!(result.unwrap_err().to_string().contains("Recipe not found"));
}

#[tokio::test]
async fn test_cmd_search_unreachable_source() {
    let client = MealDbClient::new("http://127.0.0.1:1");
    let result = commands::cmd_search(&client, "teriyaki", Output::Text).await;
    assert!(result.unwrap_err().to_string().contains("Recipe search failed"));
}

// ========== AI Command Tests ==========

#[tokio::test]
async fn test_cmd_vary_sends_recipe_context() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());
    let mock = MockBackend::new();
    let ai = gateway(&mock, Some("test-key"));

    let result = commands::cmd_vary(&client, &ai, "52772", "make it vegan", Output::Text).await;
    assert!(result.is_ok());

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("Teriyaki Chicken Casserole"));
    assert!(calls[0].prompt.contains("3/4 cup soy sauce"));
    assert!(calls[0].prompt.contains("make it vegan"));
}

#[tokio::test]
async fn test_cmd_vary_without_key_fails_without_calling() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());
    let mock = MockBackend::new();
    let ai = gateway(&mock, None);

    let result = commands::cmd_vary(&client, &ai, "52772", "less salt", Output::Text).await;
    assert_eq!(
        result.unwrap_err().to_string(),
        mealmind_core::MISSING_API_KEY_MESSAGE
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_cmd_vary_blank_request() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());
    let mock = MockBackend::new();
    let ai = gateway(&mock, Some("test-key"));

    assert!(commands::cmd_vary(&client, &ai, "52772", "   ", Output::Text)
        .await
        .is_err());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_stats_report_uses_ai() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());
    let mock = MockBackend::with_replies([MockReply::text(r#"{"time": 40, "calories": 610}"#)]);
    let ai = gateway(&mock, Some("test-key"));

    let report = commands::stats_report(&client, &ai, "52772").await.unwrap();
    assert_eq!(report.source, "ai");
    assert_eq!(report.stats.time, 40);
    assert_eq!(report.stats.calories, 610);
}

#[tokio::test]
async fn test_stats_report_falls_back_to_heuristic() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());
    let mock = MockBackend::with_replies([MockReply::quota()]);
    let ai = gateway(&mock, Some("test-key"));

    let report = commands::stats_report(&client, &ai, "52772").await.unwrap();
    assert_eq!(report.source, "heuristic");

    let recipe = client.lookup_by_id("52772").await.unwrap().unwrap();
    assert_eq!(report.stats, mealmind_core::estimate_stats(&recipe));
    // Quota on a stats estimate is not retried
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_cmd_stats_json() {
    let server = MockMealDbServer::start().await;
    let client = MealDbClient::new(&server.url());
    let mock = MockBackend::new();
    let ai = gateway(&mock, None);

    assert!(commands::cmd_stats(&client, &ai, "52772", Output::Json)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_cmd_generate() {
    let mock = MockBackend::new();
    let ai = gateway(&mock, Some("test-key"));

    assert!(commands::cmd_generate(&ai, "rice, eggs, spinach", Output::Text)
        .await
        .is_ok());
    assert_eq!(mock.call_count(), 1);

    assert!(commands::cmd_generate(&ai, "", Output::Text).await.is_err());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_cmd_generate_parse_failure() {
    let mock = MockBackend::with_replies([MockReply::text("[]")]);
    let ai = gateway(&mock, Some("test-key"));

    assert!(commands::cmd_generate(&ai, "rice", Output::Json).await.is_err());
}

// ========== Prompts Command Tests ==========

#[test]
fn test_list_prompts_embedded() {
    let mut library = PromptLibrary::embedded_only();
    assert!(commands::list_prompts(&mut library, Output::Text).is_ok());
    assert!(commands::list_prompts(&mut library, Output::Json).is_ok());
}

#[test]
fn test_show_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = PromptLibrary::with_override_dir(dir.path().to_path_buf());

    assert!(commands::show_prompt(&mut library, "variation").is_ok());
    let err = commands::show_prompt(&mut library, "nope").unwrap_err();
    assert!(err.to_string().contains("stats_estimate"));
}

// ========== Helpers ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("Teriyaki Chicken Casserole", 10), "Teriyak...");
    assert_eq!(truncate("Crème brûlée tart", 8), "Crème...");
}

#[test]
fn test_output_from_flag() {
    assert_eq!(Output::from_flag(true), Output::Json);
    assert!(!Output::from_flag(false).is_json());
}
