//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the recipe AI
//! operations (variation, stats estimate, ingredient-based generation).
//!
//! # Architecture
//!
//! - `AIBackend` trait: one structured-generation call against a model
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `MockBackend`
//! - `RequestBuilder`: prompts, schemas and sampling per operation
//! - `AIGateway`: credential check, quota fallback and tagged outcomes
//!
//! # Configuration
//!
//! Environment variables, read by [`AiConfig::from_env`]:
//! - `AI_BACKEND`: Backend to use (gemini, mock). Default: gemini
//! - `GEMINI_API_KEY`: Provider credential (required for every operation)
//! - `GEMINI_HOST`: Provider base URL (default: the public endpoint)

pub mod gateway;
mod gemini;
mod mock;
pub mod outcome;
pub mod parsing;
pub mod request;
pub mod schema;
pub mod types;

pub use gateway::{AIGateway, AiConfig, BackendKind, MISSING_API_KEY_MESSAGE};
pub use gemini::{GeminiBackend, DEFAULT_GEMINI_HOST};
pub use mock::{MockBackend, MockReply};
pub use outcome::{AiFailure, AiOutcome, FailureKind};
pub use request::{PromptSpec, RequestBuilder};
pub use types::*;

use async_trait::async_trait;

use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Run one generation call and return the raw response text
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Gemini REST API
    Gemini(GeminiBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create a Gemini backend directly
    pub fn gemini(host: &str, api_key: &str) -> Self {
        AIClient::Gemini(GeminiBackend::new(host, api_key))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Backend name for status output
    pub fn name(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::Mock(_) => "mock",
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate(request).await,
            AIClient::Mock(b) => b.generate(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.name(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[test]
    fn test_ai_client_gemini_host() {
        let client = AIClient::gemini("https://example.test/", "key");
        assert_eq!(client.name(), "gemini");
        assert_eq!(client.host(), "https://example.test");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }
}
