//! Mock backend for testing
//!
//! Replays scripted replies in order and records every request it receives.
//! With an empty script it answers each operation with a canned, valid
//! response, which makes `AI_BACKEND=mock` usable for offline development.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{AiOperation, GenerationRequest};
use super::AIBackend;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw response text handed to the parser
    Text(String),
    /// Provider rate-limit rejection
    QuotaExceeded(String),
    /// Non-quota provider error with an HTTP status
    Api { status: u16, message: String },
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn quota() -> Self {
        Self::QuotaExceeded("Resource has been exhausted (e.g. check quota).".to_string())
    }

    fn into_result(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::QuotaExceeded(message) => Err(Error::QuotaExceeded(message)),
            Self::Api { status, message } => Err(Error::Api { status, message }),
        }
    }
}

/// Mock AI backend for testing
///
/// Clones share the script and the call log.
#[derive(Debug, Clone)]
pub struct MockBackend {
    script: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            script: Arc::default(),
            calls: Arc::default(),
            healthy: true,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a mock that replays `replies` in order
    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let mock = Self::new();
        for reply in replies {
            mock.push_reply(reply);
        }
        mock
    }

    /// Queue another reply
    pub fn push_reply(&self, reply: MockReply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// Every request received so far
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Canned reply for an operation when nothing is scripted
fn canned_reply(operation: AiOperation) -> &'static str {
    match operation {
        AiOperation::Variation => {
            r#"{"title": "Mock Variation", "ingredients": ["1 cup mock stock"], "instructions": ["Simmer the stock.", "Serve warm."], "tips": ["Season to taste."]}"#
        }
        AiOperation::StatsEstimate => r#"{"time": 30, "calories": 420}"#,
        AiOperation::IngredientGeneration => {
            r#"[
                {"title": "Mock Stir Fry", "ingredients": ["rice"], "instructions": ["Fry the rice."], "time": "15 minutes", "difficulty": "Easy"},
                {"title": "Mock Soup", "ingredients": ["stock"], "instructions": ["Boil the stock."], "time": "20 minutes", "difficulty": "Easy"},
                {"title": "Mock Salad", "ingredients": ["greens"], "instructions": ["Toss the greens."], "time": "5 minutes", "difficulty": "Easy"}
            ]"#
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match scripted {
            Some(reply) => reply.into_result(),
            None => Ok(canned_reply(request.operation).to_string()),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parsing::{parse_generated_recipes, parse_stats, parse_variation};
    use crate::model_router::SamplingConfig;

    fn request(operation: AiOperation) -> GenerationRequest {
        GenerationRequest {
            operation,
            model: "mock-model".to_string(),
            system: None,
            prompt: "hello".to_string(),
            schema: None,
            sampling: SamplingConfig::defaults_for(operation),
        }
    }

    #[tokio::test]
    async fn test_canned_replies_parse() {
        let mock = MockBackend::new();

        let text = mock.generate(&request(AiOperation::Variation)).await.unwrap();
        assert!(parse_variation(&text).is_ok());

        let text = mock.generate(&request(AiOperation::StatsEstimate)).await.unwrap();
        assert!(parse_stats(&text).is_ok());

        let text = mock
            .generate(&request(AiOperation::IngredientGeneration))
            .await
            .unwrap();
        assert_eq!(parse_generated_recipes(&text).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_script_replayed_in_order() {
        let mock = MockBackend::with_replies([MockReply::quota(), MockReply::text("{}")]);
        let shared = mock.clone();

        let first = mock.generate(&request(AiOperation::Variation)).await;
        assert!(matches!(first, Err(Error::QuotaExceeded(_))));

        let second = shared.generate(&request(AiOperation::Variation)).await;
        assert_eq!(second.unwrap(), "{}");

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls()[0].model, "mock-model");
    }

    #[tokio::test]
    async fn test_health() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
