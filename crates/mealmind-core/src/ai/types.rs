//! AI request and response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

use crate::model_router::SamplingConfig;

/// The AI operations the gateway offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiOperation {
    /// Rework an existing recipe according to a user request
    Variation,
    /// Estimate cooking time and calories for a recipe
    StatsEstimate,
    /// Invent recipes from a list of ingredients on hand
    IngredientGeneration,
}

impl AiOperation {
    /// Get the string identifier (prompt file name and config key)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Variation => "variation",
            Self::StatsEstimate => "stats_estimate",
            Self::IngredientGeneration => "ingredient_generation",
        }
    }

    /// Parse a string identifier
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|op| op.as_str() == s)
    }

    /// Get all operations
    pub fn all() -> &'static [AiOperation] {
        &[
            Self::Variation,
            Self::StatsEstimate,
            Self::IngredientGeneration,
        ]
    }

    /// Only variations are retried on the secondary model after a quota error
    pub fn allows_quota_fallback(&self) -> bool {
        matches!(self, Self::Variation)
    }
}

impl std::fmt::Display for AiOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured-generation call as sent to a backend
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub operation: AiOperation,
    /// Model name to run against
    pub model: String,
    /// Optional system instruction
    pub system: Option<String>,
    /// User prompt text
    pub prompt: String,
    /// Structured-output schema; `None` still requests JSON output
    pub schema: Option<serde_json::Value>,
    pub sampling: SamplingConfig,
}

/// Per-call context for a recipe variation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    /// Title of the recipe being varied
    pub original_title: String,
    /// Flattened `"<measure> <name>"` ingredient list
    pub ingredients_text: String,
    /// What the user asked for, e.g. "make it vegan"
    pub request_text: String,
}

impl RequestContext {
    pub fn new(original_title: &str, ingredients_text: &str, request_text: &str) -> Self {
        Self {
            original_title: original_title.to_string(),
            ingredients_text: ingredients_text.to_string(),
            request_text: request_text.to_string(),
        }
    }
}

/// Result of a recipe variation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationResult {
    pub title: String,
    pub ingredients: Vec<String>,
    /// One discrete step per entry
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// A recipe invented from the user's ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Free-form duration, e.g. "25 minutes"
    pub time: String,
    /// Free-form difficulty, e.g. "Easy"
    pub difficulty: String,
    #[serde(default)]
    pub tips: Vec<String>,
}
