//! Mealmind Core Library
//!
//! Shared functionality for the Mealmind recipe tool:
//! - Recipe data model for TheMealDB records
//! - Recipe normalization (ingredients, steps, heuristic stats, thumbnails)
//! - TheMealDB client
//! - Pluggable AI backends (Gemini, mock) behind a gateway with quota fallback
//! - Model router for model tiers and per-operation sampling
//! - Prompt library for customizable AI prompts

pub mod ai;
pub mod error;
pub mod mealdb;
pub mod model_router;
pub mod normalize;
pub mod prompts;
pub mod recipe;

/// Test utilities including mock TheMealDB and Gemini servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, AIGateway, AiConfig, AiFailure, AiOperation, AiOutcome, BackendKind,
    FailureKind, GeminiBackend, GeneratedRecipe, MockBackend, MockReply, PromptSpec,
    RequestBuilder, RequestContext, VariationResult, MISSING_API_KEY_MESSAGE,
};
pub use error::{Error, Result};
pub use mealdb::MealDbClient;
pub use model_router::{ModelRouter, RouterConfig, SamplingConfig};
pub use normalize::{
    estimate_stats, extract_ingredients, flatten_ingredients, format_instructions, thumbnail_url,
};
pub use prompts::{Prompt, PromptInfo, PromptLibrary};
pub use recipe::{Ingredient, IngredientSlot, RawRecipe, RecipeDetail, RecipeStats};
