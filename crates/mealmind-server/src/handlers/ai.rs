//! AI handlers
//!
//! Bodies mirror what the web client sends. Failures keep the gateway's
//! message; the status reflects the failure kind (503 configuration,
//! 429 quota, 500 otherwise). Unreadable bodies get the same `{"error"}`
//! shape with axum's rejection status.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use mealmind_core::ai::{AiOutcome, GeneratedRecipe, RequestContext, VariationResult};
use mealmind_core::recipe::RecipeStats;

fn into_response<T>(outcome: AiOutcome<T>) -> Result<Json<T>, AppError> {
    match outcome {
        AiOutcome::Success(value) => Ok(Json(value)),
        AiOutcome::Failed(failure) => Err(AppError::from_failure(failure)),
        AiOutcome::Pending => Err(AppError::from(anyhow::anyhow!(
            "AI operation returned without a result"
        ))),
    }
}

/// Request body for a recipe variation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationRequest {
    /// Title of the recipe being varied
    pub original_recipe: String,
    /// Flattened ingredient list
    #[serde(default)]
    pub ingredients: String,
    /// What the user asked for
    pub request: String,
}

/// POST /api/generate - Rework a recipe according to a request
pub async fn generate_variation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VariationRequest>, JsonRejection>,
) -> Result<Json<VariationResult>, AppError> {
    let Json(body) = payload.map_err(AppError::from_rejection)?;
    if body.request.trim().is_empty() {
        return Err(AppError::bad_request("Missing request"));
    }

    let ctx = RequestContext::new(&body.original_recipe, &body.ingredients, &body.request);
    into_response(state.ai.generate_variation(&ctx).await)
}

/// Request body for a stats estimate
#[derive(Debug, Deserialize)]
pub struct StatsRequest {
    pub title: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
}

/// POST /api/stats - AI estimate of cooking time and calories
pub async fn estimate_stats(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> Result<Json<RecipeStats>, AppError> {
    let Json(body) = payload.map_err(AppError::from_rejection)?;
    into_response(
        state
            .ai
            .estimate_stats(&body.title, &body.ingredients, &body.instructions)
            .await,
    )
}

/// Request body for ingredient-based generation
#[derive(Debug, Deserialize)]
pub struct IngredientsRequest {
    pub ingredients: String,
}

/// POST /api/recipes/generate - Invent recipes from ingredients on hand
pub async fn generate_from_ingredients(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IngredientsRequest>, JsonRejection>,
) -> Result<Json<Vec<GeneratedRecipe>>, AppError> {
    let Json(body) = payload.map_err(AppError::from_rejection)?;
    if body.ingredients.trim().is_empty() {
        return Err(AppError::bad_request("Missing ingredients"));
    }

    into_response(state.ai.generate_from_ingredients(&body.ingredients).await)
}
