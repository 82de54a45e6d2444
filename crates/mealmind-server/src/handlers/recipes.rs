//! Recipe browsing handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use mealmind_core::recipe::{RawRecipe, RecipeDetail};

/// Query parameters for recipe search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Recipe name (substring match upstream)
    pub s: Option<String>,
}

/// GET /api/recipes/search?s= - Search recipes by name
pub async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<RawRecipe>>, AppError> {
    let term = params.s.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(AppError::bad_request("Missing search term"));
    }

    let recipes = state.recipes.search_by_name(term).await?;
    Ok(Json(recipes))
}

/// GET /api/recipes/random - One random recipe, normalized
pub async fn random_recipe(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RecipeDetail>, AppError> {
    let recipe = state
        .recipes
        .random()
        .await?
        .ok_or_else(|| AppError::not_found("No recipe available"))?;
    Ok(Json(RecipeDetail::from_recipe(recipe)))
}

/// GET /api/recipes/:id - Recipe detail with ingredients, steps and stats
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RecipeDetail>, AppError> {
    let recipe = state
        .recipes
        .lookup_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe not found"))?;
    Ok(Json(RecipeDetail::from_recipe(recipe)))
}

/// GET /api/categories - All category names
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.recipes.categories().await?))
}

/// GET /api/categories/:name/recipes - Partial recipes in a category
pub async fn list_category_recipes(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Vec<RawRecipe>>, AppError> {
    Ok(Json(state.recipes.filter_by_category(&name).await?))
}
