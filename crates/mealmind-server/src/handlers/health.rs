//! Health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// AI backend in use (gemini, mock)
    pub ai_backend: &'static str,
    /// Whether a usable API key was supplied
    pub ai_configured: bool,
}

/// GET /api/health - Liveness and AI configuration status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ai_backend: state.ai.backend().name(),
        ai_configured: state.ai.is_configured(),
    })
}
