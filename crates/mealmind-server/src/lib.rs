//! Mealmind Web Server
//!
//! Axum-based REST API over the recipe source and the AI gateway.
//!
//! - Recipe browsing backed by TheMealDB, normalized for display
//! - AI variation, stats estimate and ingredient-based generation
//! - Restrictive CORS policy by default
//! - Sanitized error responses (`{"error": "..."}`)

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use mealmind_core::ai::{AIBackend, AIGateway, AiFailure, FailureKind};
use mealmind_core::MealDbClient;

mod handlers;

/// Server configuration
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub recipes: MealDbClient,
    pub ai: AIGateway,
}

/// Create the application router
pub fn create_router(recipes: MealDbClient, ai: AIGateway, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { recipes, ai });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Recipe browsing
        .route("/recipes/search", get(handlers::search_recipes))
        .route("/recipes/random", get(handlers::random_recipe))
        .route("/recipes/generate", post(handlers::generate_from_ingredients))
        .route("/recipes/:id", get(handlers::get_recipe))
        .route("/categories", get(handlers::list_categories))
        .route("/categories/:name/recipes", get(handlers::list_category_recipes))
        // AI
        .route("/generate", post(handlers::generate_variation))
        .route("/stats", post(handlers::estimate_stats));

    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server with clients built from the environment
pub async fn serve(host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    let recipes = MealDbClient::from_env();
    let ai = AIGateway::from_env();

    info!("Recipe source: {}", recipes.base_url());
    check_ai_connection(&ai).await;

    let app = create_router(recipes, ai, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log AI backend connection status
async fn check_ai_connection(ai: &AIGateway) {
    let backend = ai.backend();
    if !ai.is_configured() {
        warn!(
            "AI backend {} has no usable API key, AI features will be refused",
            backend.name()
        );
        return;
    }

    let router = ai.builder().router();
    if backend.health_check().await {
        info!(
            "AI backend connected: {} (primary: {}, secondary: {})",
            backend.host(),
            router.primary_model(),
            router.secondary_model()
        );
    } else {
        warn!(
            "AI backend configured but not responding: {} (primary: {})",
            backend.host(),
            router.primary_model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Malformed or incomplete JSON body, keeping axum's status and reason
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
            internal: None,
        }
    }

    /// Map a tagged AI failure onto a status, keeping its message
    pub fn from_failure(failure: AiFailure) -> Self {
        let status = match failure.kind {
            FailureKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            FailureKind::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            FailureKind::Transport | FailureKind::Parse => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: failure.message,
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
