//! Test utilities for mealmind-core
//!
//! Mock TheMealDB and Gemini servers on ephemeral ports, for integration
//! tests of the HTTP clients and for offline development.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Bind an ephemeral port and serve `app` until the returned sender fires
async fn spawn(app: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

// ========== TheMealDB ==========

/// Full record for the Teriyaki Chicken Casserole
pub fn teriyaki_fixture() -> Value {
    json!({
        "idMeal": "52772",
        "strMeal": "Teriyaki Chicken Casserole",
        "strCategory": "Chicken",
        "strArea": "Japanese",
        "strInstructions": "Preheat oven to 350° F.\r\nCombine soy sauce, water, brown sugar and ginger in a saucepan.\r\nBake for 30 minutes!",
        "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
        "strTags": "Meat,Casserole",
        "strYoutube": "https://www.youtube.com/watch?v=4aZr5hZXP_s",
        "strIngredient1": "soy sauce",
        "strIngredient2": "water",
        "strIngredient3": "brown sugar",
        "strIngredient4": "",
        "strIngredient5": "chicken breasts",
        "strMeasure1": "3/4 cup",
        "strMeasure2": "1/2 cup",
        "strMeasure3": "1/4 cup",
        "strMeasure4": "",
        "strMeasure5": "2",
        "strSource": null
    })
}

/// Full record for a seafood recipe
pub fn salmon_fixture() -> Value {
    json!({
        "idMeal": "52959",
        "strMeal": "Baked salmon with fennel & tomatoes",
        "strCategory": "Seafood",
        "strArea": "British",
        "strInstructions": "Heat oven to 180C/fan 160C/gas 4. Trim the fronds from the fennel. Bake for 10 mins.",
        "strMealThumb": "https://www.themealdb.com/images/media/meals/1548772327.jpg",
        "strTags": "Paleo,Keto",
        "strIngredient1": "Fennel",
        "strMeasure1": "2 medium",
        "strIngredient2": "Salmon",
        "strMeasure2": "2 fillets"
    })
}

fn partial(full: &Value) -> Value {
    json!({
        "strMeal": full["strMeal"],
        "strMealThumb": full["strMealThumb"],
        "idMeal": full["idMeal"],
    })
}

fn meals(list: Vec<Value>) -> Json<Value> {
    if list.is_empty() {
        Json(json!({ "meals": null }))
    } else {
        Json(json!({ "meals": list }))
    }
}

#[derive(Clone, Default)]
struct MealDbState {
    last_query: Arc<Mutex<Option<String>>>,
}

impl MealDbState {
    fn record(&self, raw: Option<String>) {
        if let Ok(mut q) = self.last_query.lock() {
            *q = raw;
        }
    }
}

/// Mock TheMealDB server
///
/// Serves two fixtures (a chicken and a seafood recipe) and answers unknown
/// lookups with `{"meals": null}`. Lookup id `0` returns `{}`.
pub struct MockMealDbServer {
    addr: SocketAddr,
    state: MealDbState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockMealDbServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = MealDbState::default();
        let app = Router::new()
            .route("/search.php", get(handle_search))
            .route("/random.php", get(handle_random))
            .route("/list.php", get(handle_list))
            .route("/filter.php", get(handle_filter))
            .route("/lookup.php", get(handle_lookup))
            .with_state(state.clone());

        let (addr, shutdown_tx) = spawn(app).await;
        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Raw query string of the most recent request
    pub fn last_query(&self) -> Option<String> {
        self.state.last_query.lock().ok().and_then(|q| q.clone())
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockMealDbServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_search(
    State(state): State<MealDbState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.record(raw);
    let needle = params.get("s").map(|s| s.to_lowercase()).unwrap_or_default();
    let found = [teriyaki_fixture(), salmon_fixture()]
        .into_iter()
        .filter(|m| {
            m["strMeal"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect();
    meals(found)
}

async fn handle_random(State(state): State<MealDbState>) -> Json<Value> {
    state.record(None);
    meals(vec![teriyaki_fixture()])
}

async fn handle_list(
    State(state): State<MealDbState>,
    RawQuery(raw): RawQuery,
) -> Json<Value> {
    state.record(raw);
    let categories = ["Beef", "Chicken", "Dessert", "Seafood", "Vegetarian"]
        .iter()
        .map(|c| json!({ "strCategory": c }))
        .collect();
    meals(categories)
}

async fn handle_filter(
    State(state): State<MealDbState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.record(raw);
    let category = params.get("c").map(String::as_str).unwrap_or_default();
    let found = [teriyaki_fixture(), salmon_fixture()]
        .iter()
        .filter(|m| m["strCategory"] == category)
        .map(partial)
        .collect();
    meals(found)
}

async fn handle_lookup(
    State(state): State<MealDbState>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.record(raw);
    let id = params.get("i").map(String::as_str).unwrap_or_default();
    if id == "0" {
        return Json(json!({}));
    }
    let found = [teriyaki_fixture(), salmon_fixture()]
        .into_iter()
        .filter(|m| m["idMeal"] == id)
        .collect();
    meals(found)
}

// ========== Gemini ==========

/// How the mock Gemini server answers calls for one model
#[derive(Debug, Clone)]
pub enum MockGeminiReply {
    /// 200 with this text as the single candidate part
    Text(String),
    /// Error envelope with the given HTTP status
    Error {
        status: u16,
        message: String,
        status_text: String,
    },
    /// 200 with no candidates (blocked prompt)
    Empty,
}

impl MockGeminiReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The provider's 429 rate-limit response
    pub fn quota_exceeded() -> Self {
        Self::Error {
            status: 429,
            message: "Resource has been exhausted (e.g. check quota).".to_string(),
            status_text: "RESOURCE_EXHAUSTED".to_string(),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::Error {
            status,
            message: message.to_string(),
            status_text: "INTERNAL".to_string(),
        }
    }
}

/// A generateContent call as received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct GeminiState {
    replies: Arc<Mutex<HashMap<String, MockGeminiReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Reply for models without a configured behavior
const DEFAULT_GEMINI_TEXT: &str = r#"{"title": "Mock Recipe", "ingredients": ["1 cup rice"], "instructions": ["Cook the rice."], "tips": []}"#;

/// Mock Gemini server
///
/// Answers `POST /v1beta/models/{model}:generateContent` per model and
/// `GET /v1beta/models` for health checks. Records every generate call.
pub struct MockGeminiServer {
    addr: SocketAddr,
    state: GeminiState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGeminiServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = GeminiState::default();
        let app = Router::new()
            .route("/v1beta/models", get(handle_list_models))
            .route("/v1beta/models/:call", post(handle_generate_content))
            .with_state(state.clone());

        let (addr, shutdown_tx) = spawn(app).await;
        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Set the reply for every call to `model`
    pub fn respond_with(&self, model: &str, reply: MockGeminiReply) {
        if let Ok(mut replies) = self.state.replies.lock() {
            replies.insert(model.to_string(), reply);
        }
    }

    /// Every generate call received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGeminiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_list_models() -> Json<Value> {
    Json(json!({
        "models": [
            { "name": "models/gemini-2.0-flash" },
            { "name": "models/gemini-2.0-flash-lite" }
        ]
    }))
}

async fn handle_generate_content(
    State(state): State<GeminiState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let model = call.split(':').next().unwrap_or_default().to_string();
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedRequest {
            model: model.clone(),
            api_key,
            body,
        });
    }

    let reply = state
        .replies
        .lock()
        .ok()
        .and_then(|r| r.get(&model).cloned())
        .unwrap_or_else(|| MockGeminiReply::text(DEFAULT_GEMINI_TEXT));

    match reply {
        MockGeminiReply::Text(text) => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": text }] },
                    "finishReason": "STOP"
                }]
            })),
        ),
        MockGeminiReply::Error {
            status,
            message,
            status_text,
        } => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({
                "error": { "code": status, "message": message, "status": status_text }
            })),
        ),
        MockGeminiReply::Empty => (
            StatusCode::OK,
            Json(json!({
                "candidates": [],
                "promptFeedback": { "blockReason": "SAFETY" }
            })),
        ),
    }
}
