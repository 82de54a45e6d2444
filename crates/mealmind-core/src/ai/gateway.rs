//! AI gateway
//!
//! Single entry point for the three AI operations. The gateway
//! - checks the credential once at construction and refuses every call
//!   without touching the network when it is missing or a placeholder,
//! - runs each operation on the primary model with its schema and sampling,
//! - retries a rate-limited variation once on the secondary model without a
//!   schema,
//! - converts every error into a tagged [`AiOutcome`] failure.
//!
//! # Usage
//!
//! ```rust,ignore
//! let gateway = AIGateway::from_env();
//! let ctx = RequestContext::new("Pad Thai", "200g noodles, 2 egg", "make it vegan");
//! match gateway.generate_variation(&ctx).await {
//!     AiOutcome::Success(recipe) => println!("{}", recipe.title),
//!     AiOutcome::Failed(failure) => eprintln!("{}", failure),
//!     AiOutcome::Pending => unreachable!(),
//! }
//! ```

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model_router::ModelRouter;
use crate::prompts::PromptLibrary;
use crate::recipe::RecipeStats;

use super::gemini::{GeminiBackend, DEFAULT_GEMINI_HOST};
use super::outcome::AiOutcome;
use super::parsing::{parse_generated_recipes, parse_stats, parse_variation};
use super::request::{PromptSpec, RequestBuilder};
use super::types::{GeneratedRecipe, GenerationRequest, RequestContext, VariationResult};
use super::{AIBackend, AIClient};

/// Shown verbatim when AI features are used without a usable credential
pub const MISSING_API_KEY_MESSAGE: &str =
    "API key missing. Set GEMINI_API_KEY to enable AI features.";

/// Values shipped in sample env files that must never reach the provider
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_api_key_here",
    "YOUR_API_KEY",
    "PLACEHOLDER_API_KEY",
    "changeme",
];

/// Which backend the gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Gemini,
    Mock,
}

impl BackendKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }
}

/// AI configuration, injected at construction
#[derive(Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    /// Provider base URL
    pub host: String,
    pub backend: BackendKind,
}

impl AiConfig {
    /// Gemini configuration against the public endpoint
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(str::to_string),
            host: DEFAULT_GEMINI_HOST.to_string(),
            backend: BackendKind::Gemini,
        }
    }

    /// Read `GEMINI_API_KEY`, `GEMINI_HOST` and `AI_BACKEND`
    pub fn from_env() -> Self {
        let backend = match std::env::var("AI_BACKEND") {
            Ok(value) => BackendKind::parse(&value).unwrap_or_else(|| {
                warn!(backend = %value, "Unknown AI_BACKEND, falling back to gemini");
                BackendKind::Gemini
            }),
            Err(_) => BackendKind::Gemini,
        };

        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            host: std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_GEMINI_HOST.to_string()),
            backend,
        }
    }

    /// The credential, if it is present and not a known placeholder
    pub fn validated_key(&self) -> Result<&str> {
        let key = self.api_key.as_deref().map(str::trim).unwrap_or_default();
        let placeholder = PLACEHOLDER_KEYS.iter().any(|p| p.eq_ignore_ascii_case(key));
        if key.is_empty() || placeholder {
            return Err(Error::Configuration(MISSING_API_KEY_MESSAGE.to_string()));
        }
        Ok(key)
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("backend", &self.backend)
            .finish()
    }
}

/// Gateway over an AI backend
#[derive(Clone)]
pub struct AIGateway {
    backend: AIClient,
    builder: RequestBuilder,
    /// Credential check result, computed once
    credential: std::result::Result<(), String>,
}

impl AIGateway {
    pub fn new(backend: AIClient, builder: RequestBuilder, config: &AiConfig) -> Self {
        let credential = config.validated_key().map(|_| ()).map_err(|e| match e {
            Error::Configuration(msg) => msg,
            other => other.to_string(),
        });
        if credential.is_err() {
            warn!("{}", MISSING_API_KEY_MESSAGE);
        }

        Self {
            backend,
            builder,
            credential,
        }
    }

    /// Build the backend, prompt library and model router from `config`
    pub fn from_config(config: AiConfig) -> Self {
        let router = ModelRouter::default();
        let backend = match config.backend {
            BackendKind::Gemini => AIClient::Gemini(GeminiBackend::with_timeout(
                &config.host,
                config.validated_key().unwrap_or_default(),
                router.timeout(),
            )),
            BackendKind::Mock => AIClient::mock(),
        };
        let builder = RequestBuilder::new(PromptLibrary::new(), router);
        Self::new(backend, builder, &config)
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(AiConfig::from_env())
    }

    pub fn backend(&self) -> &AIClient {
        &self.backend
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Whether a usable credential was supplied
    pub fn is_configured(&self) -> bool {
        self.credential.is_ok()
    }

    /// Rework a recipe according to the user's request
    pub async fn generate_variation(&self, ctx: &RequestContext) -> AiOutcome<VariationResult> {
        self.execute(|| self.builder.variation(ctx), parse_variation)
            .await
            .into()
    }

    /// Estimate cooking time and calories
    ///
    /// Callers that need a figure regardless fall back to
    /// [`crate::normalize::estimate_stats`] when this fails.
    pub async fn estimate_stats(
        &self,
        title: &str,
        ingredients_text: &str,
        instructions_text: &str,
    ) -> AiOutcome<RecipeStats> {
        self.execute(
            || {
                self.builder
                    .stats_estimate(title, ingredients_text, instructions_text)
            },
            parse_stats,
        )
        .await
        .into()
    }

    /// Invent recipes from the ingredients the user has on hand
    pub async fn generate_from_ingredients(
        &self,
        ingredients_text: &str,
    ) -> AiOutcome<Vec<GeneratedRecipe>> {
        self.execute(
            || self.builder.ingredient_generation(ingredients_text),
            parse_generated_recipes,
        )
        .await
        .into()
    }

    async fn execute<T>(
        &self,
        build: impl FnOnce() -> Result<PromptSpec>,
        parse: fn(&str) -> Result<T>,
    ) -> Result<T> {
        self.credential.clone().map_err(Error::Configuration)?;
        let spec = build()?;

        let router = self.builder.router();
        let result = self.attempt(spec.to_request(router.primary_model()), parse).await;

        match result {
            Err(e) if e.is_quota_exceeded() && spec.operation.allows_quota_fallback() => {
                warn!(
                    operation = %spec.operation,
                    primary = router.primary_model(),
                    secondary = router.secondary_model(),
                    error = %e,
                    "Quota exceeded, retrying once on secondary model"
                );
                self.attempt(spec.to_relaxed_request(router.secondary_model()), parse)
                    .await
            }
            other => other,
        }
    }

    async fn attempt<T>(
        &self,
        request: GenerationRequest,
        parse: fn(&str) -> Result<T>,
    ) -> Result<T> {
        info!(
            operation = %request.operation,
            model = %request.model,
            structured = request.schema.is_some(),
            "Sending AI request"
        );

        let result = match self.backend.generate(&request).await {
            Ok(text) => parse(&text),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => info!(operation = %request.operation, model = %request.model, "AI request succeeded"),
            Err(e) => warn!(
                operation = %request.operation,
                model = %request.model,
                kind = ?e.kind(),
                error = %e,
                "AI request failed"
            ),
        }
        result
    }
}
