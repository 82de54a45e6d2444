//! Request builder
//!
//! Turns operation inputs into a [`PromptSpec`]: rendered prompt text, the
//! structured-output schema and the sampling parameters. Pure apart from the
//! prompt library's override lookup; no network access.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model_router::{ModelRouter, SamplingConfig};
use crate::prompts::PromptLibrary;

use super::schema;
use super::types::{AiOperation, GenerationRequest, RequestContext};

/// A fully prepared request, independent of the model that will run it
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub operation: AiOperation,
    pub system: Option<String>,
    pub prompt: String,
    pub schema: Value,
    pub sampling: SamplingConfig,
}

impl PromptSpec {
    /// Request with the full structured-output schema
    pub fn to_request(&self, model: &str) -> GenerationRequest {
        GenerationRequest {
            operation: self.operation,
            model: model.to_string(),
            system: self.system.clone(),
            prompt: self.prompt.clone(),
            schema: Some(self.schema.clone()),
            sampling: self.sampling,
        }
    }

    /// Request without a schema (JSON output only), same prompt and sampling
    pub fn to_relaxed_request(&self, model: &str) -> GenerationRequest {
        GenerationRequest {
            schema: None,
            ..self.to_request(model)
        }
    }
}

/// Builds [`PromptSpec`]s from the prompt library and model configuration
#[derive(Clone)]
pub struct RequestBuilder {
    prompts: Arc<RwLock<PromptLibrary>>,
    router: Arc<ModelRouter>,
}

impl RequestBuilder {
    pub fn new(prompts: PromptLibrary, router: ModelRouter) -> Self {
        Self {
            prompts: Arc::new(RwLock::new(prompts)),
            router: Arc::new(router),
        }
    }

    /// Embedded prompts and the built-in model configuration only
    pub fn embedded() -> Self {
        Self::new(
            PromptLibrary::embedded_only(),
            ModelRouter::with_config(Default::default()),
        )
    }

    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    fn build(&self, operation: AiOperation, vars: &HashMap<&str, &str>) -> Result<PromptSpec> {
        let (system, prompt) = {
            let mut prompts = self
                .prompts
                .write()
                .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
            let template = prompts.get(operation)?;
            (template.render_system(vars), template.render_user(vars))
        };

        Ok(PromptSpec {
            operation,
            system,
            prompt,
            schema: schema::for_operation(operation),
            sampling: self.router.sampling_for(operation),
        })
    }

    /// Variation of an existing recipe
    pub fn variation(&self, ctx: &RequestContext) -> Result<PromptSpec> {
        let mut vars = HashMap::new();
        vars.insert("title", ctx.original_title.as_str());
        vars.insert("ingredients", ctx.ingredients_text.as_str());
        vars.insert("request", ctx.request_text.as_str());
        self.build(AiOperation::Variation, &vars)
    }

    /// Time and calorie estimate
    pub fn stats_estimate(
        &self,
        title: &str,
        ingredients_text: &str,
        instructions_text: &str,
    ) -> Result<PromptSpec> {
        let mut vars = HashMap::new();
        vars.insert("title", title);
        vars.insert("ingredients", ingredients_text);
        vars.insert("instructions", instructions_text);
        self.build(AiOperation::StatsEstimate, &vars)
    }

    /// Recipes from a free-text ingredient list
    pub fn ingredient_generation(&self, ingredients_text: &str) -> Result<PromptSpec> {
        let mut vars = HashMap::new();
        vars.insert("ingredients", ingredients_text);
        self.build(AiOperation::IngredientGeneration, &vars)
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("primary_model", &self.router.primary_model())
            .field("secondary_model", &self.router.secondary_model())
            .finish()
    }
}
