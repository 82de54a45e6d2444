//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `recipes` - Recipe browsing (search, random, categories, show)
//! - `ai` - AI commands (vary, stats, generate)
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod ai;
pub mod prompts;
pub mod recipes;
pub mod serve;

// Re-export command functions for main.rs
pub use ai::*;
pub use prompts::*;
pub use recipes::*;
pub use serve::*;

use anyhow::{Context, Result};
use mealmind_core::{MealDbClient, RawRecipe};
use serde::Serialize;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

impl Output {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Look up a full recipe, failing with a readable message when absent
pub async fn fetch_recipe(client: &MealDbClient, id: &str) -> Result<RawRecipe> {
    client
        .lookup_by_id(id)
        .await
        .with_context(|| format!("Failed to fetch recipe {}", id))?
        .ok_or_else(|| anyhow::anyhow!("Recipe not found: {}", id))
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
