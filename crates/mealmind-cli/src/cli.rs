//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

/// Mealmind - Browse recipes and rework them with AI
#[derive(Parser)]
#[command(name = "mealmind")]
#[command(about = "Recipe browser with AI variations and estimates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search recipes by name
    Search {
        /// Recipe name or part of it
        name: String,
    },

    /// Show a random recipe
    Random,

    /// List recipe categories
    Categories,

    /// List the recipes in a category
    Category {
        /// Category name (e.g., Seafood)
        name: String,
    },

    /// Show a recipe with ingredients, steps and estimated stats
    Show {
        /// Recipe id
        id: String,
    },

    /// Ask the AI for a variation of a recipe
    Vary {
        /// Recipe id
        id: String,

        /// What to change (e.g., "make it vegan")
        #[arg(short, long)]
        request: String,
    },

    /// Estimate cooking time and calories with the AI
    ///
    /// Falls back to the built-in heuristic when the AI is unavailable.
    Stats {
        /// Recipe id
        id: String,
    },

    /// Invent recipes from ingredients on hand
    Generate {
        /// Comma-separated ingredients (e.g., "rice, eggs, spinach")
        ingredients: String,
    },

    /// Manage AI prompts (list, show, override path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable)
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (variation, stats_estimate, ingredient_generation)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
