//! Mealmind CLI - Recipe browser with AI variations
//!
//! Usage:
//!   mealmind search teriyaki               Search recipes by name
//!   mealmind show 52772                    Normalized recipe detail
//!   mealmind vary 52772 -r "make it vegan" AI variation
//!   mealmind serve --port 3000             Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use mealmind_core::{AIGateway, MealDbClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so stdout stays clean for --json output
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let output = commands::Output::from_flag(cli.json);

    match cli.command {
        Commands::Search { name } => {
            commands::cmd_search(&MealDbClient::from_env(), &name, output).await
        }
        Commands::Random => commands::cmd_random(&MealDbClient::from_env(), output).await,
        Commands::Categories => {
            commands::cmd_categories(&MealDbClient::from_env(), output).await
        }
        Commands::Category { name } => {
            commands::cmd_category(&MealDbClient::from_env(), &name, output).await
        }
        Commands::Show { id } => commands::cmd_show(&MealDbClient::from_env(), &id, output).await,
        Commands::Vary { id, request } => {
            commands::cmd_vary(
                &MealDbClient::from_env(),
                &AIGateway::from_env(),
                &id,
                &request,
                output,
            )
            .await
        }
        Commands::Stats { id } => {
            commands::cmd_stats(
                &MealDbClient::from_env(),
                &AIGateway::from_env(),
                &id,
                output,
            )
            .await
        }
        Commands::Generate { ingredients } => {
            commands::cmd_generate(&AIGateway::from_env(), &ingredients, output).await
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(output),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Serve {
            port,
            host,
            allow_origins,
        } => commands::cmd_serve(&host, port, allow_origins).await,
    }
}
