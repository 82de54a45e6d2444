//! AI command implementations (vary, stats, generate)

use anyhow::Result;
use mealmind_core::{
    estimate_stats, extract_ingredients, flatten_ingredients, AIGateway, AiOutcome, MealDbClient,
    RecipeStats, RequestContext,
};
use serde::Serialize;
use tracing::warn;

use super::{fetch_recipe, print_json, Output};

/// Turn a finished outcome into a CLI result
fn finish<T>(outcome: AiOutcome<T>) -> Result<T> {
    match outcome {
        AiOutcome::Success(value) => Ok(value),
        AiOutcome::Failed(failure) => Err(anyhow::anyhow!(failure.message)),
        AiOutcome::Pending => Err(anyhow::anyhow!("AI operation returned without a result")),
    }
}

/// Ask the AI for a variation of a stored recipe
pub async fn cmd_vary(
    client: &MealDbClient,
    ai: &AIGateway,
    id: &str,
    request: &str,
    output: Output,
) -> Result<()> {
    if request.trim().is_empty() {
        anyhow::bail!("Describe the change you want with --request");
    }

    let recipe = fetch_recipe(client, id).await?;
    let ingredients = flatten_ingredients(&extract_ingredients(&recipe));
    let ctx = RequestContext::new(&recipe.name, &ingredients, request);

    if !output.is_json() {
        println!("✨ Reworking \"{}\": {}", recipe.name, request);
    }

    let variation = finish(ai.generate_variation(&ctx).await)?;

    if output.is_json() {
        return print_json(&variation);
    }

    println!();
    println!("🍽  {}", variation.title);
    println!();
    println!("Ingredients:");
    for line in &variation.ingredients {
        println!("  • {}", line);
    }
    println!();
    println!("Steps:");
    for (i, step) in variation.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    if !variation.tips.is_empty() {
        println!();
        println!("Tips:");
        for tip in &variation.tips {
            println!("  💡 {}", tip);
        }
    }

    Ok(())
}

/// Stats plus where they came from
#[derive(Debug, Serialize)]
pub struct StatsReport {
    #[serde(flatten)]
    pub stats: RecipeStats,
    /// "ai" or "heuristic"
    pub source: &'static str,
}

/// AI estimate of a recipe's stats, with the heuristic as fallback
pub async fn stats_report(client: &MealDbClient, ai: &AIGateway, id: &str) -> Result<StatsReport> {
    let recipe = fetch_recipe(client, id).await?;
    let ingredients = flatten_ingredients(&extract_ingredients(&recipe));
    let instructions = recipe.instructions.as_deref().unwrap_or_default();

    let outcome = ai
        .estimate_stats(&recipe.name, &ingredients, instructions)
        .await;

    Ok(match outcome {
        AiOutcome::Success(stats) => StatsReport {
            stats,
            source: "ai",
        },
        other => {
            if let Some(failure) = other.failure() {
                warn!(error = %failure, "AI stats estimate failed, using heuristic");
            }
            StatsReport {
                stats: estimate_stats(&recipe),
                source: "heuristic",
            }
        }
    })
}

/// Print the stats estimate for a recipe
pub async fn cmd_stats(
    client: &MealDbClient,
    ai: &AIGateway,
    id: &str,
    output: Output,
) -> Result<()> {
    let report = stats_report(client, ai, id).await?;

    if output.is_json() {
        return print_json(&report);
    }

    println!(
        "⏱  {} min   🔥 {} kcal   ({})",
        report.stats.time, report.stats.calories, report.source
    );
    Ok(())
}

/// Invent recipes from ingredients on hand
pub async fn cmd_generate(ai: &AIGateway, ingredients: &str, output: Output) -> Result<()> {
    if ingredients.trim().is_empty() {
        anyhow::bail!("List at least one ingredient");
    }

    let recipes = finish(ai.generate_from_ingredients(ingredients).await)?;

    if output.is_json() {
        return print_json(&recipes);
    }

    for (i, recipe) in recipes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{}. {}  ({} · {})",
            i + 1,
            recipe.title,
            recipe.time,
            recipe.difficulty
        );
        for line in &recipe.ingredients {
            println!("     • {}", line);
        }
        for (n, step) in recipe.instructions.iter().enumerate() {
            println!("     {}. {}", n + 1, step);
        }
    }

    Ok(())
}
