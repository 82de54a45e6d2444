//! Recipe browsing command implementations

use anyhow::{Context, Result};
use mealmind_core::{MealDbClient, RawRecipe, RecipeDetail};

use super::{fetch_recipe, print_json, truncate, Output};

fn print_recipe_rows(recipes: &[RawRecipe]) {
    println!("{:<8} {:<45} {:<12} {}", "ID", "NAME", "CATEGORY", "AREA");
    println!("{}", "-".repeat(80));
    for recipe in recipes {
        println!(
            "{:<8} {:<45} {:<12} {}",
            recipe.id,
            truncate(&recipe.name, 45),
            recipe.category,
            recipe.area
        );
    }
}

/// Search recipes by name
pub async fn cmd_search(client: &MealDbClient, name: &str, output: Output) -> Result<()> {
    let recipes = client
        .search_by_name(name)
        .await
        .context("Recipe search failed")?;

    if output.is_json() {
        return print_json(&recipes);
    }

    if recipes.is_empty() {
        println!("No recipes found for \"{}\"", name);
        return Ok(());
    }

    println!("🔍 {} recipe(s) matching \"{}\"\n", recipes.len(), name);
    print_recipe_rows(&recipes);
    Ok(())
}

/// Show one random recipe
pub async fn cmd_random(client: &MealDbClient, output: Output) -> Result<()> {
    let recipe = client
        .random()
        .await
        .context("Failed to fetch a random recipe")?
        .ok_or_else(|| anyhow::anyhow!("No recipe returned"))?;

    print_detail(&RecipeDetail::from_recipe(recipe), output)
}

/// List category names
pub async fn cmd_categories(client: &MealDbClient, output: Output) -> Result<()> {
    let categories = client
        .categories()
        .await
        .context("Failed to list categories")?;

    if output.is_json() {
        return print_json(&categories);
    }

    println!("Categories:\n");
    for category in &categories {
        println!("  {}", category);
    }
    Ok(())
}

/// List the recipes in a category
pub async fn cmd_category(client: &MealDbClient, name: &str, output: Output) -> Result<()> {
    let recipes = client
        .filter_by_category(name)
        .await
        .with_context(|| format!("Failed to list category {}", name))?;

    if output.is_json() {
        return print_json(&recipes);
    }

    if recipes.is_empty() {
        println!("No recipes in category \"{}\"", name);
        return Ok(());
    }

    println!("📂 {} ({} recipes)\n", name, recipes.len());
    println!("{:<8} {}", "ID", "NAME");
    println!("{}", "-".repeat(60));
    for recipe in &recipes {
        println!("{:<8} {}", recipe.id, truncate(&recipe.name, 50));
    }
    Ok(())
}

/// Show a recipe normalized for display
pub async fn cmd_show(client: &MealDbClient, id: &str, output: Output) -> Result<()> {
    let recipe = fetch_recipe(client, id).await?;
    print_detail(&RecipeDetail::from_recipe(recipe), output)
}

fn print_detail(detail: &RecipeDetail, output: Output) -> Result<()> {
    if output.is_json() {
        return print_json(detail);
    }

    let recipe = &detail.recipe;
    println!("🍽  {} (#{})", recipe.name, recipe.id);
    if !recipe.category.is_empty() || !recipe.area.is_empty() {
        println!("   {} · {}", recipe.category, recipe.area);
    }
    println!(
        "   ⏱  ~{} min   🔥 ~{} kcal (estimated)",
        detail.stats.time, detail.stats.calories
    );
    if !detail.thumbnail.is_empty() {
        println!("   🖼  {}", detail.thumbnail);
    }

    println!();
    println!("Ingredients:");
    for ingredient in &detail.ingredients {
        if ingredient.measure.trim().is_empty() {
            println!("  • {}", ingredient.name);
        } else {
            println!("  • {} {}", ingredient.measure.trim(), ingredient.name);
        }
    }

    println!();
    println!("Steps:");
    for (i, step) in detail.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    Ok(())
}
