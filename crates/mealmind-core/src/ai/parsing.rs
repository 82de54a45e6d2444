//! JSON parsing helpers for AI backend responses
//!
//! Structured-output calls usually return bare JSON, but the schema-less
//! fallback call may wrap the payload in prose or a markdown fence. These
//! functions cut the payload out of the surrounding text before decoding and
//! then check the fields the presentation layer relies on.

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::recipe::RecipeStats;

use super::types::{GeneratedRecipe, VariationResult};

/// Upper bound on recipes kept from one ingredient-generation call
pub const MAX_GENERATED_RECIPES: usize = 5;

/// Longest raw excerpt quoted in an error message
const RAW_EXCERPT_CHARS: usize = 200;

fn excerpt(text: &str) -> String {
    if text.chars().count() > RAW_EXCERPT_CHARS {
        let cut: String = text.chars().take(RAW_EXCERPT_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Slice the outermost `open ... close` span out of a response
fn extract_json(response: &str, open: char, close: char) -> Result<&str> {
    let response = response.trim();
    if response.is_empty() {
        return Err(Error::Parse("Empty response from AI".into()));
    }

    match (response.find(open), response.rfind(close)) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::Parse(format!(
            "No JSON found in AI response | Raw: {}",
            excerpt(response)
        ))),
    }
}

fn decode<T: for<'de> Deserialize<'de>>(json_str: &str, what: &str) -> Result<T> {
    serde_json::from_str(json_str).map_err(|e| {
        Error::Parse(format!(
            "Invalid {} JSON from AI: {} | Raw: {}",
            what,
            e,
            excerpt(json_str)
        ))
    })
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Parse(format!("AI response has an empty {}", field)));
    }
    Ok(())
}

fn require_items(items: &[String], field: &str) -> Result<()> {
    if items.iter().all(|s| s.trim().is_empty()) {
        return Err(Error::Parse(format!("AI response has no {}", field)));
    }
    Ok(())
}

fn clean_lines(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a recipe variation from an AI response
pub fn parse_variation(response: &str) -> Result<VariationResult> {
    let json_str = extract_json(response, '{', '}')?;
    let parsed: VariationResult = decode(json_str, "variation")?;

    require_text(&parsed.title, "title")?;
    require_items(&parsed.ingredients, "ingredients")?;
    require_items(&parsed.instructions, "instructions")?;

    Ok(VariationResult {
        title: parsed.title.trim().to_string(),
        ingredients: clean_lines(parsed.ingredients),
        instructions: clean_lines(parsed.instructions),
        tips: clean_lines(parsed.tips),
    })
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    time: f64,
    calories: f64,
}

/// Parse a time/calorie estimate from an AI response
///
/// Figures are rounded to whole numbers and clamped to the same bounds the
/// heuristic estimator uses.
pub fn parse_stats(response: &str) -> Result<RecipeStats> {
    let json_str = extract_json(response, '{', '}')?;
    let parsed: StatsResponse = decode(json_str, "stats")?;

    if !parsed.time.is_finite() || !parsed.calories.is_finite() {
        return Err(Error::Parse("AI stats are not finite numbers".into()));
    }

    Ok(RecipeStats::clamped(
        parsed.time.round() as i64,
        parsed.calories.round() as i64,
    ))
}

/// Models sometimes wrap the array in an object despite the schema
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedPayload {
    List(Vec<GeneratedRecipe>),
    Wrapped { recipes: Vec<GeneratedRecipe> },
}

/// Parse recipes generated from ingredients on hand
///
/// An empty list is an error. Lists longer than [`MAX_GENERATED_RECIPES`]
/// are truncated.
pub fn parse_generated_recipes(response: &str) -> Result<Vec<GeneratedRecipe>> {
    let trimmed = response.trim();
    let json_str = match (trimmed.find('['), trimmed.find('{')) {
        (Some(a), Some(o)) if o < a => extract_json(trimmed, '{', '}')?,
        (Some(_), _) => extract_json(trimmed, '[', ']')?,
        _ => extract_json(trimmed, '{', '}')?,
    };

    let payload: GeneratedPayload = decode(json_str, "generated recipes")?;
    let mut recipes = match payload {
        GeneratedPayload::List(list) => list,
        GeneratedPayload::Wrapped { recipes } => recipes,
    };

    if recipes.is_empty() {
        return Err(Error::Parse("AI returned no recipes".into()));
    }
    if recipes.len() > MAX_GENERATED_RECIPES {
        warn!(
            count = recipes.len(),
            "AI returned more recipes than requested, truncating"
        );
        recipes.truncate(MAX_GENERATED_RECIPES);
    }

    recipes
        .into_iter()
        .map(|r| {
            require_text(&r.title, "title")?;
            require_items(&r.ingredients, "ingredients")?;
            require_items(&r.instructions, "instructions")?;
            Ok(GeneratedRecipe {
                title: r.title.trim().to_string(),
                ingredients: clean_lines(r.ingredients),
                instructions: clean_lines(r.instructions),
                time: r.time.trim().to_string(),
                difficulty: r.difficulty.trim().to_string(),
                tips: clean_lines(r.tips),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_variation() {
        let response = r#"{"title": "Vegan Teriyaki Tofu Casserole", "ingredients": ["3/4 cup soy sauce", "1 block tofu"], "instructions": ["Press the tofu.", "Bake for 30 minutes."], "tips": ["Use firm tofu."]}"#;
        let result = parse_variation(response).unwrap();
        assert_eq!(result.title, "Vegan Teriyaki Tofu Casserole");
        assert_eq!(result.ingredients.len(), 2);
        assert_eq!(result.instructions.len(), 2);
        assert_eq!(result.tips, vec!["Use firm tofu."]);
    }

    #[test]
    fn test_parse_variation_with_fence_and_prose() {
        let response = "Sure! Here is your recipe:\n```json\n{\"title\": \"Spicy Toast\", \"ingredients\": [\"bread\"], \"instructions\": [\"Toast it.\"]}\n```";
        let result = parse_variation(response).unwrap();
        assert_eq!(result.title, "Spicy Toast");
        assert!(result.tips.is_empty());
    }

    #[test]
    fn test_parse_variation_missing_instructions() {
        let response = r#"{"title": "Toast", "ingredients": ["bread"]}"#;
        assert!(matches!(parse_variation(response), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_variation_empty_title() {
        let response = r#"{"title": "  ", "ingredients": ["bread"], "instructions": ["Toast."]}"#;
        assert!(matches!(parse_variation(response), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_variation_not_json() {
        assert!(matches!(
            parse_variation("I cannot help with that."),
            Err(Error::Parse(_))
        ));
        assert!(matches!(parse_variation(""), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_stats_rounds_and_clamps() {
        let stats = parse_stats(r#"{"time": 42.6, "calories": 512.4}"#).unwrap();
        assert_eq!(stats, RecipeStats { time: 43, calories: 512 });

        let stats = parse_stats(r#"{"time": 900, "calories": -10}"#).unwrap();
        assert_eq!(stats, RecipeStats { time: 180, calories: 0 });
    }

    #[test]
    fn test_parse_stats_missing_field() {
        assert!(matches!(
            parse_stats(r#"{"time": 30}"#),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_parse_generated_recipes_array() {
        let response = r#"[
            {"title": "Egg Fried Rice", "ingredients": ["rice", "egg"], "instructions": ["Fry."], "time": "15 minutes", "difficulty": "Easy"},
            {"title": "Rice Pudding", "ingredients": ["rice", "milk"], "instructions": ["Simmer."], "time": "40 minutes", "difficulty": "Easy", "tips": ["Stir often."]}
        ]"#;
        let recipes = parse_generated_recipes(response).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[1].tips, vec!["Stir often."]);
    }

    #[test]
    fn test_parse_generated_recipes_wrapped() {
        let response = r#"{"recipes": [{"title": "Omelette", "ingredients": ["egg"], "instructions": ["Whisk.", "Cook."], "time": "10 minutes", "difficulty": "Easy"}]}"#;
        let recipes = parse_generated_recipes(response).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Omelette");
    }

    #[test]
    fn test_parse_generated_recipes_truncates() {
        let one = r#"{"title": "T", "ingredients": ["a"], "instructions": ["b"], "time": "5 minutes", "difficulty": "Easy"}"#;
        let response = format!("[{}]", vec![one; 7].join(","));
        let recipes = parse_generated_recipes(&response).unwrap();
        assert_eq!(recipes.len(), MAX_GENERATED_RECIPES);
    }

    #[test]
    fn test_parse_generated_recipes_empty() {
        assert!(matches!(
            parse_generated_recipes("[]"),
            Err(Error::Parse(_))
        ));
    }
}
