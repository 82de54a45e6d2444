//! Recipe normalization
//!
//! Pure functions turning a [`RawRecipe`] into display-ready data:
//! ingredient lines, instruction steps, heuristic stats and a resized
//! thumbnail URL. Every function is total; malformed input degrades to
//! empty or default values.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::recipe::{Ingredient, RawRecipe, RecipeStats};

/// Instruction candidates shorter than this are noise ("1.", "Ok", ...)
const MIN_STEP_CHARS: usize = 4;

/// Calorie base used for categories missing from [`category_base_calories`]
const DEFAULT_BASE_CALORIES: i64 = 400;

/// Multiplier applied when the title advertises a lighter dish
const LIGHT_DISH_ADJUSTMENT: f64 = 0.7;

/// Upper bound (exclusive) of the per-recipe calorie jitter
const CALORIE_JITTER_RANGE: u64 = 50;

const IMAGE_PROXY: &str = "https://wsrv.nl/";

static STEP_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bstep\s+\d+:?").expect("valid regex"));

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.|\d+\)|[•\-*])$").expect("valid regex"));

static TITLE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*-?\s*(min|minute)").expect("valid regex"));

/// Collect the non-blank ingredient slots in slot order.
///
/// All 20 slots are scanned; a blank slot is skipped, not treated as the end
/// of the list. Duplicates are kept.
pub fn extract_ingredients(recipe: &RawRecipe) -> Vec<Ingredient> {
    recipe
        .slots
        .iter()
        .filter_map(|slot| {
            let name = slot.name.as_deref()?;
            if name.trim().is_empty() {
                return None;
            }
            Some(Ingredient::new(name, slot.measure.as_deref().unwrap_or("")))
        })
        .collect()
}

/// Split free-text instructions into discrete steps.
///
/// Handles "Step N:" markers, newline-separated steps and plain prose split
/// at sentence boundaries.
pub fn format_instructions(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let cleaned = STEP_MARKER.replace_all(raw, "").replace("\r\n", "\n");

    split_steps(&cleaned)
        .into_iter()
        .map(str::trim)
        .filter(|step| step.chars().count() >= MIN_STEP_CHARS && !LIST_MARKER.is_match(step))
        .map(str::to_string)
        .collect()
}

/// Break text on newlines and on the whitespace that follows `.`, `!` or `?`
fn split_steps(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();

    for line in text.split('\n') {
        let mut start = 0;
        let mut prev: Option<char> = None;
        for (i, c) in line.char_indices() {
            if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
                pieces.push(&line[start..i]);
                start = i + c.len_utf8();
            }
            prev = Some(c);
        }
        pieces.push(&line[start..]);
    }

    pieces
}

/// Base calories for a TheMealDB category
fn category_base_calories(category: &str) -> i64 {
    match category {
        "Beef" => 600,
        "Pork" => 550,
        "Lamb" => 650,
        "Chicken" => 450,
        "Seafood" => 350,
        "Vegetarian" => 300,
        "Vegan" => 250,
        "Pasta" => 500,
        "Dessert" => 400,
        _ => DEFAULT_BASE_CALORIES,
    }
}

/// Stable value in `[0, 50)` derived from the recipe id
fn calorie_jitter(id: &str) -> i64 {
    let digest = Sha256::digest(id.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % CALORIE_JITTER_RANGE) as i64
}

/// Heuristic cooking time and calories, used when no AI estimate exists
pub fn estimate_stats(recipe: &RawRecipe) -> RecipeStats {
    let ingredient_count = extract_ingredients(recipe).len() as i64;
    let title = recipe.name.to_lowercase();

    // The capture is all digits, so a failed parse means overflow
    let time = TITLE_TIME
        .captures(&title)
        .map(|caps| caps[1].parse::<i64>().unwrap_or(i64::MAX))
        .unwrap_or_else(|| {
            15 + ingredient_count * 2 + (recipe.instructions_len() / 100) as i64
        });

    let base = category_base_calories(&recipe.category);
    let adjustment = if ["healthy", "light", "low"].iter().any(|k| title.contains(k)) {
        LIGHT_DISH_ADJUSTMENT
    } else {
        1.0
    };
    let calories =
        ((base + ingredient_count * 15 + calorie_jitter(&recipe.id)) as f64 * adjustment).floor();

    RecipeStats::clamped(time, calories as i64)
}

/// Render ingredients as `"<measure> <name>"` lines joined with commas, the
/// form used as AI prompt context
pub fn flatten_ingredients(ingredients: &[Ingredient]) -> String {
    ingredients
        .iter()
        .map(|i| {
            let measure = i.measure.trim();
            if measure.is_empty() {
                i.name.trim().to_string()
            } else {
                format!("{} {}", measure, i.name.trim())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resized WebP thumbnail through the image proxy
pub fn thumbnail_url(url: &str, width: u32, quality: u32) -> String {
    if url.trim().is_empty() {
        return String::new();
    }

    Url::parse_with_params(
        IMAGE_PROXY,
        &[
            ("url", url.to_string()),
            ("w", width.to_string()),
            ("q", quality.to_string()),
            ("output", "webp".to_string()),
        ],
    )
    .map(|u| u.to_string())
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{MAX_TIME_MINUTES, MIN_TIME_MINUTES};

    fn teriyaki() -> RawRecipe {
        RawRecipe::new("52772", "Teriyaki Chicken Casserole")
            .with_category("Chicken")
            .with_instructions("Step 1: Preheat oven. Mix sauce. Step 2: Bake 30 minutes.")
            .with_slot(1, "soy sauce", "3/4 cup")
            .with_slot(2, "", "")
    }

    #[test]
    fn test_teriyaki_scenario() {
        let recipe = teriyaki();

        assert_eq!(
            extract_ingredients(&recipe),
            vec![Ingredient::new("soy sauce", "3/4 cup")]
        );
        assert_eq!(
            format_instructions(recipe.instructions.as_deref()),
            vec!["Preheat oven.", "Mix sauce.", "Bake 30 minutes."]
        );

        let stats = estimate_stats(&recipe);
        assert!((MIN_TIME_MINUTES..=MAX_TIME_MINUTES).contains(&stats.time));
        // Chicken base 450 + 1 ingredient * 15 + jitter in [0, 50)
        assert!(stats.calories >= 465 && stats.calories < 515);
    }

    #[test]
    fn test_extract_ingredients_skips_gaps() {
        let recipe = RawRecipe::new("1", "Gappy")
            .with_slot(1, "flour", "200g")
            .with_slot(2, "   ", "1 tsp")
            .with_slot(7, "sugar", "")
            .with_slot(20, "salt", "pinch");

        let names: Vec<_> = extract_ingredients(&recipe)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["flour", "sugar", "salt"]);
    }

    #[test]
    fn test_extract_ingredients_every_gap_pattern_count() {
        // Fill slots according to the bits of a mask and check counts/order
        for mask in [0u32, 1, 0b1010_1010, 0xFFFFF, 0x80001, 0x55555] {
            let mut recipe = RawRecipe::new("id", "t");
            let mut expected = Vec::new();
            for pos in 1..=20 {
                if mask & (1 << (pos - 1)) != 0 {
                    let name = format!("item{}", pos);
                    recipe = recipe.with_slot(pos, &name, "1");
                    expected.push(name);
                }
            }
            let got: Vec<_> = extract_ingredients(&recipe)
                .into_iter()
                .map(|i| i.name)
                .collect();
            assert_eq!(got, expected, "mask {:#x}", mask);
        }
    }

    #[test]
    fn test_extract_ingredients_keeps_duplicates() {
        let recipe = RawRecipe::new("1", "Double")
            .with_slot(1, "butter", "1 tbsp")
            .with_slot(2, "butter", "2 tbsp");
        assert_eq!(extract_ingredients(&recipe).len(), 2);
    }

    #[test]
    fn test_format_instructions_empty() {
        assert!(format_instructions(None).is_empty());
        assert!(format_instructions(Some("")).is_empty());
        assert!(format_instructions(Some("  \r\n ")).is_empty());
    }

    #[test]
    fn test_format_instructions_newlines_and_markers() {
        let raw = "STEP 1\r\nHeat the oil in a pan\r\n\r\n2.\r\n•\r\nAdd onions and fry!Then stir\r\nServe hot";
        let steps = format_instructions(Some(raw));
        assert_eq!(
            steps,
            vec![
                "Heat the oil in a pan",
                "Add onions and fry!Then stir",
                "Serve hot"
            ]
        );
    }

    #[test]
    fn test_format_instructions_drops_noise() {
        let raw = "Mix. Ok. 10. Fold in the eggs? Yes! Done.";
        let steps = format_instructions(Some(raw));
        for step in &steps {
            assert!(step.chars().count() >= MIN_STEP_CHARS);
            assert!(!LIST_MARKER.is_match(step));
        }
        assert!(steps.contains(&"Fold in the eggs?".to_string()));
        assert!(steps.contains(&"Done.".to_string()));
        assert!(!steps.contains(&"Ok.".to_string()));
    }

    #[test]
    fn test_format_instructions_drops_long_list_markers() {
        // Long enough to pass the length filter, removed as bare markers
        let raw = "Whisk the eggs\n100.\n12)\nFold in the flour\n1000)";
        assert_eq!(
            format_instructions(Some(raw)),
            vec!["Whisk the eggs", "Fold in the flour"]
        );
        assert!(LIST_MARKER.is_match("100."));
        assert!(LIST_MARKER.is_match("12)"));
        assert!(!LIST_MARKER.is_match("12) Add salt"));
    }

    #[test]
    fn test_title_time_hint() {
        let recipe = RawRecipe::new("9", "15-minute Garlic Noodles");
        assert_eq!(estimate_stats(&recipe).time, 15);

        let recipe = RawRecipe::new("9", "Quick 2 min Mug Cake");
        assert_eq!(estimate_stats(&recipe).time, MIN_TIME_MINUTES);

        let recipe = RawRecipe::new("9", "Slow 600 minute Brisket");
        assert_eq!(estimate_stats(&recipe).time, MAX_TIME_MINUTES);

        let recipe = RawRecipe::new("9", "Eternal 99999999999999999999 minute Stew");
        assert_eq!(estimate_stats(&recipe).time, MAX_TIME_MINUTES);
    }

    #[test]
    fn test_time_heuristic() {
        let recipe = RawRecipe::new("3", "Stew")
            .with_instructions(&"x".repeat(250))
            .with_slot(1, "beef", "1kg")
            .with_slot(2, "carrot", "2");
        // 15 + 2*2 + 250/100
        assert_eq!(estimate_stats(&recipe).time, 21);
    }

    #[test]
    fn test_unknown_category_uses_default_base() {
        let recipe = RawRecipe::new("77", "Mystery Dish").with_category("Breakfast");
        let stats = estimate_stats(&recipe);
        let jitter = calorie_jitter("77") as u32;
        assert_eq!(stats.calories, 400 + jitter);
    }

    #[test]
    fn test_light_title_adjustment() {
        let heavy = RawRecipe::new("5", "Beef Pie").with_category("Beef");
        let light = RawRecipe::new("5", "Healthy Beef Pie").with_category("Beef");
        let h = estimate_stats(&heavy).calories as f64;
        let l = estimate_stats(&light).calories as f64;
        assert_eq!(l, (h * 0.7).floor());
    }

    #[test]
    fn test_estimate_stats_deterministic() {
        let recipe = teriyaki();
        assert_eq!(estimate_stats(&recipe), estimate_stats(&recipe));
        for id in ["", "1", "52772", "zzz", "食べ物"] {
            assert!(calorie_jitter(id) < 50);
        }
    }

    #[test]
    fn test_flatten_ingredients() {
        let ingredients = vec![
            Ingredient::new("noodles", "200g"),
            Ingredient::new("egg", ""),
            Ingredient::new(" peanuts ", " 1 handful "),
        ];
        assert_eq!(
            flatten_ingredients(&ingredients),
            "200g noodles, egg, 1 handful peanuts"
        );
        assert_eq!(flatten_ingredients(&[]), "");
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(thumbnail_url("", 400, 80), "");
        let url = thumbnail_url("https://example.com/a b.jpg", 400, 80);
        assert!(url.starts_with("https://wsrv.nl/?url=https%3A%2F%2Fexample.com%2Fa"));
        assert!(url.ends_with("&w=400&q=80&output=webp"));
    }
}
