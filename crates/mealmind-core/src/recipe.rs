//! Recipe data model
//!
//! TheMealDB returns a flat record where ingredients live in numbered
//! `strIngredient1..20` / `strMeasure1..20` fields. [`RawRecipe`] reads those
//! into a fixed array of typed optional slots at deserialization time, so the
//! rest of the crate never does dynamic field lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{estimate_stats, extract_ingredients, format_instructions, thumbnail_url};

/// Number of positional ingredient slots on a TheMealDB record
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Shortest and longest cooking time a [`RecipeStats`] may report (minutes)
pub const MIN_TIME_MINUTES: u32 = 5;
pub const MAX_TIME_MINUTES: u32 = 180;

/// One positional ingredient slot; either field may be absent or blank
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSlot {
    pub name: Option<String>,
    pub measure: Option<String>,
}

/// A recipe record as supplied by the recipe API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireRecipe", into = "WireRecipe")]
pub struct RawRecipe {
    pub id: String,
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: Option<String>,
    pub thumbnail: String,
    pub tags: Option<String>,
    pub youtube: Option<String>,
    pub source: Option<String>,
    pub slots: [IngredientSlot; MAX_INGREDIENT_SLOTS],
}

impl RawRecipe {
    /// Create a recipe with the given id and title and no ingredients
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Set the free-text instructions
    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = Some(instructions.to_string());
        self
    }

    /// Fill a 1-based ingredient slot. Out-of-range positions are ignored.
    pub fn with_slot(mut self, position: usize, name: &str, measure: &str) -> Self {
        if let Some(slot) = position
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i))
        {
            slot.name = Some(name.to_string());
            slot.measure = Some(measure.to_string());
        }
        self
    }

    /// Length of the instructions text in characters (0 when absent)
    pub fn instructions_len(&self) -> usize {
        self.instructions
            .as_deref()
            .map(|s| s.chars().count())
            .unwrap_or(0)
    }
}

/// Wire shape of a TheMealDB record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireRecipe {
    #[serde(rename = "idMeal", default)]
    id: Option<String>,
    #[serde(rename = "strMeal", default)]
    name: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    youtube: Option<String>,
    #[serde(rename = "strSource", default)]
    source: Option<String>,
    /// Numbered ingredient/measure fields and anything else the API adds
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<WireRecipe> for RawRecipe {
    fn from(wire: WireRecipe) -> Self {
        let read = |key: String| -> Option<String> {
            wire.rest
                .get(&key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let mut slots: [IngredientSlot; MAX_INGREDIENT_SLOTS] = Default::default();
        for (i, slot) in slots.iter_mut().enumerate() {
            let n = i + 1;
            slot.name = read(format!("strIngredient{}", n));
            slot.measure = read(format!("strMeasure{}", n));
        }

        Self {
            id: wire.id.unwrap_or_default(),
            name: wire.name.unwrap_or_default(),
            category: wire.category.unwrap_or_default(),
            area: wire.area.unwrap_or_default(),
            instructions: wire.instructions,
            thumbnail: wire.thumbnail.unwrap_or_default(),
            tags: non_blank(wire.tags),
            youtube: non_blank(wire.youtube),
            source: non_blank(wire.source),
            slots,
        }
    }
}

impl From<RawRecipe> for WireRecipe {
    fn from(recipe: RawRecipe) -> Self {
        let to_value = |v: Option<String>| v.map(Value::String).unwrap_or(Value::Null);

        let mut rest = BTreeMap::new();
        for (i, slot) in recipe.slots.into_iter().enumerate() {
            let n = i + 1;
            rest.insert(format!("strIngredient{}", n), to_value(slot.name));
            rest.insert(format!("strMeasure{}", n), to_value(slot.measure));
        }

        Self {
            id: Some(recipe.id),
            name: Some(recipe.name),
            category: Some(recipe.category),
            area: Some(recipe.area),
            instructions: recipe.instructions,
            thumbnail: Some(recipe.thumbnail),
            tags: recipe.tags,
            youtube: recipe.youtube,
            source: recipe.source,
            rest,
        }
    }
}

/// A normalized ingredient line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
    /// UI-only shopping state
    #[serde(default)]
    pub checked: bool,
}

impl Ingredient {
    pub fn new(name: &str, measure: &str) -> Self {
        Self {
            name: name.to_string(),
            measure: measure.to_string(),
            checked: false,
        }
    }
}

/// Cooking time and calorie figures for a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStats {
    /// Minutes, always within [`MIN_TIME_MINUTES`, `MAX_TIME_MINUTES`]
    pub time: u32,
    /// kcal
    pub calories: u32,
}

impl RecipeStats {
    /// Build stats from unbounded figures, clamping time and flooring
    /// calories at zero
    pub fn clamped(time: i64, calories: i64) -> Self {
        Self {
            time: time.clamp(MIN_TIME_MINUTES as i64, MAX_TIME_MINUTES as i64) as u32,
            calories: calories.clamp(0, u32::MAX as i64) as u32,
        }
    }
}

/// A recipe with every derived view the presentation layer needs
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub recipe: RawRecipe,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub stats: RecipeStats,
    pub thumbnail: String,
}

/// Default thumbnail rendering for detail views
const DETAIL_THUMB_WIDTH: u32 = 800;
const DETAIL_THUMB_QUALITY: u32 = 80;

impl RecipeDetail {
    pub fn from_recipe(recipe: RawRecipe) -> Self {
        let ingredients = extract_ingredients(&recipe);
        let steps = format_instructions(recipe.instructions.as_deref());
        let stats = estimate_stats(&recipe);
        let thumbnail = thumbnail_url(&recipe.thumbnail, DETAIL_THUMB_WIDTH, DETAIL_THUMB_QUALITY);
        Self {
            recipe,
            ingredients,
            steps,
            stats,
            thumbnail,
        }
    }
}
