//! Structured-output schemas, one per AI operation
//!
//! Written in the provider's OpenAPI-subset dialect (upper-case `type` names).
//! Every field the parsers require is listed under `required`.

use serde_json::{json, Value};

use super::types::AiOperation;

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

/// Schema for a recipe variation
pub fn variation() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "ingredients": string_array(),
            "instructions": string_array(),
            "tips": string_array()
        },
        "required": ["title", "ingredients", "instructions", "tips"]
    })
}

/// Schema for a time/calorie estimate
pub fn stats_estimate() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "time": { "type": "NUMBER", "description": "Total cooking time in minutes" },
            "calories": { "type": "NUMBER", "description": "Calories per serving in kcal" }
        },
        "required": ["time", "calories"]
    })
}

/// Schema for recipes generated from ingredients on hand
pub fn ingredient_generation() -> Value {
    json!({
        "type": "ARRAY",
        "minItems": 3,
        "maxItems": 5,
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "ingredients": string_array(),
                "instructions": string_array(),
                "time": { "type": "STRING" },
                "difficulty": { "type": "STRING" },
                "tips": string_array()
            },
            "required": ["title", "ingredients", "instructions", "time", "difficulty"]
        }
    })
}

/// Schema for an operation
pub fn for_operation(operation: AiOperation) -> Value {
    match operation {
        AiOperation::Variation => variation(),
        AiOperation::StatsEstimate => stats_estimate(),
        AiOperation::IngredientGeneration => ingredient_generation(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_requires_core_fields() {
        let schema = variation();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, ["title", "ingredients", "instructions", "tips"]);
    }

    #[test]
    fn test_generation_is_array_of_objects() {
        let schema = for_operation(AiOperation::IngredientGeneration);
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "OBJECT");
        assert_eq!(schema["maxItems"], 5);
    }
}
