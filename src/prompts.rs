use serde::{Deserialize, Serialize};

use crate::ingredients::contains_meat;

/// Number of recipes requested from the model per generation.
pub const MAX_RECIPES: u32 = 5;

fn default_servings() -> u32 {
    2
}

/// Generation preferences carried alongside the ingredient list. Every field is
/// optional on the wire; servings defaults to 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            servings: default_servings(),
            dietary: None,
            difficulty: None,
            meal_type: None,
            cuisine: None,
            max_cook_time: None,
            equipment: None,
        }
    }
}

/// Fixed persona for the system message. The JSON-only contract lives here so the
/// user prompt can focus on the recipe requirements.
pub fn system_prompt() -> String {
    "You are SmartMix, an expert culinary AI that creates delicious recipes from leftover \
     ingredients to minimize food waste. Always return valid JSON with exactly the structure \
     requested. Be creative but practical. Focus on recipes that home cooks can actually make."
        .to_string()
}

/// Builds the user prompt requesting exactly `MAX_RECIPES` recipes in the fixed
/// JSON shape. Wording flips between vegetarian-priority and mixed depending on
/// whether any ingredient contains a meat keyword; the model's own dietary
/// classification of each recipe is trusted as returned.
pub fn build_prompt(ingredients: &[String], preferences: &Preferences) -> String {
    let has_meat = contains_meat(ingredients);
    let difficulty = preferences.difficulty.as_deref().unwrap_or("any");

    let meat_line = if has_meat {
        "Include mix of vegetarian and non-vegetarian"
    } else {
        "Prioritize VEGETARIAN recipes (no meat/fish/poultry)"
    };

    let dietary_line = match &preferences.dietary {
        Some(dietary) => format!("6. Ensure recipes are {} friendly\n", dietary),
        None => String::new(),
    };
    let difficulty_line = if difficulty != "any" {
        format!("7. Have {} difficulty level\n", difficulty)
    } else {
        String::new()
    };

    format!(
        "Create exactly {max_recipes} recipes using these ingredients: {ingredients}\n\
         \n\
         IMPORTANT REQUIREMENTS:\n\
         1. Use as many provided ingredients as possible in each recipe\n\
         2. Minimize food waste - be creative with leftovers\n\
         3. {meat_line}\n\
         4. Keep recipes practical and achievable for home cooks\n\
         5. Cooking time should be under 45 minutes\n\
         {dietary_line}{difficulty_line}\
         \n\
         VEGETARIAN RULES:\n\
         - Vegetarian = NO meat, poultry, fish, seafood\n\
         - Vegetarian CAN have eggs, dairy, honey\n\
         - For vegan recipes: exclude ALL animal products including eggs, dairy, and honey\n\
         - Mark recipes correctly with isVegetarian: true/false\n\
         \n\
         Sort recipes with vegetarian ones first if possible.\n\
         \n\
         Return EXACTLY this JSON structure with {max_recipes} recipes:\n\
         {{\n\
           \"recipes\": [\n\
             {{\n\
               \"title\": \"Creative Recipe Name (max 40 chars)\",\n\
               \"description\": \"Appetizing description (max 100 chars)\",\n\
               \"usedIngredients\": [\"list of ingredients from user's list used\"],\n\
               \"additionalIngredients\": [\"common pantry items needed, max 5 items\"],\n\
               \"cookingTime\": \"X mins\",\n\
               \"difficulty\": \"Easy|Medium|Hard\",\n\
               \"servings\": {servings},\n\
               \"isVegetarian\": true/false,\n\
               \"isVegan\": true/false,\n\
               \"isGlutenFree\": true/false,\n\
               \"instructions\": [\n\
                 \"Step 1: Clear, specific instruction\",\n\
                 \"Step 2: Next step with measurements\",\n\
                 \"Step 3: Include cooking times/temperatures\",\n\
                 \"(5-8 steps total)\"\n\
               ],\n\
               \"substitutions\": [\n\
                 \"Ingredient X can be replaced with Y\",\n\
                 \"For dietary variation, use Z\"\n\
               ],\n\
               \"nutritionEstimate\": {{\n\
                 \"calories\": \"200-250 per serving\",\n\
                 \"protein\": \"15g\"\n\
               }}\n\
             }}\n\
           ]\n\
         }}\n\
         \n\
         Ensure variety in cooking methods and cuisines. Be creative but realistic!",
        max_recipes = MAX_RECIPES,
        ingredients = ingredients.join(", "),
        meat_line = meat_line,
        dietary_line = dietary_line,
        difficulty_line = difficulty_line,
        servings = preferences.servings,
    )
}

/// Requirements-list variant honoring the extended preferences (meal type,
/// cuisine, cook-time cap, equipment). Not schema-bearing; pair it with
/// `build_prompt`'s schema when used against the live API.
pub fn build_enhanced_prompt(ingredients: &[String], preferences: &Preferences) -> String {
    let mut prompt = format!(
        "Create recipes using these ingredients: {}\n\n",
        ingredients.join(", ")
    );

    prompt.push_str("Requirements:\n");
    prompt.push_str("- Prioritize using the provided ingredients\n");
    prompt.push_str("- Minimize additional ingredients needed\n");
    prompt.push_str("- Provide clear, step-by-step instructions\n");

    if let Some(dietary) = &preferences.dietary {
        prompt.push_str(&format!("- Must be {} friendly\n", dietary));
    }
    if let Some(difficulty) = preferences.difficulty.as_deref().filter(|d| *d != "any") {
        prompt.push_str(&format!("- Difficulty level: {}\n", difficulty));
    }
    if let Some(meal_type) = preferences.meal_type.as_deref().filter(|m| *m != "any") {
        prompt.push_str(&format!("- Suitable for {}\n", meal_type));
    }
    if let Some(cuisine) = &preferences.cuisine {
        prompt.push_str(&format!("- {} cuisine style preferred\n", cuisine));
    }
    if let Some(max_cook_time) = preferences.max_cook_time {
        prompt.push_str(&format!("- Maximum cooking time: {} minutes\n", max_cook_time));
    }
    if let Some(equipment) = &preferences.equipment {
        prompt.push_str(&format!("- Available equipment: {}\n", equipment.join(", ")));
    }

    prompt.push_str(&format!("\nFor {} servings.", preferences.servings));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredients(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn meat_ingredients_request_a_mix() {
        let prompt = build_prompt(
            &ingredients(&["chicken", "rice", "broccoli"]),
            &Preferences::default(),
        );
        assert!(prompt.contains("mix of vegetarian and non-vegetarian"));
        assert!(!prompt.contains("Prioritize VEGETARIAN"));
    }

    #[test]
    fn meatless_ingredients_request_vegetarian_priority() {
        let prompt = build_prompt(
            &ingredients(&["rice", "broccoli", "tofu"]),
            &Preferences::default(),
        );
        assert!(prompt.contains("Prioritize VEGETARIAN recipes (no meat/fish/poultry)"));
        assert!(!prompt.contains("mix of vegetarian and non-vegetarian"));
    }

    #[test]
    fn prompt_embeds_count_servings_and_ingredients() {
        let prefs = Preferences {
            servings: 4,
            ..Preferences::default()
        };
        let prompt = build_prompt(&ingredients(&["rice", "peas"]), &prefs);
        assert!(prompt.contains("Create exactly 5 recipes"));
        assert!(prompt.contains("rice, peas"));
        assert!(prompt.contains("\"servings\": 4"));
    }

    #[test]
    fn dietary_and_difficulty_lines_appear_only_when_set() {
        let prefs = Preferences {
            dietary: Some("gluten-free".to_string()),
            difficulty: Some("easy".to_string()),
            ..Preferences::default()
        };
        let prompt = build_prompt(&ingredients(&["rice"]), &prefs);
        assert!(prompt.contains("Ensure recipes are gluten-free friendly"));
        assert!(prompt.contains("Have easy difficulty level"));

        let bare = build_prompt(&ingredients(&["rice"]), &Preferences::default());
        assert!(!bare.contains("friendly"));
        assert!(!bare.contains("difficulty level"));
    }

    #[test]
    fn enhanced_prompt_includes_extended_preferences() {
        let prefs = Preferences {
            servings: 3,
            meal_type: Some("dinner".to_string()),
            cuisine: Some("Thai".to_string()),
            max_cook_time: Some(25),
            equipment: Some(vec!["wok".to_string(), "oven".to_string()]),
            ..Preferences::default()
        };
        let prompt = build_enhanced_prompt(&ingredients(&["tofu", "rice"]), &prefs);
        assert!(prompt.contains("Suitable for dinner"));
        assert!(prompt.contains("Thai cuisine style preferred"));
        assert!(prompt.contains("Maximum cooking time: 25 minutes"));
        assert!(prompt.contains("Available equipment: wok, oven"));
        assert!(prompt.contains("For 3 servings."));
    }

    #[test]
    fn preferences_deserialize_with_defaults() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.servings, 2);
        assert!(prefs.dietary.is_none());

        let prefs: Preferences =
            serde_json::from_str(r#"{"servings": 6, "dietary": "vegan"}"#).unwrap();
        assert_eq!(prefs.servings, 6);
        assert_eq!(prefs.dietary.as_deref(), Some("vegan"));
    }
}
