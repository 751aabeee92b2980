use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Difficulty reported by the model. Anything unrecognized normalizes to Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub calories: String,
    pub protein: String,
}

impl Default for NutritionEstimate {
    fn default() -> Self {
        Self {
            calories: "Not calculated".to_string(),
            protein: "Not calculated".to_string(),
        }
    }
}

/// A generated recipe, normalized so every field is populated. Identity for
/// save/dedup purposes is the title alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub used_ingredients: Vec<String>,
    pub additional_ingredients: Vec<String>,
    pub cooking_time: String,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub instructions: Vec<String>,
    pub substitutions: Vec<String>,
    pub nutrition_estimate: NutritionEstimate,
}

/// Loose shape of a recipe as the model actually returns it: any field may be
/// missing or of the wrong kind.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipePayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    used_ingredients: Option<Vec<String>>,
    #[serde(default)]
    additional_ingredients: Option<Vec<String>>,
    #[serde(default)]
    cooking_time: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    servings: Option<u32>,
    #[serde(default)]
    is_vegetarian: Option<bool>,
    #[serde(default)]
    is_vegan: Option<bool>,
    #[serde(default)]
    is_gluten_free: Option<bool>,
    #[serde(default)]
    instructions: Option<Vec<String>>,
    #[serde(default)]
    substitutions: Option<Vec<String>>,
    #[serde(default)]
    nutrition_estimate: Option<NutritionEstimate>,
}

impl From<RecipePayload> for Recipe {
    fn from(payload: RecipePayload) -> Self {
        Recipe {
            title: payload.title.unwrap_or_else(|| "Unnamed Recipe".to_string()),
            description: payload
                .description
                .unwrap_or_else(|| "A delicious recipe using your ingredients".to_string()),
            used_ingredients: payload.used_ingredients.unwrap_or_default(),
            additional_ingredients: payload.additional_ingredients.unwrap_or_default(),
            cooking_time: payload.cooking_time.unwrap_or_else(|| "30 mins".to_string()),
            difficulty: payload
                .difficulty
                .and_then(|d| d.parse().ok())
                .unwrap_or_default(),
            servings: payload.servings.unwrap_or(2),
            is_vegetarian: payload.is_vegetarian.unwrap_or(false),
            is_vegan: payload.is_vegan.unwrap_or(false),
            is_gluten_free: payload.is_gluten_free.unwrap_or(false),
            instructions: payload
                .instructions
                .filter(|steps| !steps.is_empty())
                .unwrap_or_else(|| vec!["Prepare and cook ingredients as needed".to_string()]),
            substitutions: payload.substitutions.unwrap_or_default(),
            nutrition_estimate: payload.nutrition_estimate.unwrap_or_default(),
        }
    }
}

/// Normalizes raw model output into complete recipes. Never fails and the output
/// length always equals the input length; a value that is not even an object
/// becomes an all-defaults recipe.
pub fn validate_and_format(values: Vec<Value>) -> Vec<Recipe> {
    values
        .into_iter()
        .map(|value| {
            serde_json::from_value::<RecipePayload>(value)
                .unwrap_or_default()
                .into()
        })
        .collect()
}

fn mock_is_vegetarian(ingredients: &[String]) -> bool {
    const MOCK_MEATS: &[&str] = &["chicken", "beef", "pork", "fish"];
    !ingredients.iter().any(|ingredient| {
        let lower = ingredient.to_lowercase();
        MOCK_MEATS.iter().any(|meat| lower.contains(meat))
    })
}

fn prefix(ingredients: &[String], n: usize) -> Vec<String> {
    ingredients[..n.min(ingredients.len())].to_vec()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Deterministic stand-in recipes used when no API key is configured or after an
/// unclassified upstream failure.
pub fn mock_recipes(ingredients: &[String]) -> Vec<Recipe> {
    vec![
        Recipe {
            title: "Quick Stir-Fry".to_string(),
            description: "A versatile stir-fry using your available ingredients".to_string(),
            used_ingredients: prefix(ingredients, 4),
            additional_ingredients: strings(&["soy sauce", "sesame oil", "garlic"]),
            cooking_time: "15 mins".to_string(),
            difficulty: Difficulty::Easy,
            servings: 2,
            is_vegetarian: mock_is_vegetarian(ingredients),
            is_vegan: false,
            is_gluten_free: false,
            instructions: strings(&[
                "Heat oil in a wok over high heat",
                "Add protein if using and cook until done",
                "Add vegetables and stir-fry for 3-5 minutes",
                "Season with soy sauce and serve",
            ]),
            substitutions: strings(&["Any vegetables work", "Tofu can replace meat"]),
            nutrition_estimate: NutritionEstimate {
                calories: "250-300".to_string(),
                protein: "15g".to_string(),
            },
        },
        Recipe {
            title: "Simple Pasta".to_string(),
            description: "Quick pasta dish with fresh ingredients".to_string(),
            used_ingredients: prefix(ingredients, 3),
            additional_ingredients: strings(&["pasta", "olive oil", "herbs"]),
            cooking_time: "20 mins".to_string(),
            difficulty: Difficulty::Easy,
            servings: 3,
            is_vegetarian: true,
            is_vegan: false,
            is_gluten_free: false,
            instructions: strings(&[
                "Cook pasta according to package directions",
                "Saute vegetables in olive oil",
                "Toss pasta with vegetables",
                "Season and serve",
            ]),
            substitutions: strings(&["Any pasta shape works", "Add cheese if desired"]),
            nutrition_estimate: NutritionEstimate {
                calories: "280".to_string(),
                protein: "10g".to_string(),
            },
        },
        Recipe {
            title: "Fresh Salad Bowl".to_string(),
            description: "Healthy and refreshing salad".to_string(),
            used_ingredients: prefix(ingredients, 4),
            additional_ingredients: strings(&["dressing", "lemon"]),
            cooking_time: "10 mins".to_string(),
            difficulty: Difficulty::Easy,
            servings: 2,
            is_vegetarian: true,
            is_vegan: true,
            is_gluten_free: true,
            instructions: strings(&[
                "Wash and chop all vegetables",
                "Combine in a large bowl",
                "Add dressing and toss",
                "Serve immediately",
            ]),
            substitutions: strings(&["Any fresh vegetables work"]),
            nutrition_estimate: NutritionEstimate {
                calories: "150".to_string(),
                protein: "5g".to_string(),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_complete_recipe_unchanged() {
        let values = vec![json!({
            "title": "Veggie Bake",
            "description": "Oven-baked vegetables",
            "usedIngredients": ["broccoli", "cheese"],
            "additionalIngredients": ["breadcrumbs"],
            "cookingTime": "40 mins",
            "difficulty": "Hard",
            "servings": 4,
            "isVegetarian": true,
            "isVegan": false,
            "isGlutenFree": false,
            "instructions": ["Preheat oven", "Bake"],
            "substitutions": ["Use any cheese"],
            "nutritionEstimate": {"calories": "320", "protein": "12g"}
        })];

        let recipes = validate_and_format(values);
        assert_eq!(recipes.len(), 1);
        let recipe = &recipes[0];
        assert_eq!(recipe.title, "Veggie Bake");
        assert_eq!(recipe.difficulty, Difficulty::Hard);
        assert_eq!(recipe.servings, 4);
        assert!(recipe.is_vegetarian);
        assert_eq!(recipe.nutrition_estimate.calories, "320");
    }

    #[test]
    fn fills_defaults_for_missing_fields() {
        let recipes = validate_and_format(vec![json!({})]);
        assert_eq!(recipes.len(), 1);
        let recipe = &recipes[0];
        assert_eq!(recipe.title, "Unnamed Recipe");
        assert_eq!(recipe.description, "A delicious recipe using your ingredients");
        assert_eq!(recipe.cooking_time, "30 mins");
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.servings, 2);
        assert!(!recipe.is_vegetarian);
        assert_eq!(
            recipe.instructions,
            vec!["Prepare and cook ingredients as needed"]
        );
        assert!(recipe.substitutions.is_empty());
        assert_eq!(recipe.nutrition_estimate, NutritionEstimate::default());
    }

    #[test]
    fn never_fails_and_preserves_length() {
        let values = vec![
            json!("not an object"),
            json!(42),
            json!({"title": "Okay"}),
            json!({"difficulty": "impossible"}),
        ];
        let recipes = validate_and_format(values);
        assert_eq!(recipes.len(), 4);
        assert_eq!(recipes[2].title, "Okay");
        assert_eq!(recipes[3].difficulty, Difficulty::Medium);
    }

    #[test]
    fn mock_recipes_use_input_prefixes() {
        let ingredients = vec![
            "Chicken".to_string(),
            "Rice".to_string(),
            "Broccoli".to_string(),
            "Garlic".to_string(),
            "Onions".to_string(),
        ];
        let recipes = mock_recipes(&ingredients);
        assert_eq!(recipes.len(), 3);
        for recipe in &recipes {
            for used in &recipe.used_ingredients {
                assert!(ingredients.contains(used));
            }
        }
        assert_eq!(recipes[0].used_ingredients.len(), 4);
        assert_eq!(recipes[1].used_ingredients.len(), 3);
        // Chicken in the list, so the stir-fry is not vegetarian
        assert!(!recipes[0].is_vegetarian);
    }

    #[test]
    fn mock_stir_fry_is_vegetarian_without_meat() {
        let ingredients = vec!["Rice".to_string(), "Tofu".to_string()];
        let recipes = mock_recipes(&ingredients);
        assert!(recipes[0].is_vegetarian);
        assert_eq!(recipes[0].used_ingredients, ingredients);
    }

    #[test]
    fn recipe_serializes_in_camel_case() {
        let recipe = &mock_recipes(&["Rice".to_string()])[0];
        let value = serde_json::to_value(recipe).unwrap();
        assert!(value.get("usedIngredients").is_some());
        assert!(value.get("isVegetarian").is_some());
        assert_eq!(value["difficulty"], "Easy");
    }
}
