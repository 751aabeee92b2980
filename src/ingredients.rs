use std::fmt;

use rand::seq::SliceRandom;

/// Known ingredient names the validator accepts (or suggests corrections from).
pub const INGREDIENT_SUGGESTIONS: &[&str] = &[
    // Proteins
    "Chicken", "Beef", "Pork", "Fish", "Salmon", "Tuna", "Shrimp", "Tofu", "Eggs", "Bacon",
    "Turkey", "Ham", "Sausage", "Ground Beef", "Chicken Breast", "Lamb",
    // Carbs
    "Rice", "Pasta", "Bread", "Tortillas", "Quinoa", "Couscous", "Potatoes", "Sweet Potatoes",
    "Noodles", "Oats", "Flour", "Crackers", "Bagels", "Pita Bread",
    // Vegetables
    "Broccoli", "Carrots", "Spinach", "Tomatoes", "Onions", "Garlic", "Bell Peppers",
    "Mushrooms", "Zucchini", "Cucumber", "Lettuce", "Corn", "Peas", "Green Beans",
    "Cauliflower", "Asparagus", "Kale", "Cabbage", "Celery", "Brussels Sprouts",
    "Eggplant", "Squash", "Radishes", "Beets", "Artichokes",
    // Dairy
    "Cheese", "Milk", "Yogurt", "Butter", "Cream", "Sour Cream", "Cream Cheese",
    "Mozzarella", "Cheddar", "Parmesan", "Feta", "Ricotta", "Cottage Cheese",
    // Pantry/Legumes
    "Beans", "Black Beans", "Chickpeas", "Lentils", "Kidney Beans", "Pinto Beans",
    "Canned Tomatoes", "Tomato Sauce", "Coconut Milk", "Peanut Butter",
    // Condiments & Seasonings
    "Olive Oil", "Soy Sauce", "Hot Sauce", "Salsa", "Vinegar", "Honey", "Mustard",
    "Mayonnaise", "Ketchup", "BBQ Sauce", "Worcestershire", "Teriyaki Sauce",
    "Salt", "Pepper", "Paprika", "Cumin", "Oregano", "Basil", "Thyme", "Rosemary",
    // Fruits
    "Apples", "Bananas", "Oranges", "Lemons", "Limes", "Berries", "Strawberries",
    "Blueberries", "Grapes", "Mango", "Pineapple", "Avocado", "Peaches", "Pears",
    // Nuts & Seeds
    "Almonds", "Walnuts", "Cashews", "Peanuts", "Sunflower Seeds", "Chia Seeds",
    "Sesame Seeds", "Pine Nuts", "Pecans",
];

/// Keywords that mark an ingredient list as containing meat.
pub const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "fish", "meat", "bacon", "ham", "turkey", "lamb",
];

pub const MAX_INGREDIENTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty,
    SingleCharacter,
    DigitsOnly,
    NoLetters,
    TooShort,
    TooLong,
    DidYouMean(String),
    NotRecognized(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty => write!(f, "Ingredient cannot be empty"),
            ValidationError::SingleCharacter | ValidationError::NoLetters => {
                write!(f, "Please enter a valid ingredient name")
            }
            ValidationError::DigitsOnly => write!(f, "Ingredient cannot be just numbers"),
            ValidationError::TooShort => write!(f, "Ingredient name is too short"),
            ValidationError::TooLong => write!(f, "Ingredient name is too long"),
            ValidationError::DidYouMean(suggestion) => {
                write!(f, "Did you mean \"{}\"? Please check the spelling.", suggestion)
            }
            ValidationError::NotRecognized(input) => write!(
                f,
                "\"{}\" is not recognized. Please check the spelling or try a common ingredient.",
                input
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a single free-text ingredient. Only vocabulary entries (exact,
/// case-insensitive) pass; near-misses are rejected with a correction hint.
pub fn validate(raw: &str) -> Result<(), ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() == 1 {
        return Err(ValidationError::SingleCharacter);
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::DigitsOnly);
    }
    if !trimmed.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::NoLetters);
    }
    if trimmed.chars().count() < 2 {
        return Err(ValidationError::TooShort);
    }
    if trimmed.chars().count() > 30 {
        return Err(ValidationError::TooLong);
    }

    let lower = trimmed.to_lowercase();
    let is_known = INGREDIENT_SUGGESTIONS
        .iter()
        .any(|known| known.to_lowercase() == lower);

    if !is_known {
        if let Some(close) = find_close_match(trimmed) {
            return Err(ValidationError::DidYouMean(close.to_string()));
        }
        return Err(ValidationError::NotRecognized(trimmed.to_string()));
    }

    Ok(())
}

/// Finds a vocabulary entry the input is likely a typo of: substring containment
/// in either direction, or length difference <= 2 with at most 2 differing
/// characters over the shared prefix.
pub fn find_close_match(input: &str) -> Option<&'static str> {
    let input_lower = input.to_lowercase();

    for suggestion in INGREDIENT_SUGGESTIONS {
        let suggestion_lower = suggestion.to_lowercase();

        if suggestion_lower.contains(&input_lower) || input_lower.contains(&suggestion_lower) {
            return Some(suggestion);
        }

        let len_a = suggestion_lower.chars().count();
        let len_b = input_lower.chars().count();
        if len_a.abs_diff(len_b) <= 2 {
            let differences = suggestion_lower
                .chars()
                .zip(input_lower.chars())
                .filter(|(a, b)| a != b)
                .count();
            if differences <= 2 {
                return Some(suggestion);
            }
        }
    }

    None
}

/// Canonicalizes an accepted ingredient: trim, lowercase, strip anything outside
/// [a-z0-9 -], collapse whitespace, then title-case each word. Idempotent.
pub fn sanitize(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive dedup; first occurrence wins, order preserved.
pub fn remove_duplicates(ingredients: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();
    for ingredient in ingredients {
        let normalized = ingredient.to_lowercase().trim().to_string();
        if !seen.contains(&normalized) {
            seen.push(normalized);
            result.push(ingredient.clone());
        }
    }
    result
}

/// Validates the ingredient list as a whole. Returns user-facing error messages.
pub fn validate_list(ingredients: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    if ingredients.is_empty() {
        errors.push("Please add at least one ingredient".to_string());
    }
    if ingredients.len() > MAX_INGREDIENTS {
        errors.push("Too many ingredients. Please limit to 20 items".to_string());
    }
    errors
}

/// True when any ingredient textually contains a meat keyword.
pub fn contains_meat(ingredients: &[String]) -> bool {
    ingredients.iter().any(|ingredient| {
        let lower = ingredient.to_lowercase();
        MEAT_KEYWORDS.iter().any(|meat| lower.contains(meat))
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategorizedIngredients {
    pub proteins: Vec<String>,
    pub carbs: Vec<String>,
    pub vegetables: Vec<String>,
    pub dairy: Vec<String>,
    pub condiments: Vec<String>,
    pub fruits: Vec<String>,
    pub other: Vec<String>,
}

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("proteins", &[
        "chicken", "beef", "pork", "fish", "salmon", "tuna", "shrimp", "tofu", "eggs", "beans",
        "lentils", "chickpeas",
    ]),
    ("carbs", &[
        "rice", "pasta", "bread", "potato", "quinoa", "couscous", "noodles", "tortilla",
    ]),
    ("vegetables", &[
        "broccoli", "carrot", "spinach", "tomato", "onion", "pepper", "mushroom", "zucchini",
        "cucumber", "lettuce", "kale", "cabbage",
    ]),
    ("dairy", &["cheese", "milk", "yogurt", "butter", "cream", "sour cream"]),
    ("condiments", &[
        "soy sauce", "olive oil", "vinegar", "salt", "pepper", "garlic", "ginger", "honey",
        "mustard", "mayo",
    ]),
    ("fruits", &[
        "apple", "banana", "orange", "lemon", "lime", "berry", "mango", "pineapple",
    ]),
];

/// Buckets ingredients by bidirectional substring against the category keyword
/// sets; first matching category wins.
pub fn categorize(ingredients: &[String]) -> CategorizedIngredients {
    let mut categorized = CategorizedIngredients::default();

    for ingredient in ingredients {
        let lower = ingredient.to_lowercase();
        let matched = CATEGORY_KEYWORDS.iter().find(|(_, items)| {
            items
                .iter()
                .any(|item| lower.contains(item) || item.contains(lower.as_str()))
        });

        let bucket = match matched.map(|(name, _)| *name) {
            Some("proteins") => &mut categorized.proteins,
            Some("carbs") => &mut categorized.carbs,
            Some("vegetables") => &mut categorized.vegetables,
            Some("dairy") => &mut categorized.dairy,
            Some("condiments") => &mut categorized.condiments,
            Some("fruits") => &mut categorized.fruits,
            _ => &mut categorized.other,
        };
        bucket.push(ingredient.clone());
    }

    categorized
}

/// Samples `count` vocabulary entries, excluding (case-insensitively) anything in
/// `exclude`. Used for the "try these" hints.
pub fn random_suggestions(count: usize, exclude: &[String]) -> Vec<String> {
    let available: Vec<&&str> = INGREDIENT_SUGGESTIONS
        .iter()
        .filter(|item| {
            !exclude
                .iter()
                .any(|ex| ex.to_lowercase() == item.to_lowercase())
        })
        .collect();

    let mut rng = rand::thread_rng();
    available
        .choose_multiple(&mut rng, count.min(available.len()))
        .map(|s| s.to_string())
        .collect()
}
