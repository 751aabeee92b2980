use std::sync::Arc;

use anyhow::{Context, Result};
use smartmix::cli::{parse_args, Command, SavedCommand};
use smartmix::config::Config;
use smartmix::generator::RecipeGenerator;
use smartmix::ingredients::{
    random_suggestions, remove_duplicates, sanitize, validate, validate_list,
};
use smartmix::prompts::Preferences;
use smartmix::recipe::Recipe;
use smartmix::saved::SavedRecipes;
use smartmix::server;
use smartmix::service::RecipeService;

const SAVED_RECIPES_PATH: &str = "saved_recipes.json";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = parse_args();
    let config = Config::from_env();

    match cli.command {
        Command::Serve => server::serve(&config).await,
        Command::Suggest {
            ingredients,
            servings,
            dietary,
            difficulty,
            save,
        } => suggest(&config, ingredients, servings, dietary, difficulty, save).await,
        Command::Saved { command } => saved(command),
    }
}

async fn suggest(
    config: &Config,
    raw_ingredients: Vec<String>,
    servings: u32,
    dietary: Option<String>,
    difficulty: Option<String>,
    save: bool,
) -> Result<()> {
    let mut ingredients = Vec::new();
    for raw in &raw_ingredients {
        match validate(raw) {
            Ok(()) => ingredients.push(sanitize(raw)),
            Err(reason) => {
                eprintln!("Skipping \"{}\": {}", raw, reason);
            }
        }
    }
    let ingredients = remove_duplicates(&ingredients);
    let list_errors = validate_list(&ingredients);
    if !list_errors.is_empty() {
        if ingredients.is_empty() {
            eprintln!("Try: {}", random_suggestions(5, &ingredients).join(", "));
        }
        anyhow::bail!("{}", list_errors.join("; "));
    }

    println!("Generating recipes for: {}", ingredients.join(", "));

    let preferences = Preferences {
        servings,
        dietary,
        difficulty,
        ..Preferences::default()
    };

    let service = Arc::new(RecipeService::from_config(config));
    let generator = RecipeGenerator::new(service);
    let recipes = generator.generate(&ingredients, &preferences).await;

    let state = generator.snapshot();
    if let Some(error) = state.error {
        anyhow::bail!("Recipe generation failed: {}", error);
    }

    for (index, recipe) in recipes.iter().enumerate() {
        print_recipe(index + 1, recipe);
    }

    if save {
        let mut store = SavedRecipes::load(SAVED_RECIPES_PATH)
            .context("Failed to open saved-recipes store")?;
        let added = store.save_all(&recipes)?;
        println!("\nSaved {} recipes to {}", added, SAVED_RECIPES_PATH);
    }

    Ok(())
}

fn saved(command: SavedCommand) -> Result<()> {
    let mut store =
        SavedRecipes::load(SAVED_RECIPES_PATH).context("Failed to open saved-recipes store")?;

    match command {
        SavedCommand::List => {
            if store.recipes().is_empty() {
                println!("No saved recipes.");
            }
            for (index, recipe) in store.recipes().iter().enumerate() {
                print_recipe(index + 1, recipe);
            }
        }
        SavedCommand::Remove { title } => {
            let removed = store.remove(&title)?;
            if removed == 0 {
                println!("No saved recipe titled \"{}\"", title);
            } else {
                println!("Removed \"{}\"", title);
            }
        }
    }

    Ok(())
}

fn print_recipe(number: usize, recipe: &Recipe) {
    println!("\n{}. {} ({})", number, recipe.title, recipe.cooking_time);
    println!("   {}", recipe.description);
    println!(
        "   Difficulty: {} | Serves: {}{}",
        recipe.difficulty,
        recipe.servings,
        dietary_tags(recipe)
    );
    println!("   Uses: {}", recipe.used_ingredients.join(", "));
    if !recipe.additional_ingredients.is_empty() {
        println!("   Also needs: {}", recipe.additional_ingredients.join(", "));
    }
    for step in &recipe.instructions {
        println!("   - {}", step);
    }
    if !recipe.substitutions.is_empty() {
        println!("   Substitutions: {}", recipe.substitutions.join("; "));
    }
    println!(
        "   Nutrition: {} calories, {} protein",
        recipe.nutrition_estimate.calories, recipe.nutrition_estimate.protein
    );
}

fn dietary_tags(recipe: &Recipe) -> String {
    let mut tags = Vec::new();
    if recipe.is_vegan {
        tags.push("vegan");
    } else if recipe.is_vegetarian {
        tags.push("vegetarian");
    }
    if recipe.is_gluten_free {
        tags.push("gluten-free");
    }
    if tags.is_empty() {
        String::new()
    } else {
        format!(" | {}", tags.join(", "))
    }
}
