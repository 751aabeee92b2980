use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate recipe suggestions from a list of ingredients
    Suggest {
        /// Ingredients to cook with, e.g. "chicken" "rice" "broccoli"
        #[arg(required = true)]
        ingredients: Vec<String>,

        /// Number of servings per recipe
        #[arg(short, long, default_value_t = 2)]
        servings: u32,

        /// Dietary tag the recipes must respect, e.g. "vegan" or "gluten-free"
        #[arg(short, long)]
        dietary: Option<String>,

        /// Difficulty level: easy, medium or hard
        #[arg(long)]
        difficulty: Option<String>,

        /// Save every generated recipe to the saved-recipes store
        #[arg(long)]
        save: bool,
    },

    /// Run the backend proxy server
    Serve,

    /// Manage saved recipes
    Saved {
        #[command(subcommand)]
        command: SavedCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SavedCommand {
    /// List saved recipes
    List,
    /// Remove every saved recipe with the given title
    Remove { title: String },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
