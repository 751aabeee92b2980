use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::prompts::Preferences;
use crate::recipe::Recipe;
use crate::service::RecipeService;

/// Observable generation state: recipes populated on success, an error message
/// on failure, never both.
#[derive(Debug, Clone, Default)]
pub struct GenerationState {
    pub recipes: Vec<Recipe>,
    pub loading: bool,
    pub error: Option<String>,
}

/// State plus the latest request token, kept under one lock so the superseded
/// check and the state write cannot interleave with a newer call.
#[derive(Debug, Default)]
struct Inner {
    state: GenerationState,
    latest_token: u64,
}

/// Coordinates generation requests against shared state. Overlapping calls are
/// resolved by a request token: each `generate` takes a fresh token, and only
/// the completion whose token is still the latest writes its result; superseded
/// completions are discarded.
pub struct RecipeGenerator {
    service: Arc<RecipeService>,
    inner: Mutex<Inner>,
}

impl RecipeGenerator {
    pub fn new(service: Arc<RecipeService>) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn snapshot(&self) -> GenerationState {
        self.inner
            .lock()
            .expect("generator state poisoned")
            .state
            .clone()
    }

    /// Runs one generation. Returns the recipes on success, or an empty list
    /// when the attempt failed or was superseded by a later call.
    pub async fn generate(
        &self,
        ingredients: &[String],
        preferences: &Preferences,
    ) -> Vec<Recipe> {
        let token = {
            let mut inner = self.inner.lock().expect("generator state poisoned");
            inner.latest_token += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.state.recipes.clear();
            inner.latest_token
        };

        let result = self.service.generate_recipes(ingredients, preferences).await;

        let mut inner = self.inner.lock().expect("generator state poisoned");
        if inner.latest_token != token {
            warn!("Discarding superseded generation result");
            return Vec::new();
        }

        inner.state.loading = false;
        match result {
            Ok(recipes) if recipes.is_empty() => {
                inner.state.error = Some(
                    "No recipes could be generated. Please try different ingredients.".to_string(),
                );
                Vec::new()
            }
            Ok(recipes) => {
                inner.state.recipes = recipes.clone();
                recipes
            }
            Err(err) => {
                inner.state.error = Some(err.to_string());
                Vec::new()
            }
        }
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("generator state poisoned");
        inner.state.recipes.clear();
        inner.state.error = None;
    }

    /// Clear then generate again with the same inputs.
    pub async fn retry(&self, ingredients: &[String], preferences: &Preferences) -> Vec<Recipe> {
        self.clear();
        self.generate(ingredients, preferences).await
    }
}
