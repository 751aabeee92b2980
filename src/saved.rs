use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::recipe::Recipe;

/// File-backed saved-recipe store, loaded once at startup and rewritten on every
/// change. Identity is the recipe title: two recipes sharing a title are the
/// same saved entity.
pub struct SavedRecipes {
    path: PathBuf,
    recipes: Vec<Recipe>,
}

impl SavedRecipes {
    /// Loads the store from `path`; a missing file means an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let recipes = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read saved recipes from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Saved recipes file {} is corrupt", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self { path, recipes })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn is_saved(&self, title: &str) -> bool {
        self.recipes.iter().any(|r| r.title == title)
    }

    /// Saves the recipe, or removes every entry sharing its title if it is
    /// already saved. Returns true when the recipe ends up saved.
    pub fn toggle(&mut self, recipe: &Recipe) -> Result<bool> {
        let saved = if self.is_saved(&recipe.title) {
            self.recipes.retain(|r| r.title != recipe.title);
            false
        } else {
            self.recipes.push(recipe.clone());
            true
        };
        self.persist()?;
        Ok(saved)
    }

    /// Saves every recipe whose title is not already in the store. Returns how
    /// many were actually added.
    pub fn save_all(&mut self, recipes: &[Recipe]) -> Result<usize> {
        let mut added = 0;
        for recipe in recipes {
            if !self.is_saved(&recipe.title) {
                self.recipes.push(recipe.clone());
                added += 1;
            }
        }
        if added > 0 {
            self.persist()?;
        }
        Ok(added)
    }

    /// Removes all saved entries sharing the title. Returns how many were removed.
    pub fn remove(&mut self, title: &str) -> Result<usize> {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.title != title);
        let removed = before - self.recipes.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(&self.recipes).context("Failed to encode saved recipes")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write saved recipes to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::mock_recipes;

    fn store() -> (tempfile::TempDir, SavedRecipes) {
        let dir = tempfile::tempdir().unwrap();
        let store = SavedRecipes::load(dir.path().join("saved_recipes.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = store();
        assert!(store.recipes().is_empty());
    }

    #[test]
    fn toggle_saves_then_removes() {
        let (_dir, mut store) = store();
        let recipe = mock_recipes(&["Rice".to_string()])[0].clone();

        assert!(store.toggle(&recipe).unwrap());
        assert!(store.is_saved(&recipe.title));

        assert!(!store.toggle(&recipe).unwrap());
        assert!(!store.is_saved(&recipe.title));
    }

    #[test]
    fn identical_titles_collapse_to_one_entry() {
        let (_dir, mut store) = store();
        let recipes = mock_recipes(&["Rice".to_string()]);
        let first = recipes[0].clone();
        let mut same_title = recipes[1].clone();
        same_title.title = first.title.clone();

        store.toggle(&first).unwrap();
        // Second toggle with the same title removes rather than duplicating.
        store.toggle(&same_title).unwrap();
        assert!(store.recipes().is_empty());
    }

    #[test]
    fn save_all_counts_only_new_titles() {
        let (_dir, mut store) = store();
        let recipes = mock_recipes(&["Rice".to_string()]);

        store.toggle(&recipes[0]).unwrap();
        let added = store.save_all(&recipes).unwrap();
        assert_eq!(added, 2, "already-saved title must not be counted");
        assert_eq!(store.recipes().len(), 3);

        // Saving again adds nothing.
        assert_eq!(store.save_all(&recipes).unwrap(), 0);
        assert_eq!(store.recipes().len(), 3);
    }

    #[test]
    fn remove_deletes_all_entries_sharing_title() {
        let (_dir, mut store) = store();
        let recipe = mock_recipes(&["Rice".to_string()])[0].clone();
        store.toggle(&recipe).unwrap();

        assert_eq!(store.remove(&recipe.title).unwrap(), 1);
        assert_eq!(store.remove(&recipe.title).unwrap(), 0);
        assert!(store.recipes().is_empty());
    }

    #[test]
    fn persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_recipes.json");
        let recipe = mock_recipes(&["Rice".to_string()])[0].clone();

        {
            let mut store = SavedRecipes::load(&path).unwrap();
            store.toggle(&recipe).unwrap();
        }

        let reloaded = SavedRecipes::load(&path).unwrap();
        assert_eq!(reloaded.recipes().len(), 1);
        assert_eq!(reloaded.recipes()[0].title, recipe.title);
    }
}
