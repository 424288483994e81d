//! Command handlers behind the CLI.
//!
//! [`App`] owns the loaded catalog, inventory and recipe book. Handlers
//! return data; printing is left to the caller.

use std::path::{Path, PathBuf};

use alchemy_common::RecipeId;
use alchemy_core::{
    craft, Catalog, CraftQuantity, Inventory, MergeReport, Recipe, RecipeBook, RecipeFilter,
};
use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::config::AppConfig;
use crate::import::{parse_effects_log, parse_inventory_log, read_log};
use crate::storage::Storage;

/// Loaded application state.
pub struct App {
    storage: Storage,
    catalog: Catalog,
    inventory: Inventory,
    book: RecipeBook,
}

impl App {
    /// Loads stored data from the configured storage directory.
    pub fn load(config: &AppConfig) -> Self {
        let storage = Storage::new(&config.storage_dir);
        let catalog = storage.load_catalog();
        let inventory = storage.load_inventory(&catalog);
        Self {
            storage,
            catalog,
            inventory,
            book: RecipeBook::new(),
        }
    }

    /// Known effects and ingredients.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Owned ingredients.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Imports the effects log and stores the merged catalog.
    pub fn import_effects(&mut self, path: &Path) -> Result<MergeReport> {
        let content = read_log(path)?;
        let batch = parse_effects_log(&content)
            .with_context(|| format!("Failed to import effects from {}", path.display()))?;

        let report = self.catalog.merge(batch);
        self.storage
            .save_catalog(&self.catalog)
            .context("Failed to store catalog")?;
        Ok(report)
    }

    /// Imports the inventory log, replacing the stored inventory.
    pub fn import_inventory(&mut self, path: &Path) -> Result<usize> {
        let content = read_log(path)?;
        let inventory = parse_inventory_log(&content, &self.catalog)
            .with_context(|| format!("Failed to import inventory from {}", path.display()))?;

        self.storage
            .save_inventory(&inventory)
            .context("Failed to store inventory")?;
        self.inventory = inventory;
        Ok(self.inventory.len())
    }

    /// Recipes passing `filter`, most valuable first, at most `limit` of them.
    pub fn recipes(&mut self, filter: &RecipeFilter, limit: usize) -> Vec<Recipe> {
        let all = self.book.recipes(&self.catalog, &self.inventory);
        filter.apply(all).into_iter().take(limit).cloned().collect()
    }

    /// Crafts a recipe by key and stores the remaining inventory.
    ///
    /// Returns the recipe and the number of potions crafted.
    pub fn craft(&mut self, id: &RecipeId, quantity: CraftQuantity) -> Result<(Recipe, u32)> {
        let recipe = self
            .book
            .recipes(&self.catalog, &self.inventory)
            .iter()
            .find(|recipe| &recipe.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("No recipe {id} can be brewed from the current inventory"))?;

        let amount = quantity.resolve(&recipe);
        let next = craft(&self.inventory, &recipe, quantity)?;
        self.storage
            .save_inventory(&next)
            .context("Failed to store inventory")?;
        self.inventory = next;

        info!("Crafted {} potion(s) of {}", amount, self.describe_effects(&recipe));
        Ok((recipe, amount))
    }

    /// Comma separated effect names of a recipe.
    pub fn describe_effects(&self, recipe: &Recipe) -> String {
        recipe
            .effects
            .iter()
            .map(|entry| {
                self.catalog
                    .effect(entry.effect)
                    .map_or_else(|| entry.effect.to_string(), |effect| effect.name.clone())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma separated ingredient names of a recipe.
    pub fn describe_ingredients(&self, recipe: &Recipe) -> String {
        recipe
            .ingredients
            .iter()
            .map(|&id| {
                self.catalog
                    .ingredient(id)
                    .map_or_else(|| id.to_string(), |ingredient| ingredient.name.clone())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Builds a filter from user supplied names.
    pub fn filter(
        &self,
        effect: Option<&str>,
        ingredient: Option<&str>,
        min_value: u64,
    ) -> Result<RecipeFilter> {
        let effect = effect
            .map(|name| {
                self.catalog
                    .find_effect(name)
                    .map(|effect| effect.id)
                    .ok_or_else(|| anyhow!("Unknown effect: {name}"))
            })
            .transpose()?;
        let ingredient = ingredient
            .map(|name| {
                self.catalog
                    .find_ingredient(name)
                    .map(|ingredient| ingredient.id)
                    .ok_or_else(|| anyhow!("Unknown ingredient: {name}"))
            })
            .transpose()?;

        Ok(RecipeFilter {
            effect,
            ingredient,
            min_value,
        })
    }
}

/// Resolves an optional log path override against the configured default.
pub fn log_path(file: Option<PathBuf>, default: PathBuf) -> PathBuf {
    file.unwrap_or(default)
}
