//! Potion recipe generation.
//!
//! This module provides:
//! - Shared effect extraction for an ingredient combination
//! - The wasteful-ingredient filter for three-ingredient combinations
//! - Enumeration of every 2- and 3-ingredient recipe an inventory supports
//! - A memoizing recipe book and recipe filtering/sorting for presentation

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use alchemy_common::{EffectId, IngredientId, RecipeId, Revision};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::effect::IngredientEffect;
use crate::ingredient::Ingredient;
use crate::inventory::Inventory;
use crate::valuation::value_of_potion;

/// Minimum number of ingredients in a combination carrying an effect for the
/// effect to end up in the potion.
pub const SHARED_EFFECT_THRESHOLD: u32 = 2;

/// Per-effect match count an ingredient must exceed on every shared effect to
/// be considered useless in a three-ingredient combination.
pub const USELESS_MATCH_LIMIT: u32 = 2;

/// A brewable combination of 2 or 3 ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Key derived from the ingredient ids in enumeration order.
    pub id: RecipeId,
    /// Ingredients ordered by name.
    pub ingredients: Vec<IngredientId>,
    /// Shared effects, ordered by effect id.
    pub effects: Vec<IngredientEffect>,
    /// Smallest owned count among the ingredients.
    pub max_potions: u32,
    /// Value of one potion in gold.
    pub value: u64,
}

impl Recipe {
    /// Checks whether the recipe uses `ingredient`.
    #[must_use]
    pub fn uses(&self, ingredient: IngredientId) -> bool {
        self.ingredients.contains(&ingredient)
    }

    /// Checks whether the potion carries `effect`.
    #[must_use]
    pub fn produces(&self, effect: EffectId) -> bool {
        self.effects.iter().any(|e| e.effect == effect)
    }
}

/// Effects carried by at least two of the given ingredients.
///
/// When several ingredients carry an effect, the first sighting is kept
/// unless a later one is stronger along an axis the effect amplifies as a
/// power effect (magnitude or duration, checked independently).
#[must_use]
pub fn shared_effects(catalog: &Catalog, ingredients: &[&Ingredient]) -> Vec<IngredientEffect> {
    let mut counts: BTreeMap<EffectId, u32> = BTreeMap::new();
    let mut best: BTreeMap<EffectId, &IngredientEffect> = BTreeMap::new();

    for ingredient in ingredients {
        for entry in &ingredient.effects {
            let (power_magnitude, power_duration) = catalog
                .effect(entry.effect)
                .map_or((false, false), |effect| {
                    (effect.power_affects_magnitude, effect.power_affects_duration)
                });

            match best.entry(entry.effect) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                },
                Entry::Occupied(mut slot) => {
                    let current = *slot.get();
                    if (power_magnitude && entry.magnitude > current.magnitude)
                        || (power_duration && entry.duration > current.duration)
                    {
                        slot.insert(entry);
                    }
                },
            }

            *counts.entry(entry.effect).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count >= SHARED_EFFECT_THRESHOLD)
        .filter_map(|(id, _)| best.get(&id).map(|entry| (*entry).clone()))
        .collect()
}

/// Checks whether a three-ingredient combination wastes an ingredient.
///
/// For each ingredient, every own effect is matched against the shared set
/// and the matches are counted per effect. The ingredient is useless when all
/// of its counts exceed [`USELESS_MATCH_LIMIT`]; an ingredient matching no
/// shared effect at all is therefore always useless. Since effect ids are
/// unique on an ingredient and in the shared set, a count never exceeds one,
/// so in practice only an ingredient contributing nothing is flagged.
/// Pairs are never flagged.
#[must_use]
pub fn has_useless_ingredient(ingredients: &[&Ingredient], shared: &[IngredientEffect]) -> bool {
    if ingredients.len() < 3 {
        return false;
    }

    ingredients.iter().any(|ingredient| {
        let mut matches: BTreeMap<EffectId, u32> = BTreeMap::new();
        for own in ingredient.effect_ids() {
            for entry in shared.iter().filter(|entry| entry.effect == own) {
                *matches.entry(entry.effect).or_insert(0) += 1;
            }
        }
        matches.values().all(|&count| count > USELESS_MATCH_LIMIT)
    })
}

fn check_recipe(catalog: &Catalog, items: &[(&Ingredient, u32)]) -> Option<Recipe> {
    let ingredients: Vec<&Ingredient> = items.iter().map(|(ingredient, _)| *ingredient).collect();
    let effects = shared_effects(catalog, &ingredients);
    if effects.is_empty() || has_useless_ingredient(&ingredients, &effects) {
        return None;
    }

    let enumeration_order: Vec<IngredientId> = ingredients.iter().map(|i| i.id).collect();
    let mut by_name = ingredients.clone();
    by_name.sort_by(|a, b| a.name.cmp(&b.name));

    Some(Recipe {
        id: RecipeId::from_ingredients(&enumeration_order),
        ingredients: by_name.iter().map(|i| i.id).collect(),
        max_potions: items.iter().map(|&(_, count)| count).min().unwrap_or(0),
        value: value_of_potion(effects.iter().filter_map(|entry| catalog.resolve(entry))),
        effects,
    })
}

/// Generates every recipe the inventory supports.
///
/// Pairs and triples are enumerated with ascending index loops over the
/// inventory's snapshot order; every triple is evaluated on its own whether
/// or not its leading pair was a recipe. Inventory entries whose ingredient is
/// missing from the catalog are skipped.
#[must_use]
pub fn generate_recipes(catalog: &Catalog, inventory: &Inventory) -> Vec<Recipe> {
    let items: Vec<(&Ingredient, u32)> = inventory
        .items()
        .filter_map(|item| match catalog.ingredient(item.ingredient) {
            Some(ingredient) => Some((ingredient, item.count)),
            None => {
                warn!(
                    "Inventory references unknown ingredient {}, skipping",
                    item.ingredient
                );
                None
            },
        })
        .collect();

    let n = items.len();
    let mut recipes = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(recipe) = check_recipe(catalog, &[items[i], items[j]]) {
                recipes.push(recipe);
            }
            for k in (j + 1)..n {
                if let Some(recipe) = check_recipe(catalog, &[items[i], items[j], items[k]]) {
                    recipes.push(recipe);
                }
            }
        }
    }

    debug!(
        "Generated {} recipes from {} inventory entries",
        recipes.len(),
        n
    );
    recipes
}

/// Recipe list memoized on the catalog and inventory revisions.
#[derive(Debug, Default)]
pub struct RecipeBook {
    key: Option<(Revision, Revision)>,
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// Creates an empty recipe book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recipes for the given state, regenerating only when the
    /// catalog or inventory changed since the last call.
    pub fn recipes(&mut self, catalog: &Catalog, inventory: &Inventory) -> &[Recipe] {
        let key = (catalog.revision(), inventory.revision());
        if self.key != Some(key) {
            self.recipes = generate_recipes(catalog, inventory);
            self.key = Some(key);
        }
        &self.recipes
    }

}

/// Selection criteria for presenting recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Only recipes producing this effect.
    pub effect: Option<EffectId>,
    /// Only recipes using this ingredient.
    pub ingredient: Option<IngredientId>,
    /// Only recipes worth at least this much.
    pub min_value: u64,
}

impl RecipeFilter {
    /// Checks whether a recipe passes the filter.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        recipe.value >= self.min_value
            && self.effect.map_or(true, |effect| recipe.produces(effect))
            && self
                .ingredient
                .map_or(true, |ingredient| recipe.uses(ingredient))
    }

    /// Returns the matching recipes ordered by descending value.
    #[must_use]
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        let mut selected: Vec<&Recipe> = recipes.iter().filter(|r| self.matches(r)).collect();
        sort_by_value(&mut selected);
        selected
    }
}

/// Orders recipes by descending value, then by key.
pub fn sort_by_value(recipes: &mut [&Recipe]) {
    recipes.sort_by(|a, b| match b.value.cmp(&a.value) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
}
