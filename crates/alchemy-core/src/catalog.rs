//! Effect and ingredient catalog.
//!
//! This module provides:
//! - Lookup of effects and ingredients by id and by name
//! - Validation of ingredients at insertion (no dangling effect references)
//! - The name collision policy used when merging imported data
//! - Resolution of [`IngredientEffect`] entries into [`AppliedEffect`] views

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;
use std::hash::Hash;

use alchemy_common::{EffectId, IngredientId, Revision};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::effect::{AppliedEffect, Effect, IngredientEffect};
use crate::ingredient::{Ingredient, MAX_INGREDIENT_EFFECTS};
use crate::valuation::value_of_applied_effect;

/// Catalog error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Ingredient references an effect that is not in the catalog
    #[error("Ingredient {ingredient} references unknown effect {effect}")]
    UnknownEffect {
        /// Offending ingredient
        ingredient: IngredientId,
        /// Missing effect
        effect: EffectId,
    },
    /// Ingredient lists the same effect twice
    #[error("Ingredient {ingredient} lists effect {effect} more than once")]
    DuplicateEffect {
        /// Offending ingredient
        ingredient: IngredientId,
        /// Repeated effect
        effect: EffectId,
    },
    /// Ingredient carries more effects than the game allows
    #[error("Ingredient {ingredient} has {count} effects, at most {max} allowed", max = MAX_INGREDIENT_EFFECTS)]
    TooManyEffects {
        /// Offending ingredient
        ingredient: IngredientId,
        /// Number of effects found
        count: usize,
    },
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Base-name index implementing the collision rename policy.
///
/// When two entries with different ids share a base name, each of them is
/// displayed as `"{base} ({id})"`.
#[derive(Debug, Clone)]
struct NameIndex<K> {
    base_of: HashMap<K, String>,
    by_base: HashMap<String, BTreeSet<K>>,
}

impl<K> Default for NameIndex<K> {
    fn default() -> Self {
        Self {
            base_of: HashMap::new(),
            by_base: HashMap::new(),
        }
    }
}

impl<K: Copy + Ord + Hash + Display> NameIndex<K> {
    /// Records `base` for `id`. Returns every id whose display name may have
    /// changed as a result.
    fn register(&mut self, id: K, base: &str) -> BTreeSet<K> {
        let mut touched = BTreeSet::from([id]);

        if let Some(previous) = self.base_of.insert(id, base.to_string()) {
            if previous != base {
                if let Some(siblings) = self.by_base.get_mut(&previous) {
                    siblings.remove(&id);
                    touched.extend(siblings.iter().copied());
                    if siblings.is_empty() {
                        self.by_base.remove(&previous);
                    }
                }
            }
        }

        let siblings = self.by_base.entry(base.to_string()).or_default();
        siblings.insert(id);
        touched.extend(siblings.iter().copied());
        touched
    }

    fn display_name(&self, id: K) -> Option<String> {
        let base = self.base_of.get(&id)?;
        let collides = self.by_base.get(base).is_some_and(|ids| ids.len() > 1);
        Some(if collides {
            format!("{base} ({id})")
        } else {
            base.clone()
        })
    }

    fn find(&self, name: &str) -> Option<K> {
        let lower = name.to_lowercase();
        self.by_base
            .iter()
            .find(|(base, _)| base.to_lowercase() == lower)
            .and_then(|(_, ids)| ids.iter().next().copied())
    }
}

/// A batch of definitions produced by an import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogBatch {
    /// Effect definitions.
    pub effects: Vec<Effect>,
    /// Ingredient definitions.
    pub ingredients: Vec<Ingredient>,
}

/// Outcome of [`Catalog::merge`].
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Effects that were not in the catalog.
    pub effects_added: usize,
    /// Effects updated in place.
    pub effects_updated: usize,
    /// Ingredients that were not in the catalog.
    pub ingredients_added: usize,
    /// Ingredients updated in place.
    pub ingredients_updated: usize,
    /// Rejected ingredients.
    pub errors: Vec<CatalogError>,
}

/// Whether an insert created or replaced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inserted {
    /// The id was new.
    Added,
    /// An existing entry was replaced.
    Updated,
}

/// Catalog of known effects and ingredients.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    effects: BTreeMap<EffectId, Effect>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    effect_names: NameIndex<EffectId>,
    ingredient_names: NameIndex<IngredientId>,
    revision: Revision,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current revision. Changes on every mutation.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Number of known effects.
    #[must_use]
    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Number of known ingredients.
    #[must_use]
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    /// Gets an effect by id.
    #[must_use]
    pub fn effect(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(&id)
    }

    /// Gets an ingredient by id.
    #[must_use]
    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    /// Iterates effects in ascending id order.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.values()
    }

    /// Iterates ingredients in ascending id order.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    /// Finds an effect by its base name (case-insensitive).
    #[must_use]
    pub fn find_effect(&self, name: &str) -> Option<&Effect> {
        self.effect_names
            .find(name)
            .and_then(|id| self.effects.get(&id))
    }

    /// Finds an ingredient by its base name (case-insensitive).
    #[must_use]
    pub fn find_ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredient_names
            .find(name)
            .and_then(|id| self.ingredients.get(&id))
    }

    /// Inserts an effect or updates it in place.
    pub fn insert_effect(&mut self, mut effect: Effect) -> Inserted {
        let id = effect.id;
        let touched = self.effect_names.register(id, &effect.name);
        effect.name = self
            .effect_names
            .display_name(id)
            .unwrap_or_else(|| effect.name.clone());

        let inserted = match self.effects.insert(id, effect) {
            Some(_) => Inserted::Updated,
            None => Inserted::Added,
        };

        for other in touched.into_iter().filter(|other| *other != id) {
            if let (Some(entry), Some(name)) = (
                self.effects.get_mut(&other),
                self.effect_names.display_name(other),
            ) {
                if entry.name != name {
                    debug!("Renaming effect {} to {:?}", other, name);
                    entry.name = name;
                }
            }
        }

        self.revision = Revision::next();
        inserted
    }

    /// Inserts an ingredient or updates it in place.
    ///
    /// Every effect the ingredient references must already be in the catalog.
    pub fn insert_ingredient(&mut self, mut ingredient: Ingredient) -> CatalogResult<Inserted> {
        self.validate_ingredient(&ingredient)?;

        let id = ingredient.id;
        let touched = self.ingredient_names.register(id, &ingredient.name);
        ingredient.name = self
            .ingredient_names
            .display_name(id)
            .unwrap_or_else(|| ingredient.name.clone());

        let inserted = match self.ingredients.insert(id, ingredient) {
            Some(_) => Inserted::Updated,
            None => Inserted::Added,
        };

        for other in touched.into_iter().filter(|other| *other != id) {
            if let (Some(entry), Some(name)) = (
                self.ingredients.get_mut(&other),
                self.ingredient_names.display_name(other),
            ) {
                if entry.name != name {
                    debug!("Renaming ingredient {} to {:?}", other, name);
                    entry.name = name;
                }
            }
        }

        self.revision = Revision::next();
        Ok(inserted)
    }

    fn validate_ingredient(&self, ingredient: &Ingredient) -> CatalogResult<()> {
        if ingredient.effects.len() > MAX_INGREDIENT_EFFECTS {
            return Err(CatalogError::TooManyEffects {
                ingredient: ingredient.id,
                count: ingredient.effects.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for entry in &ingredient.effects {
            if !self.effects.contains_key(&entry.effect) {
                return Err(CatalogError::UnknownEffect {
                    ingredient: ingredient.id,
                    effect: entry.effect,
                });
            }
            if !seen.insert(entry.effect) {
                return Err(CatalogError::DuplicateEffect {
                    ingredient: ingredient.id,
                    effect: entry.effect,
                });
            }
        }

        Ok(())
    }

    /// Merges an imported batch: all effects first, then all ingredients.
    ///
    /// Rejected ingredients are reported and skipped; everything else is kept.
    pub fn merge(&mut self, batch: CatalogBatch) -> MergeReport {
        let mut report = MergeReport::default();

        for effect in batch.effects {
            match self.insert_effect(effect) {
                Inserted::Added => report.effects_added += 1,
                Inserted::Updated => report.effects_updated += 1,
            }
        }

        for ingredient in batch.ingredients {
            match self.insert_ingredient(ingredient) {
                Ok(Inserted::Added) => report.ingredients_added += 1,
                Ok(Inserted::Updated) => report.ingredients_updated += 1,
                Err(e) => {
                    warn!("Skipping ingredient: {}", e);
                    report.errors.push(e);
                },
            }
        }

        info!(
            "Merged catalog: {} effects added, {} updated; {} ingredients added, {} updated, {} rejected",
            report.effects_added,
            report.effects_updated,
            report.ingredients_added,
            report.ingredients_updated,
            report.errors.len()
        );

        report
    }

    /// Resolves an applied effect against its definition.
    #[must_use]
    pub fn resolve<'a>(&'a self, entry: &IngredientEffect) -> Option<AppliedEffect<'a>> {
        self.effects
            .get(&entry.effect)
            .map(|effect| AppliedEffect::new(effect, entry.duration, entry.magnitude))
    }

    /// Ingredients carrying `effect`, in ascending id order.
    #[must_use]
    pub fn ingredients_with_effect(&self, effect: EffectId) -> Vec<&Ingredient> {
        self.ingredients
            .values()
            .filter(|ingredient| ingredient.has_effect(effect))
            .collect()
    }

    /// Value of each effect of an ingredient, in the ingredient's effect order.
    #[must_use]
    pub fn ingredient_effect_values(&self, id: IngredientId) -> Option<Vec<(EffectId, u64)>> {
        let ingredient = self.ingredients.get(&id)?;
        Some(
            ingredient
                .effects
                .iter()
                .filter_map(|entry| {
                    self.resolve(entry)
                        .map(|applied| (entry.effect, value_of_applied_effect(&applied)))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(id: u32, name: &str) -> Effect {
        Effect::new(EffectId::new(id), name, 1.0)
    }

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_effect(effect(1, "Restore Health").with_magnitude());
        catalog.insert_effect(effect(2, "Fortify Health").with_magnitude().with_duration());
        catalog.insert_effect(effect(3, "Weakness to Fire"));
        catalog
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = sample_catalog();
        let wheat = Ingredient::new(IngredientId::new(100), "Wheat")
            .effect(EffectId::new(1), 0, 2.0)
            .effect(EffectId::new(2), 60, 4.0);

        assert_eq!(catalog.insert_ingredient(wheat), Ok(Inserted::Added));
        assert_eq!(catalog.ingredient_count(), 1);
        assert!(catalog.find_ingredient("wheat").is_some());
        assert!(catalog.find_effect("RESTORE HEALTH").is_some());
        assert_eq!(
            catalog
                .ingredients_with_effect(EffectId::new(2))
                .iter()
                .map(|i| i.id)
                .collect::<Vec<_>>(),
            vec![IngredientId::new(100)]
        );
    }

    #[test]
    fn test_rejects_dangling_effect() {
        let mut catalog = sample_catalog();
        let bad = Ingredient::new(IngredientId::new(7), "Void Salts").effect(EffectId::new(99), 0, 1.0);
        assert_eq!(
            catalog.insert_ingredient(bad),
            Err(CatalogError::UnknownEffect {
                ingredient: IngredientId::new(7),
                effect: EffectId::new(99),
            })
        );
        assert_eq!(catalog.ingredient_count(), 0);
    }

    #[test]
    fn test_rejects_duplicate_and_excess_effects() {
        let mut catalog = sample_catalog();
        let duplicate = Ingredient::new(IngredientId::new(8), "Bone Meal")
            .effect(EffectId::new(1), 0, 1.0)
            .effect(EffectId::new(1), 0, 2.0);
        assert!(matches!(
            catalog.insert_ingredient(duplicate),
            Err(CatalogError::DuplicateEffect { .. })
        ));

        catalog.insert_effect(effect(4, "Fear"));
        catalog.insert_effect(effect(5, "Frenzy"));
        let mut crowded = Ingredient::new(IngredientId::new(9), "Crowded");
        for id in 1..=5 {
            crowded = crowded.effect(EffectId::new(id), 0, 1.0);
        }
        assert_eq!(
            catalog.insert_ingredient(crowded),
            Err(CatalogError::TooManyEffects {
                ingredient: IngredientId::new(9),
                count: 5,
            })
        );
    }

    #[test]
    fn test_name_collision_renames_both_entries() {
        let mut catalog = Catalog::new();
        catalog.insert_effect(effect(0x10, "Paralysis"));
        assert_eq!(
            catalog.effect(EffectId::new(0x10)).map(|e| e.name.as_str()),
            Some("Paralysis")
        );

        catalog.insert_effect(effect(0x20, "Paralysis"));
        assert_eq!(
            catalog.effect(EffectId::new(0x10)).map(|e| e.name.as_str()),
            Some("Paralysis (10000000)")
        );
        assert_eq!(
            catalog.effect(EffectId::new(0x20)).map(|e| e.name.as_str()),
            Some("Paralysis (20000000)")
        );
    }

    #[test]
    fn test_reinsert_same_id_does_not_suffix() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.insert_effect(effect(1, "Fear")), Inserted::Added);
        assert_eq!(catalog.insert_effect(effect(1, "Fear")), Inserted::Updated);
        assert_eq!(
            catalog.effect(EffectId::new(1)).map(|e| e.name.as_str()),
            Some("Fear")
        );
    }

    #[test]
    fn test_rename_away_clears_collision() {
        let mut catalog = Catalog::new();
        catalog.insert_effect(effect(1, "Fear"));
        catalog.insert_effect(effect(2, "Fear"));
        catalog.insert_effect(effect(2, "Frenzy"));
        assert_eq!(
            catalog.effect(EffectId::new(1)).map(|e| e.name.as_str()),
            Some("Fear")
        );
        assert_eq!(
            catalog.effect(EffectId::new(2)).map(|e| e.name.as_str()),
            Some("Frenzy")
        );
    }

    #[test]
    fn test_merge_reports_and_keeps_valid_entries() {
        let mut catalog = sample_catalog();
        let batch = CatalogBatch {
            effects: vec![effect(3, "Weakness to Fire"), effect(4, "Fear")],
            ingredients: vec![
                Ingredient::new(IngredientId::new(1), "Wheat").effect(EffectId::new(4), 0, 1.0),
                Ingredient::new(IngredientId::new(2), "Ghost").effect(EffectId::new(42), 0, 1.0),
            ],
        };

        let report = catalog.merge(batch);
        assert_eq!(report.effects_added, 1);
        assert_eq!(report.effects_updated, 1);
        assert_eq!(report.ingredients_added, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(catalog.ingredient(IngredientId::new(1)).is_some());
        assert!(catalog.ingredient(IngredientId::new(2)).is_none());
    }

    #[test]
    fn test_revision_changes_on_mutation() {
        let mut catalog = sample_catalog();
        let before = catalog.revision();
        catalog.insert_effect(effect(10, "Slow"));
        assert_ne!(before, catalog.revision());
    }

    #[test]
    fn test_ingredient_effect_values() {
        let mut catalog = Catalog::new();
        catalog.insert_effect(Effect::new(EffectId::new(1), "Restore Health", 10.0).with_magnitude());
        catalog.insert_effect(Effect::new(EffectId::new(2), "Cure Disease", 21.0));
        catalog
            .insert_ingredient(
                Ingredient::new(IngredientId::new(5), "Charred Skeever Hide")
                    .effect(EffectId::new(1), 0, 2.0)
                    .effect(EffectId::new(2), 0, 1.0),
            )
            .expect("valid ingredient");

        assert_eq!(
            catalog.ingredient_effect_values(IngredientId::new(5)),
            Some(vec![(EffectId::new(1), 21), (EffectId::new(2), 21)])
        );
        assert_eq!(catalog.ingredient_effect_values(IngredientId::new(6)), None);
    }
}
