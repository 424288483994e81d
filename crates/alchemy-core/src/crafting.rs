//! Crafting potions from a generated recipe.

use alchemy_common::IngredientId;
use thiserror::Error;
use tracing::debug;

use crate::inventory::{Inventory, InventoryError};
use crate::recipes::Recipe;

/// Crafting error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CraftingError {
    /// Missing specific ingredient
    #[error("Missing ingredient: {ingredient}, need {needed}, have {have}")]
    MissingIngredient {
        /// Ingredient that's missing
        ingredient: IngredientId,
        /// Amount needed
        needed: u32,
        /// Amount available
        have: u32,
    },
    /// Asked to craft nothing
    #[error("Craft quantity must be positive")]
    ZeroQuantity,
    /// Inventory error
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Result type for crafting operations.
pub type CraftingResult<T> = Result<T, CraftingError>;

/// How many potions to craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftQuantity {
    /// A single potion.
    One,
    /// As many as the recipe's bottleneck ingredient allows.
    Max,
    /// An explicit count.
    Exact(u32),
}

impl CraftQuantity {
    /// Number of potions this quantity means for `recipe`.
    #[must_use]
    pub const fn resolve(self, recipe: &Recipe) -> u32 {
        match self {
            Self::One => 1,
            Self::Max => recipe.max_potions,
            Self::Exact(count) => count,
        }
    }
}

/// Crafts potions, returning the inventory left afterwards.
///
/// Every ingredient is checked before anything is consumed, so either all of
/// the recipe's ingredients are decremented or the input is left untouched.
/// Ingredients reaching zero are removed.
pub fn craft(
    inventory: &Inventory,
    recipe: &Recipe,
    quantity: CraftQuantity,
) -> CraftingResult<Inventory> {
    let amount = quantity.resolve(recipe);
    if amount == 0 {
        return Err(CraftingError::ZeroQuantity);
    }

    for &ingredient in &recipe.ingredients {
        if !inventory.has(ingredient, amount) {
            return Err(CraftingError::MissingIngredient {
                ingredient,
                needed: amount,
                have: inventory.count(ingredient),
            });
        }
    }

    let mut next = inventory.clone();
    for &ingredient in &recipe.ingredients {
        next.remove(ingredient, amount)?;
    }

    debug!("Crafted {} x recipe {}", amount, recipe.id);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::effect::Effect;
    use crate::ingredient::Ingredient;
    use crate::recipes::generate_recipes;
    use alchemy_common::EffectId;
    use proptest::prelude::*;

    fn setup(counts: &[u32]) -> (Catalog, Inventory) {
        let mut catalog = Catalog::new();
        catalog.insert_effect(Effect::new(EffectId::new(1), "Restore Health", 10.0));
        let mut inventory = Inventory::new();
        for (index, &count) in counts.iter().enumerate() {
            let id = IngredientId::new(index as u32 + 1);
            catalog
                .insert_ingredient(
                    Ingredient::new(id, format!("Ingredient {index}")).effect(EffectId::new(1), 0, 1.0),
                )
                .expect("valid ingredient");
            inventory.set(id, count);
        }
        (catalog, inventory)
    }

    #[test]
    fn test_craft_one() {
        let (catalog, inventory) = setup(&[3, 1]);
        let recipe = generate_recipes(&catalog, &inventory).remove(0);

        let next = craft(&inventory, &recipe, CraftQuantity::One).expect("craftable");
        assert_eq!(next.count(IngredientId::new(1)), 2);
        assert_eq!(next.count(IngredientId::new(2)), 0);
        assert_eq!(next.len(), 1);
        // Input snapshot untouched.
        assert_eq!(inventory.count(IngredientId::new(2)), 1);
        assert_ne!(next.revision(), inventory.revision());
    }

    #[test]
    fn test_craft_max_removes_bottleneck() {
        let (catalog, inventory) = setup(&[5, 2]);
        let recipe = generate_recipes(&catalog, &inventory).remove(0);
        assert_eq!(recipe.max_potions, 2);

        let next = craft(&inventory, &recipe, CraftQuantity::Max).expect("craftable");
        assert_eq!(next.count(IngredientId::new(1)), 3);
        assert!(!next.has(IngredientId::new(2), 1));
    }

    #[test]
    fn test_craft_is_all_or_nothing() {
        let (catalog, inventory) = setup(&[5, 2]);
        let recipe = generate_recipes(&catalog, &inventory).remove(0);

        let result = craft(&inventory, &recipe, CraftQuantity::Exact(3));
        assert!(matches!(
            result,
            Err(CraftingError::MissingIngredient { needed: 3, have: 2, .. })
        ));
        assert_eq!(inventory.count(IngredientId::new(1)), 5);
    }

    #[test]
    fn test_craft_zero_rejected() {
        let (catalog, inventory) = setup(&[1, 1]);
        let recipe = generate_recipes(&catalog, &inventory).remove(0);
        assert_eq!(
            craft(&inventory, &recipe, CraftQuantity::Exact(0)),
            Err(CraftingError::ZeroQuantity)
        );
    }

    proptest! {
        #[test]
        fn prop_craft_max_empties_an_ingredient(counts in proptest::collection::vec(1u32..20, 2..5)) {
            let (catalog, inventory) = setup(&counts);
            for recipe in generate_recipes(&catalog, &inventory) {
                let next = craft(&inventory, &recipe, CraftQuantity::Max).expect("max is craftable");
                prop_assert!(recipe.ingredients.iter().any(|id| next.count(*id) == 0));
                prop_assert!(recipe
                    .ingredients
                    .iter()
                    .all(|id| next.count(*id) + recipe.max_potions == inventory.count(*id)));
            }
        }
    }
}
