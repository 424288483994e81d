//! # Alchemy Core
//!
//! Pure computation behind the alchemy helper.
//!
//! This crate provides:
//! - Effect and ingredient definitions and their catalog
//! - Inventory of owned ingredients
//! - Potion valuation
//! - Recipe generation over 2- and 3-ingredient combinations
//! - Crafting (consuming a recipe's ingredients)
//!
//! Nothing here performs I/O; every function is a pure function of the
//! catalog and inventory passed in.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod crafting;
pub mod effect;
pub mod ingredient;
pub mod inventory;
pub mod recipes;
pub mod valuation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::crafting::*;
    pub use crate::effect::*;
    pub use crate::ingredient::*;
    pub use crate::inventory::*;
    pub use crate::recipes::*;
    pub use crate::valuation::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alchemy_common::{EffectId, IngredientId};

    #[test]
    fn test_brew_and_craft_cycle() {
        let mut catalog = Catalog::new();
        catalog.insert_effect(Effect::new(EffectId::new(1), "Restore Health", 10.0).with_magnitude());
        catalog.insert_effect(Effect::new(EffectId::new(2), "Fortify Health", 5.0).with_duration());
        for (id, name) in [(10, "Wheat"), (11, "Blue Mountain Flower")] {
            catalog
                .insert_ingredient(
                    Ingredient::new(IngredientId::new(id), name)
                        .effect(EffectId::new(1), 0, 2.0)
                        .effect(EffectId::new(2), 300, 4.0),
                )
                .expect("valid ingredient");
        }

        let mut inventory = Inventory::new();
        inventory.add(IngredientId::new(10), 2);
        inventory.add(IngredientId::new(11), 1);

        let mut book = RecipeBook::new();
        let recipe = book
            .recipes(&catalog, &inventory)
            .first()
            .cloned()
            .expect("one recipe");
        // floor(10 * 2^1.1) + floor(5 * 30^1.1)
        assert_eq!(recipe.value, 21 + 210);

        let inventory = craft(&inventory, &recipe, CraftQuantity::Max).expect("craftable");
        assert_eq!(inventory.count(IngredientId::new(10)), 1);
        assert!(book.recipes(&catalog, &inventory).is_empty());
    }
}
