//! Inventory of owned ingredients.

use alchemy_common::{IngredientId, Revision};
use std::collections::BTreeMap;
use thiserror::Error;

/// Inventory error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Not enough items
    #[error("Not enough of ingredient {ingredient}: need {needed}, have {have}")]
    NotEnough {
        /// Ingredient requested
        ingredient: IngredientId,
        /// Amount needed
        needed: u32,
        /// Amount available
        have: u32,
    },
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// One owned ingredient stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    /// Ingredient owned
    pub ingredient: IngredientId,
    /// Quantity owned, always positive
    pub count: u32,
}

/// Owned ingredient counts.
///
/// Entries are kept in ascending id order, which is the snapshot order recipe
/// generation enumerates. A count of zero is never stored.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    items: BTreeMap<IngredientId, u32>,
    revision: Revision,
}

impl PartialEq for Inventory {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Inventory {}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current revision. Changes on every mutation.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the number of distinct ingredients owned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the count of a specific ingredient.
    #[must_use]
    pub fn count(&self, ingredient: IngredientId) -> u32 {
        self.items.get(&ingredient).copied().unwrap_or(0)
    }

    /// Checks if the inventory contains at least the given amount.
    #[must_use]
    pub fn has(&self, ingredient: IngredientId, amount: u32) -> bool {
        self.count(ingredient) >= amount
    }

    /// Sets the owned count. Zero removes the entry.
    pub fn set(&mut self, ingredient: IngredientId, count: u32) {
        if count == 0 {
            self.items.remove(&ingredient);
        } else {
            self.items.insert(ingredient, count);
        }
        self.revision = Revision::next();
    }

    /// Adds ingredients to the inventory.
    pub fn add(&mut self, ingredient: IngredientId, amount: u32) {
        let current = self.count(ingredient);
        self.set(ingredient, current.saturating_add(amount));
    }

    /// Removes ingredients from the inventory.
    pub fn remove(&mut self, ingredient: IngredientId, amount: u32) -> InventoryResult<()> {
        let current = self.count(ingredient);
        if current < amount {
            return Err(InventoryError::NotEnough {
                ingredient,
                needed: amount,
                have: current,
            });
        }
        self.set(ingredient, current - amount);
        Ok(())
    }

    /// Returns an iterator over all owned stacks in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.items.iter().map(|(&ingredient, &count)| Item { ingredient, count })
    }
}

impl FromIterator<(IngredientId, u32)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (IngredientId, u32)>>(iter: T) -> Self {
        let mut inventory = Self::new();
        for (ingredient, count) in iter {
            inventory.set(ingredient, count);
        }
        inventory
    }
}
