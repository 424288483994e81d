//! Ingredient definitions.

use alchemy_common::{EffectId, IngredientId};
use serde::{Deserialize, Serialize};

use crate::effect::IngredientEffect;

/// Maximum number of effects an ingredient can carry.
pub const MAX_INGREDIENT_EFFECTS: usize = 4;

/// An alchemy ingredient with up to four effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Stable identifier (the game's form id).
    pub id: IngredientId,
    /// Display name.
    pub name: String,
    /// Effects in the order the game lists them.
    pub effects: Vec<IngredientEffect>,
}

impl Ingredient {
    /// Creates an ingredient without effects.
    #[must_use]
    pub fn new(id: IngredientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            effects: Vec::new(),
        }
    }

    /// Appends an effect.
    #[must_use]
    pub fn effect(mut self, effect: EffectId, duration: i32, magnitude: f64) -> Self {
        self.effects
            .push(IngredientEffect::new(effect, duration, magnitude));
        self
    }

    /// Checks whether one of this ingredient's effects is `effect`.
    #[must_use]
    pub fn has_effect(&self, effect: EffectId) -> bool {
        self.effects.iter().any(|e| e.effect == effect)
    }

    /// Returns the ids of all carried effects.
    pub fn effect_ids(&self) -> impl Iterator<Item = EffectId> + '_ {
        self.effects.iter().map(|e| e.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_lookup() {
        let ingredient = Ingredient::new(IngredientId::new(1), "Blue Mountain Flower")
            .effect(EffectId::new(10), 0, 4.0)
            .effect(EffectId::new(20), 60, 1.0);

        assert!(ingredient.has_effect(EffectId::new(20)));
        assert!(!ingredient.has_effect(EffectId::new(30)));
        assert_eq!(
            ingredient.effect_ids().collect::<Vec<_>>(),
            vec![EffectId::new(10), EffectId::new(20)]
        );
    }
}
