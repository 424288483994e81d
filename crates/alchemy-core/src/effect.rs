//! Magic effect definitions and their applications on ingredients.

use alchemy_common::EffectId;
use serde::{Deserialize, Serialize};

/// A magic effect as defined by the game.
///
/// Effects are immutable once loaded into a [`Catalog`](crate::catalog::Catalog);
/// ingredients refer to them by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Stable identifier (the game's form id).
    pub id: EffectId,
    /// Display name.
    pub name: String,
    /// Base value per unit of potency.
    pub base_cost: f64,
    /// Whether duration contributes to potency.
    pub with_duration: bool,
    /// Whether magnitude contributes to potency.
    pub with_magnitude: bool,
    /// Power variant amplifying duration.
    pub power_affects_duration: bool,
    /// Power variant amplifying magnitude.
    pub power_affects_magnitude: bool,
}

impl Effect {
    /// Creates a flat effect: potency ignores both duration and magnitude.
    #[must_use]
    pub fn new(id: EffectId, name: impl Into<String>, base_cost: f64) -> Self {
        Self {
            id,
            name: name.into(),
            base_cost,
            with_duration: false,
            with_magnitude: false,
            power_affects_duration: false,
            power_affects_magnitude: false,
        }
    }

    /// Makes potency scale with duration.
    #[must_use]
    pub const fn with_duration(mut self) -> Self {
        self.with_duration = true;
        self
    }

    /// Makes potency scale with magnitude.
    #[must_use]
    pub const fn with_magnitude(mut self) -> Self {
        self.with_magnitude = true;
        self
    }

    /// Marks this effect as a power variant along duration.
    #[must_use]
    pub const fn power_duration(mut self) -> Self {
        self.power_affects_duration = true;
        self
    }

    /// Marks this effect as a power variant along magnitude.
    #[must_use]
    pub const fn power_magnitude(mut self) -> Self {
        self.power_affects_magnitude = true;
        self
    }
}

/// One effect carried by an ingredient, with its applied strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEffect {
    /// Referenced effect.
    pub effect: EffectId,
    /// Applied duration in seconds.
    pub duration: i32,
    /// Applied magnitude.
    pub magnitude: f64,
}

impl IngredientEffect {
    /// Creates an applied effect.
    #[must_use]
    pub const fn new(effect: EffectId, duration: i32, magnitude: f64) -> Self {
        Self {
            effect,
            duration,
            magnitude,
        }
    }
}

/// An [`IngredientEffect`] resolved against its effect definition.
#[derive(Debug, Clone, Copy)]
pub struct AppliedEffect<'a> {
    /// Resolved definition.
    pub effect: &'a Effect,
    /// Applied duration in seconds.
    pub duration: i32,
    /// Applied magnitude.
    pub magnitude: f64,
}

impl<'a> AppliedEffect<'a> {
    /// Pairs an effect definition with applied values.
    #[must_use]
    pub const fn new(effect: &'a Effect, duration: i32, magnitude: f64) -> Self {
        Self {
            effect,
            duration,
            magnitude,
        }
    }
}
