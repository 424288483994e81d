//! Potion valuation.
//!
//! Every applied effect is worth `floor(base_cost * (magnitude * duration) ^ 1.1)`
//! gold, where the magnitude and duration factors fall back to 1 for effects
//! that ignore them. A potion is worth the plain sum of its effects.

use crate::effect::AppliedEffect;

/// Amplification applied to the potency axis of a power effect.
pub const POWER_MULTIPLIER: f64 = 6.0;

/// Exponent of the potency curve.
pub const VALUE_EXPONENT: f64 = 1.1;

/// Duration units per potency unit.
const DURATION_SCALE: f64 = 10.0;

fn magnitude_factor(applied: &AppliedEffect<'_>) -> f64 {
    let effect = applied.effect;
    if !effect.with_magnitude || applied.magnitude <= 0.0 {
        return 1.0;
    }
    if effect.power_affects_magnitude {
        (applied.magnitude * POWER_MULTIPLIER).round()
    } else {
        applied.magnitude
    }
}

fn duration_factor(applied: &AppliedEffect<'_>) -> f64 {
    let effect = applied.effect;
    if !effect.with_duration || applied.duration <= 0 {
        return 1.0;
    }
    let duration = f64::from(applied.duration) / DURATION_SCALE;
    if effect.power_affects_duration {
        (duration * POWER_MULTIPLIER).round()
    } else {
        duration
    }
}

/// Value of a single applied effect in gold.
#[must_use]
pub fn value_of_applied_effect(applied: &AppliedEffect<'_>) -> u64 {
    let potency = magnitude_factor(applied) * duration_factor(applied);
    let value = (applied.effect.base_cost * potency.powf(VALUE_EXPONENT)).floor();
    // Saturating float-to-int conversion; NaN maps to 0.
    value as u64
}

/// Value of a potion made of the given effects.
pub fn value_of_potion<'a, I>(effects: I) -> u64
where
    I: IntoIterator<Item = AppliedEffect<'a>>,
{
    effects
        .into_iter()
        .map(|applied| value_of_applied_effect(&applied))
        .fold(0, u64::saturating_add)
}
