//! ID types for effects, ingredients and recipes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for data revisions.
static REVISION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identity of one state of a mutable collection (catalog, inventory).
///
/// Every mutation takes a fresh revision, so two values with the same
/// revision always hold the same contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision(u64);

impl Revision {
    /// Allocates a new unique revision.
    #[must_use]
    pub fn next() -> Self {
        Self(REVISION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw revision value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::next()
    }
}

/// A form id as assigned by the game to every record.
///
/// Displayed as the four little-endian bytes of the id, each rendered as two
/// uppercase hex digits. This matches how the in-game log tooling prints ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(u32);

impl FormId {
    /// Creates a form id from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.to_le_bytes() {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// Unique identifier for a magic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(FormId);

impl EffectId {
    /// Creates an effect ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(FormId::new(id))
    }

    /// Returns the underlying form id.
    #[must_use]
    pub const fn form_id(self) -> FormId {
        self.0
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0.raw()
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(FormId);

impl IngredientId {
    /// Creates an ingredient ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(FormId::new(id))
    }

    /// Returns the underlying form id.
    #[must_use]
    pub const fn form_id(self) -> FormId {
        self.0
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0.raw()
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Key of a generated recipe.
///
/// Built from the raw decimal ingredient ids in enumeration order, joined by
/// [`RecipeId::SEPARATOR`]. Two recipes over the same ingredient set always
/// share a key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    /// Separator between ingredient ids.
    pub const SEPARATOR: char = '-';

    /// Builds a recipe key from ingredient ids.
    #[must_use]
    pub fn from_ingredients(ids: &[IngredientId]) -> Self {
        let key = ids
            .iter()
            .map(|id| id.raw().to_string())
            .collect::<Vec<_>>()
            .join(&Self::SEPARATOR.to_string());
        Self(key)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecipeId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for RecipeId {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}
