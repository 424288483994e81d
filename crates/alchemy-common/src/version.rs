//! Schema versions tagged onto stored JSON collections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout version of a stored collection.
///
/// Only the major component gates loading; minor and patch bumps mark
/// additive changes that older readers tolerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Bumped when a stored field changes meaning or is removed
    pub major: u16,
    /// Bumped when optional fields are added
    pub minor: u16,
    /// Bumped for fixes that keep the layout
    pub patch: u16,
}

impl SchemaVersion {
    /// Effect definitions (`effects.json`).
    pub const EFFECTS: Self = Self::new(1, 0, 0);

    /// Ingredient definitions (`ingredients.json`).
    pub const INGREDIENTS: Self = Self::new(1, 0, 0);

    /// Owned ingredient counts (`inventory.json`).
    pub const INVENTORY: Self = Self::new(1, 0, 0);

    /// Builds a version from its components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Whether a reader at this version understands a file written at `stored`.
    #[must_use]
    pub const fn can_read(&self, stored: &Self) -> bool {
        self.major == stored.major
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}
