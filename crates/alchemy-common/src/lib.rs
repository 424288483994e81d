//! # Alchemy Common
//!
//! Shared types for the alchemy helper crates:
//! - ID types (form ids, effect/ingredient ids, recipe keys)
//! - Version information for stored data
//! - Common error types
//! - A prelude re-exporting all of the above

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Everything above, for glob imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
