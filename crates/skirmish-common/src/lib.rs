//! # Skirmish Common
//!
//! Common types shared by the Skirmish gameplay crates:
//! - ID types (EntityId, CollisionHandle, SpriteId)
//! - Horizontal facing
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod facing;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::facing::*;
    pub use crate::ids::*;
}

pub use prelude::*;
