//! # Skirmish Gameplay
//!
//! Gameplay behaviours for a 2D side-scrolling action game.
//!
//! This crate holds the per-object logic the host engine drives each frame:
//! - Enemy movement AI (sentinels, scouts, hesitant scouts)
//! - Keyed timer scheduler
//! - Event dispatcher for game-wide notifications
//! - HUD weapon display
//! - Player damage and death bookkeeping
//! - Host seams (`Scene`, `Behaviour`) and authoring config

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod events;
pub mod host;
pub mod hud;
pub mod movement_ai;
pub mod player;
pub mod scheduler;
pub mod weapon;

#[cfg(test)]
mod test_support;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::events::*;
    pub use crate::host::*;
    pub use crate::hud::*;
    pub use crate::movement_ai::*;
    pub use crate::player::*;
    pub use crate::scheduler::*;
    pub use crate::weapon::*;
}

pub use prelude::*;
