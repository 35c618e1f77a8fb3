//! Weapon references exchanged between the player and the HUD.

use serde::{Deserialize, Serialize};
use skirmish_common::{EntityId, SpriteId};

/// A weapon object as seen by gameplay glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    /// Scene object carrying the weapon
    pub entity: EntityId,
    /// Sprite shown for the weapon
    pub sprite: SpriteId,
    /// Base damage dealt per hit
    pub damage: i32,
}

impl Weapon {
    /// Creates a weapon reference.
    #[must_use]
    pub const fn new(entity: EntityId, sprite: SpriteId, damage: i32) -> Self {
        Self {
            entity,
            sprite,
            damage,
        }
    }
}
