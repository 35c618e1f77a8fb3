//! Player damage and death bookkeeping.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use skirmish_common::{CollisionHandle, Facing};

use crate::events::{EventDispatcher, EventKind, GameEvent, Subscription};
use crate::weapon::Weapon;

/// Knockback applied to the player on every hit.
pub const REPULSE_FORCE: f32 = 5.0;

/// Camera shake requested on every hit: duration, strength, vibrato, randomness.
const HIT_SHAKE: (f32, f32, u32, f32) = (0.5, 0.3, 20, 5.0);

/// Persistent player stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    /// Character level
    pub level: u32,
    /// Hit points
    pub hp: i32,
    /// Armor class
    pub ac: i32,
    /// Experience points
    pub xp: u32,
    /// Weapon in hand
    pub equipped: Weapon,
    /// Weapon in the left slot
    pub left: Weapon,
    /// Weapon in the right slot
    pub right: Weapon,
}

/// A hit landing on the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Weapon that landed the hit
    pub weapon: Weapon,
    /// Side of the player the hit came from
    pub hit_side: Facing,
    /// Human readable source, e.g. "spikes" or an enemy name
    pub cause: String,
    /// Collider that delivered the hit
    pub collider: CollisionHandle,
}

/// Visual reaction to a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitReaction {
    /// Player survived; flash the sprite
    Flash,
    /// Player died
    Died,
}

/// What the host should do with the player after a hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Direction to push the player
    pub repulse: Facing,
    /// Push strength
    pub repulse_force: f32,
    /// Hit points left
    pub remaining_hp: i32,
    /// Visual reaction
    pub reaction: HitReaction,
}

/// Applies hits to the player and announces the results.
#[derive(Debug)]
pub struct PlayerManager {
    data: PlayerData,
    damage_modifier: i32,
    subscription: Option<Subscription>,
}

impl PlayerManager {
    /// Creates a manager for `data` with a damage modifier of 1.
    #[must_use]
    pub const fn new(data: PlayerData) -> Self {
        Self {
            data,
            damage_modifier: 1,
            subscription: None,
        }
    }

    /// Current player stats.
    #[must_use]
    pub const fn data(&self) -> &PlayerData {
        &self.data
    }

    /// Damage multiplier for the current difficulty.
    #[must_use]
    pub const fn damage_modifier(&self) -> i32 {
        self.damage_modifier
    }

    /// Whether the player has run out of hit points.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.data.hp <= 0
    }

    /// Starts listening for difficulty and drowning events.
    pub fn enable(&mut self, events: &mut EventDispatcher) {
        if self.subscription.is_none() {
            self.subscription = Some(events.subscribe(&[
                EventKind::SetDifficultyDamageModifier,
                EventKind::PlayerDrowned,
            ]));
        }
    }

    /// Stops listening.
    pub fn disable(&mut self, events: &mut EventDispatcher) {
        if let Some(subscription) = self.subscription.take() {
            events.unsubscribe(subscription.id());
        }
    }

    /// Announces the starting stats and loadout.
    pub fn init(&self, events: &mut EventDispatcher) {
        let data = &self.data;
        events.publish(&GameEvent::InitLevel(data.level));
        events.publish(&GameEvent::InitHp(data.hp));
        events.publish(&GameEvent::InitAc(data.ac));
        events.publish(&GameEvent::InitXp(data.xp));
        events.publish(&GameEvent::InitWeapons {
            equipped: data.equipped,
            left: data.left,
            right: data.right,
        });
    }

    /// Applies `hit` and broadcasts the consequences.
    pub fn takes_hit(&mut self, hit: &Hit, events: &mut EventDispatcher) -> HitOutcome {
        self.data.hp -= hit.weapon.damage * self.damage_modifier;

        let (duration, strength, vibrato, randomness) = HIT_SHAKE;
        events.publish(&GameEvent::ShakeCamera {
            duration,
            strength,
            vibrato,
            randomness,
        });
        events.publish(&GameEvent::ReduceHp(self.data.hp));

        let reaction = if self.data.hp > 0 {
            HitReaction::Flash
        } else {
            info!("Player killed by {} ({:?})", hit.cause, hit.collider);
            events.publish(&GameEvent::PlayerDead {
                cause: hit.cause.clone(),
                collider: hit.collider,
                hit_direction: hit.hit_side.as_i32(),
            });
            HitReaction::Died
        };

        HitOutcome {
            repulse: hit.hit_side.opposite(),
            repulse_force: REPULSE_FORCE,
            remaining_hp: self.data.hp,
            reaction,
        }
    }

    /// Handles pending events.
    pub fn update(&mut self) {
        let events = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();
        for event in &events {
            self.handle_event(event);
        }
    }

    /// Reacts to one event.
    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SetDifficultyDamageModifier(modifier) => {
                debug!("Damage modifier {} -> {modifier}", self.damage_modifier);
                self.damage_modifier = *modifier;
            },
            GameEvent::PlayerDrowned(collider) => {
                info!("Player drowned in {collider:?}");
            },
            _ => {},
        }
    }
}
