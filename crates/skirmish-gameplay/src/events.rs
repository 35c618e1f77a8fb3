//! Event dispatch between behaviours and the host.
//!
//! Behaviours subscribe to the [`EventKind`]s they care about and receive a
//! [`Subscription`] holding a private mailbox. Publishing clones the event into
//! every matching mailbox; subscribers drain their mailbox on their own tick.

use ahash::AHashMap;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use skirmish_common::CollisionHandle;

use crate::weapon::Weapon;

/// Default mailbox capacity per subscriber.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Events exchanged through the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player was killed
    PlayerDead {
        /// What killed the player
        cause: String,
        /// Collider that delivered the killing blow
        collider: CollisionHandle,
        /// Side the hit came from (-1 left, 1 right)
        hit_direction: i32,
    },
    /// The player drowned
    PlayerDrowned(CollisionHandle),
    /// Weapon equipped at level start
    InitEquippedWeapon(Weapon),
    /// Weapon swapped during play
    ChangeEquippedWeapon(Weapon),
    /// HUD should fade out
    FadeHud(bool),
    /// Screen resized, in pixels
    ScreenSizeChanged {
        /// New screen width
        width: f32,
        /// New screen height
        height: f32,
    },
    /// Initial player level
    InitLevel(u32),
    /// Initial player hit points
    InitHp(i32),
    /// Initial player armor class
    InitAc(i32),
    /// Initial player experience
    InitXp(u32),
    /// Initial weapon loadout
    InitWeapons {
        /// Weapon in hand
        equipped: Weapon,
        /// Weapon in the left slot
        left: Weapon,
        /// Weapon in the right slot
        right: Weapon,
    },
    /// Player hit points after taking damage
    ReduceHp(i32),
    /// Camera shake request
    ShakeCamera {
        /// Seconds
        duration: f32,
        /// Displacement strength
        strength: f32,
        /// Oscillation count
        vibrato: u32,
        /// Angle randomness in degrees
        randomness: f32,
    },
    /// Damage multiplier for the selected difficulty
    SetDifficultyDamageModifier(i32),
}

/// Discriminant of [`GameEvent`], used to filter subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// [`GameEvent::PlayerDead`]
    PlayerDead,
    /// [`GameEvent::PlayerDrowned`]
    PlayerDrowned,
    /// [`GameEvent::InitEquippedWeapon`]
    InitEquippedWeapon,
    /// [`GameEvent::ChangeEquippedWeapon`]
    ChangeEquippedWeapon,
    /// [`GameEvent::FadeHud`]
    FadeHud,
    /// [`GameEvent::ScreenSizeChanged`]
    ScreenSizeChanged,
    /// [`GameEvent::InitLevel`]
    InitLevel,
    /// [`GameEvent::InitHp`]
    InitHp,
    /// [`GameEvent::InitAc`]
    InitAc,
    /// [`GameEvent::InitXp`]
    InitXp,
    /// [`GameEvent::InitWeapons`]
    InitWeapons,
    /// [`GameEvent::ReduceHp`]
    ReduceHp,
    /// [`GameEvent::ShakeCamera`]
    ShakeCamera,
    /// [`GameEvent::SetDifficultyDamageModifier`]
    SetDifficultyDamageModifier,
}

impl EventKind {
    /// Message name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PlayerDead => "player dead",
            Self::PlayerDrowned => "player drowned",
            Self::InitEquippedWeapon => "init equipped weapon",
            Self::ChangeEquippedWeapon => "change equipped weapon",
            Self::FadeHud => "fade hud",
            Self::ScreenSizeChanged => "screen size changed",
            Self::InitLevel => "init lvl",
            Self::InitHp => "init hp",
            Self::InitAc => "init ac",
            Self::InitXp => "init xp",
            Self::InitWeapons => "init weapons",
            Self::ReduceHp => "reduce hp",
            Self::ShakeCamera => "shake camera",
            Self::SetDifficultyDamageModifier => "set difficulty damage modifier",
        }
    }
}

impl GameEvent {
    /// Returns the event's kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::PlayerDead { .. } => EventKind::PlayerDead,
            Self::PlayerDrowned(_) => EventKind::PlayerDrowned,
            Self::InitEquippedWeapon(_) => EventKind::InitEquippedWeapon,
            Self::ChangeEquippedWeapon(_) => EventKind::ChangeEquippedWeapon,
            Self::FadeHud(_) => EventKind::FadeHud,
            Self::ScreenSizeChanged { .. } => EventKind::ScreenSizeChanged,
            Self::InitLevel(_) => EventKind::InitLevel,
            Self::InitHp(_) => EventKind::InitHp,
            Self::InitAc(_) => EventKind::InitAc,
            Self::InitXp(_) => EventKind::InitXp,
            Self::InitWeapons { .. } => EventKind::InitWeapons,
            Self::ReduceHp(_) => EventKind::ReduceHp,
            Self::ShakeCamera { .. } => EventKind::ShakeCamera,
            Self::SetDifficultyDamageModifier(_) => EventKind::SetDifficultyDamageModifier,
        }
    }
}

/// Identifier of a registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A subscriber's end of the dispatcher.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: Receiver<GameEvent>,
}

impl Subscription {
    /// Subscription identifier, used to unsubscribe.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Takes the next pending event, if any.
    #[must_use]
    pub fn try_next(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drains all pending events.
    #[must_use]
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

#[derive(Debug)]
struct Subscriber {
    kinds: Vec<EventKind>,
    sender: Sender<GameEvent>,
}

/// Host-owned observer registry.
#[derive(Debug)]
pub struct EventDispatcher {
    subscribers: AHashMap<SubscriptionId, Subscriber>,
    next_id: u64,
    mailbox_capacity: usize,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MAILBOX_CAPACITY)
    }
}

impl EventDispatcher {
    /// Creates a dispatcher whose mailboxes hold `mailbox_capacity` events.
    #[must_use]
    pub fn new(mailbox_capacity: usize) -> Self {
        Self {
            subscribers: AHashMap::new(),
            next_id: 1,
            mailbox_capacity: mailbox_capacity.max(1),
        }
    }

    /// Registers interest in `kinds`.
    pub fn subscribe(&mut self, kinds: &[EventKind]) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = bounded(self.mailbox_capacity);
        self.subscribers.insert(
            id,
            Subscriber {
                kinds: kinds.to_vec(),
                sender,
            },
        );
        debug!("Subscription {id:?} registered for {kinds:?}");

        Subscription { id, receiver }
    }

    /// Removes a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Delivers `event` to every matching subscriber.
    ///
    /// Subscribers whose [`Subscription`] was dropped are pruned. Returns the
    /// number of mailboxes that accepted the event.
    pub fn publish(&mut self, event: &GameEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        let mut disconnected = Vec::new();

        for (id, subscriber) in &self.subscribers {
            if !subscriber.kinds.contains(&kind) {
                continue;
            }
            match subscriber.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("Mailbox {id:?} full, dropped \"{}\"", kind.name());
                },
                Err(TrySendError::Disconnected(_)) => disconnected.push(*id),
            }
        }

        for id in disconnected {
            debug!("Pruning dropped subscription {id:?}");
            self.subscribers.remove(&id);
        }

        delivered
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
