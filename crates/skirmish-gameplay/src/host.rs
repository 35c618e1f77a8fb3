//! Host engine interface.
//!
//! The host owns rendering, physics and the object lifecycle. Behaviours only
//! see it through two seams:
//! - [`Scene`]: position/velocity primitives and messaging for scene objects
//! - [`Behaviour`]: lifecycle callbacks the host loop invokes

use glam::Vec2;
use serde::{Deserialize, Serialize};

use skirmish_common::{CollisionHandle, EntityId, Facing};

use crate::events::EventDispatcher;

/// Lateral movement limit marked by a boundary trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    /// Limit on the left side of a platform
    Left,
    /// Limit on the right side of a platform
    Right,
}

impl Edge {
    /// Walking direction that runs into this edge.
    #[must_use]
    pub const fn blocks(self) -> Facing {
        match self {
            Self::Left => Facing::Left,
            Self::Right => Facing::Right,
        }
    }
}

/// Physics layer of a trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Layer {
    /// Ordinary geometry
    #[default]
    Default,
    /// Edge blocker volumes
    EdgeBlocker,
    /// Water volumes
    Water,
    /// Hit boxes of weapons and projectiles
    Weapon,
}

/// A trigger overlap reported by the host physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerContact {
    /// Collider that was touched
    pub collider: CollisionHandle,
    /// Layer of that collider
    pub layer: Layer,
    /// Edge tag, present on edge blockers
    pub edge: Option<Edge>,
}

impl TriggerContact {
    /// Contact with an edge blocker volume.
    #[must_use]
    pub const fn edge_blocker(collider: CollisionHandle, edge: Edge) -> Self {
        Self {
            collider,
            layer: Layer::EdgeBlocker,
            edge: Some(edge),
        }
    }

    /// Edge this contact represents, if it is a tagged edge blocker.
    #[must_use]
    pub const fn blocker_edge(&self) -> Option<Edge> {
        match (self.layer, self.edge) {
            (Layer::EdgeBlocker, Some(edge)) => Some(edge),
            _ => None,
        }
    }
}

/// Message sent from a behaviour to the sub-components of its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildMessage {
    /// Left edge blocked state changed
    SetBlockedLeftState(bool),
    /// Right edge blocked state changed
    SetBlockedRightState(bool),
}

impl ChildMessage {
    /// Message announcing a blocked-state change for `edge`.
    #[must_use]
    pub const fn blocked(edge: Edge, blocked: bool) -> Self {
        match edge {
            Edge::Left => Self::SetBlockedLeftState(blocked),
            Edge::Right => Self::SetBlockedRightState(blocked),
        }
    }
}

/// Scene access provided by the host.
pub trait Scene {
    /// Looks up a scene object by name.
    fn find_by_name(&self, name: &str) -> Option<EntityId>;
    /// Gets an object's position.
    fn position(&self, entity: EntityId) -> Option<Vec2>;
    /// Teleports an object.
    fn set_position(&mut self, entity: EntityId, position: Vec2);
    /// Sets an object's linear velocity.
    fn set_velocity(&mut self, entity: EntityId, velocity: Vec2);
    /// Flips an object's sprite to face `facing`.
    fn set_facing(&mut self, entity: EntityId, facing: Facing);
    /// Sends a fire-and-forget message to an object's sub-components.
    fn broadcast_to_children(&mut self, entity: EntityId, message: ChildMessage);

    /// Unit vector of an object's local right axis.
    fn forward(&self, _entity: EntityId) -> Vec2 {
        Vec2::X
    }

    /// Starts a looping animation clip.
    fn play_animation(&mut self, _entity: EntityId, _clip: &str, _speed: f32) {}
}

/// Lifecycle callbacks invoked by the host loop.
pub trait Behaviour {
    /// The object became visible for the first time (or again after deactivation).
    fn on_become_active(&mut self, scene: &mut dyn Scene, events: &mut EventDispatcher);
    /// Per-frame update.
    fn on_tick(&mut self, dt: f32, scene: &mut dyn Scene);
    /// The object entered a boundary edge volume.
    fn on_boundary_enter(&mut self, edge: Edge, scene: &mut dyn Scene);
    /// The object left a boundary edge volume.
    fn on_boundary_exit(&mut self, edge: Edge, scene: &mut dyn Scene);
    /// The object was disabled or is being destroyed.
    fn on_deactivate(&mut self, events: &mut EventDispatcher);

    /// Routes a raw trigger-enter contact. Only tagged edge blockers matter.
    fn on_trigger_enter(&mut self, contact: &TriggerContact, scene: &mut dyn Scene) {
        if let Some(edge) = contact.blocker_edge() {
            self.on_boundary_enter(edge, scene);
        }
    }

    /// Routes a raw trigger-exit contact. Only tagged edge blockers matter.
    fn on_trigger_exit(&mut self, contact: &TriggerContact, scene: &mut dyn Scene) {
        if let Some(edge) = contact.blocker_edge() {
            self.on_boundary_exit(edge, scene);
        }
    }
}
