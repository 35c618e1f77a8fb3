//! Headless scene used by the sandbox host.
//!
//! Integrates velocities along the x axis, tracks edge volume overlaps and
//! reports trigger enter/exit contacts the way a physics engine would.

use ahash::{AHashMap, AHashSet};
use glam::Vec2;
use tracing::trace;

use skirmish_common::{CollisionHandle, EntityId, Facing};
use skirmish_gameplay::{ChildMessage, Scene, TriggerContact};

use crate::config::EdgeVolume;

/// A simulated body.
#[derive(Debug, Clone, Default)]
pub struct Body {
    /// World position
    pub position: Vec2,
    /// Linear velocity
    pub velocity: Vec2,
    /// Sprite facing
    pub facing: Facing,
}

/// Trigger transitions produced by one overlap pass.
#[derive(Debug, Default)]
pub struct Contacts {
    /// Volumes the body started overlapping
    pub entered: Vec<TriggerContact>,
    /// Volumes the body stopped overlapping
    pub exited: Vec<TriggerContact>,
}

#[derive(Debug)]
struct Volume {
    collider: CollisionHandle,
    bounds: EdgeVolume,
}

/// Minimal host scene.
#[derive(Debug, Default)]
pub struct SandboxScene {
    bodies: AHashMap<EntityId, Body>,
    names: AHashMap<String, EntityId>,
    volumes: Vec<Volume>,
    overlaps: AHashSet<(EntityId, usize)>,
    child_messages: usize,
    animations: AHashMap<EntityId, (String, f32)>,
}

impl SandboxScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named body at `x` on the ground line.
    pub fn spawn_body(&mut self, name: &str, x: f32) -> EntityId {
        let id = EntityId::new();
        self.bodies.insert(
            id,
            Body {
                position: Vec2::new(x, 0.0),
                ..Body::default()
            },
        );
        self.names.insert(name.to_string(), id);
        id
    }

    /// Adds an edge blocker volume.
    pub fn add_edge_volume(&mut self, bounds: EdgeVolume) -> CollisionHandle {
        let collider = CollisionHandle::new(EntityId::new());
        self.volumes.push(Volume { collider, bounds });
        collider
    }

    /// Gets a body.
    #[must_use]
    pub fn body(&self, entity: EntityId) -> Option<&Body> {
        self.bodies.get(&entity)
    }

    /// Moves every body by its velocity.
    pub fn integrate(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            body.position += body.velocity * dt;
        }
    }

    /// Updates overlaps of `entity` with the edge volumes and returns the
    /// transitions since the last call.
    pub fn update_contacts(&mut self, entity: EntityId) -> Contacts {
        let mut contacts = Contacts::default();
        let Some(x) = self.bodies.get(&entity).map(|body| body.position.x) else {
            return contacts;
        };

        for (index, volume) in self.volumes.iter().enumerate() {
            let contact = TriggerContact::edge_blocker(volume.collider, volume.bounds.edge);
            let inside = volume.bounds.contains(x);
            let was_inside = self.overlaps.contains(&(entity, index));

            if inside && !was_inside {
                self.overlaps.insert((entity, index));
                contacts.entered.push(contact);
            } else if !inside && was_inside {
                self.overlaps.remove(&(entity, index));
                contacts.exited.push(contact);
            }
        }
        contacts
    }

    /// Number of child messages broadcast so far.
    #[must_use]
    pub fn child_message_count(&self) -> usize {
        self.child_messages
    }

    /// Animation currently playing on `entity`.
    #[must_use]
    pub fn animation(&self, entity: EntityId) -> Option<&(String, f32)> {
        self.animations.get(&entity)
    }
}

impl Scene for SandboxScene {
    fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    fn position(&self, entity: EntityId) -> Option<Vec2> {
        self.bodies.get(&entity).map(|body| body.position)
    }

    fn set_position(&mut self, entity: EntityId, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.position = position;
        }
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.velocity = velocity;
        }
    }

    fn set_facing(&mut self, entity: EntityId, facing: Facing) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.facing = facing;
        }
    }

    fn broadcast_to_children(&mut self, entity: EntityId, message: ChildMessage) {
        trace!("{entity:?} -> children: {message:?}");
        self.child_messages += 1;
    }

    fn play_animation(&mut self, entity: EntityId, clip: &str, speed: f32) {
        self.animations.insert(entity, (clip.to_string(), speed));
    }
}
