//! In-memory scene used by unit tests.

use ahash::AHashMap;
use glam::Vec2;

use skirmish_common::{EntityId, Facing};

use crate::host::{ChildMessage, Scene};

#[derive(Debug, Clone, Default)]
pub struct MockBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Option<Facing>,
    pub velocity_writes: usize,
    pub facing_writes: usize,
    pub position_writes: usize,
}

#[derive(Debug, Default)]
pub struct MockScene {
    pub bodies: AHashMap<EntityId, MockBody>,
    pub names: AHashMap<String, EntityId>,
    pub child_messages: Vec<(EntityId, ChildMessage)>,
    pub animations: Vec<(EntityId, String, f32)>,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, x: f32) -> EntityId {
        let id = EntityId::new();
        self.bodies.insert(
            id,
            MockBody {
                position: Vec2::new(x, 0.0),
                ..MockBody::default()
            },
        );
        self.names.insert(name.to_string(), id);
        id
    }

    pub fn body(&self, entity: EntityId) -> &MockBody {
        self.bodies.get(&entity).expect("body exists")
    }

    pub fn set_x(&mut self, entity: EntityId, x: f32) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.position.x = x;
        }
    }

    /// Total writes that changed motion or orientation.
    pub fn mutation_count(&self, entity: EntityId) -> usize {
        let body = self.body(entity);
        body.velocity_writes + body.facing_writes + body.position_writes
    }
}

impl Scene for MockScene {
    fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    fn position(&self, entity: EntityId) -> Option<Vec2> {
        self.bodies.get(&entity).map(|body| body.position)
    }

    fn set_position(&mut self, entity: EntityId, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.position = position;
            body.position_writes += 1;
        }
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.velocity = velocity;
            body.velocity_writes += 1;
        }
    }

    fn set_facing(&mut self, entity: EntityId, facing: Facing) {
        if let Some(body) = self.bodies.get_mut(&entity) {
            body.facing = Some(facing);
            body.facing_writes += 1;
        }
    }

    fn broadcast_to_children(&mut self, entity: EntityId, message: ChildMessage) {
        self.child_messages.push((entity, message));
    }

    fn play_animation(&mut self, entity: EntityId, clip: &str, speed: f32) {
        self.animations.push((entity, clip.to_string(), speed));
    }
}
