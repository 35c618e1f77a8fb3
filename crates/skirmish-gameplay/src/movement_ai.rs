//! Enemy movement AI.
//!
//! A [`MovementAi`] watches a single target (the player) and, depending on its
//! [`MovementStyle`], turns to face it, walks towards it, hesitates, and stops
//! at platform edges marked by boundary triggers.
//!
//! The agent is dormant until the host reports it visible. Activation arms up
//! to two repeating timers:
//! - look: turn towards the target
//! - follow: walk towards the target (Scout styles only)
//!
//! Every frame, before timers fire, moving styles run the edge check which
//! decides the `paused` flag. Follow steps only read it.

use fastrand::Rng;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use skirmish_common::{EntityId, Facing, SpawnError};

use crate::config::{MovementConfig, MovementStyle};
use crate::events::{EventDispatcher, EventKind, GameEvent, Subscription};
use crate::host::{Behaviour, ChildMessage, Edge, Scene};
use crate::scheduler::Scheduler;

/// Timers owned by a movement agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementTimer {
    /// Turn towards the target
    Look,
    /// Walk towards the target
    Follow,
    /// End of a hesitation pause
    ResumeFollow,
}

/// Whether an agent is running its behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgentLifecycle {
    /// Spawned but not yet visible, or deactivated
    #[default]
    Dormant,
    /// Timers armed and listening for events
    Active,
}

/// Read-only view of an agent for debugging and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Scene object driven by the agent
    pub entity: EntityId,
    /// Agent name
    pub name: String,
    /// Behaviour profile
    pub style: MovementStyle,
    /// Lifecycle state
    pub lifecycle: AgentLifecycle,
    /// Whether walking is currently suppressed
    pub paused: bool,
    /// Last computed walking direction
    pub walking_direction: Facing,
    /// Standing in a left edge volume
    pub blocked_left: bool,
    /// Standing in a right edge volume
    pub blocked_right: bool,
    /// X position recorded when the last edge was entered
    pub blocked_at: f32,
    /// Current alignment distance
    pub x_axis_offset: f32,
    /// Seconds between follow steps
    pub move_interval: f32,
    /// Hesitation pauses started so far
    pub pause_count: u32,
}

/// Movement and perception state machine for one enemy.
#[derive(Debug)]
pub struct MovementAi {
    entity: EntityId,
    config: MovementConfig,
    target: EntityId,
    lifecycle: AgentLifecycle,
    move_interval: f32,
    x_axis_offset: f32,
    hesitant: bool,
    paused: bool,
    walking_direction: Facing,
    blocked_left: bool,
    blocked_right: bool,
    blocked_at: f32,
    pause_count: u32,
    timers: Scheduler<MovementTimer>,
    rng: Rng,
    subscription: Option<Subscription>,
}

impl MovementAi {
    /// Spawns an agent for `entity`, seeded from the thread-local RNG.
    pub fn spawn(
        entity: EntityId,
        config: MovementConfig,
        scene: &mut dyn Scene,
    ) -> Result<Self, SpawnError> {
        Self::spawn_with_rng(entity, config, scene, Rng::new())
    }

    /// Spawns an agent with a deterministic RNG seed.
    pub fn spawn_seeded(
        entity: EntityId,
        config: MovementConfig,
        scene: &mut dyn Scene,
        seed: u64,
    ) -> Result<Self, SpawnError> {
        Self::spawn_with_rng(entity, config, scene, Rng::with_seed(seed))
    }

    fn spawn_with_rng(
        entity: EntityId,
        config: MovementConfig,
        scene: &mut dyn Scene,
        mut rng: Rng,
    ) -> Result<Self, SpawnError> {
        config.validate()?;

        let target = scene
            .find_by_name(&config.target_name)
            .ok_or_else(|| SpawnError::TargetNotFound(config.target_name.clone()))?;
        if scene.position(entity).is_none() {
            return Err(SpawnError::MissingBody(entity));
        }

        scene.play_animation(entity, &config.walk_clip(), config.walk_animation_speed);

        let move_interval = random_in(&mut rng, config.move_interval_range);
        debug!(
            "Spawned {:?} ({:?}) tracking {target:?}, move interval {move_interval:.2}s",
            config.name, config.style
        );

        Ok(Self {
            entity,
            target,
            lifecycle: AgentLifecycle::Dormant,
            move_interval,
            x_axis_offset: config.x_axis_offset,
            hesitant: config.style.is_hesitant(),
            paused: false,
            walking_direction: Facing::default(),
            blocked_left: false,
            blocked_right: false,
            blocked_at: 0.0,
            pause_count: 0,
            timers: Scheduler::new(),
            rng,
            subscription: None,
            config,
        })
    }

    /// Scene object driven by this agent.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Tracked target.
    #[must_use]
    pub fn target(&self) -> EntityId {
        self.target
    }

    /// Behaviour profile.
    #[must_use]
    pub fn style(&self) -> MovementStyle {
        self.config.style
    }

    /// Configuration the agent was spawned with.
    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Whether the agent is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle == AgentLifecycle::Active
    }

    /// Whether walking is suppressed by an edge or by alignment.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Last computed walking direction.
    #[must_use]
    pub fn walking_direction(&self) -> Facing {
        self.walking_direction
    }

    /// Standing in a left edge volume.
    #[must_use]
    pub fn is_blocked_left(&self) -> bool {
        self.blocked_left
    }

    /// Standing in a right edge volume.
    #[must_use]
    pub fn is_blocked_right(&self) -> bool {
        self.blocked_right
    }

    /// X position recorded on the last edge entry.
    #[must_use]
    pub fn blocked_at(&self) -> f32 {
        self.blocked_at
    }

    /// Current alignment distance.
    #[must_use]
    pub fn x_axis_offset(&self) -> f32 {
        self.x_axis_offset
    }

    /// Seconds between follow steps, drawn at spawn.
    #[must_use]
    pub fn move_interval(&self) -> f32 {
        self.move_interval
    }

    /// Pending timers.
    #[must_use]
    pub fn timers(&self) -> &Scheduler<MovementTimer> {
        &self.timers
    }

    /// Whether a hesitation pause is waiting to resume.
    #[must_use]
    pub fn is_hesitating(&self) -> bool {
        self.timers.is_scheduled(MovementTimer::ResumeFollow)
    }

    /// Captures the agent state.
    #[must_use]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            entity: self.entity,
            name: self.config.name.clone(),
            style: self.config.style,
            lifecycle: self.lifecycle,
            paused: self.paused,
            walking_direction: self.walking_direction,
            blocked_left: self.blocked_left,
            blocked_right: self.blocked_right,
            blocked_at: self.blocked_at,
            x_axis_offset: self.x_axis_offset,
            move_interval: self.move_interval,
            pause_count: self.pause_count,
        }
    }

    /// Reacts to a dispatched event.
    pub fn handle_event(&mut self, event: &GameEvent) {
        if let GameEvent::PlayerDead {
            cause,
            hit_direction,
            ..
        } = event
        {
            self.on_player_dead(cause, Facing::from_i32(*hit_direction));
        }
    }

    /// Tightens the alignment distance so the agent idles over the body.
    pub fn on_player_dead(&mut self, cause: &str, hit_side: Facing) {
        self.x_axis_offset = self.config.victory_x_axis_offset;
        info!(
            "{:?} saw the player die ({cause}, hit from {hit_side:?}), alignment now {}",
            self.config.name, self.x_axis_offset
        );
    }

    fn process_events(&mut self) {
        let events = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();
        for event in &events {
            self.handle_event(event);
        }
    }

    /// Positions of the agent and its target.
    fn positions(&self, scene: &dyn Scene) -> Option<(Vec2, Vec2)> {
        let own = scene.position(self.entity)?;
        let target = scene.position(self.target);
        if target.is_none() {
            trace!("Target {:?} has no position, skipping step", self.target);
        }
        Some((own, target?))
    }

    fn look_at_target(&self, scene: &mut dyn Scene) {
        if let Some((own, target)) = self.positions(scene) {
            scene.set_facing(self.entity, Facing::toward(own.x, target.x));
        }
    }

    fn follow_target(&mut self, scene: &mut dyn Scene) {
        let Some((own, target)) = self.positions(scene) else {
            return;
        };
        self.walking_direction = Facing::toward(own.x, target.x);

        if self.paused {
            return;
        }

        let velocity =
            scene.forward(self.entity) * self.config.movement_speed * self.walking_direction.sign();
        scene.set_velocity(self.entity, velocity);
        scene.set_facing(self.entity, self.walking_direction);

        if self.hesitant && self.rng.f32() * 100.0 <= self.config.chance_of_pause {
            scene.set_velocity(self.entity, Vec2::ZERO);
            self.begin_hesitation();
        }
    }

    fn begin_hesitation(&mut self) {
        self.timers.cancel_key(MovementTimer::Follow);
        let wait = random_in(&mut self.rng, self.config.pause_duration_range);
        self.timers.schedule_once(MovementTimer::ResumeFollow, wait);
        self.pause_count += 1;
        debug!("{:?} hesitating for {wait:.2}s", self.config.name);
    }

    fn resume_follow(&mut self) {
        self.timers.schedule_repeating(
            MovementTimer::Follow,
            self.config.first_fire_delay,
            self.move_interval,
        );
        trace!("{:?} resumed following", self.config.name);
    }

    /// Edge and alignment check. Decides `paused` for this frame.
    fn stop_check(&mut self, scene: &mut dyn Scene) {
        let Some((own, target)) = self.positions(scene) else {
            return;
        };
        self.walking_direction = Facing::toward(own.x, target.x);

        let was_paused = self.paused;
        let into_blocked_edge = [(Edge::Right, self.blocked_right), (Edge::Left, self.blocked_left)]
            .into_iter()
            .any(|(edge, blocked)| blocked && edge.blocks() == self.walking_direction);

        if into_blocked_edge {
            scene.set_position(self.entity, Vec2::new(self.blocked_at, own.y));
            self.paused = true;
        } else if (own.x - target.x).abs() <= self.x_axis_offset {
            scene.set_velocity(self.entity, Vec2::ZERO);
            self.paused = true;
        } else {
            self.paused = false;
        }

        if was_paused != self.paused {
            trace!("{:?} paused: {}", self.config.name, self.paused);
        }
    }

    fn arm_timers(&mut self) {
        let delay = self.config.first_fire_delay;
        if self.config.style.looks() {
            self.timers
                .schedule_repeating(MovementTimer::Look, delay, self.config.look_interval);
        }
        if self.config.style.moves() {
            self.timers
                .schedule_repeating(MovementTimer::Follow, delay, self.move_interval);
        }
    }
}

impl Behaviour for MovementAi {
    fn on_become_active(&mut self, _scene: &mut dyn Scene, events: &mut EventDispatcher) {
        if self.is_active() {
            trace!("{:?} already active", self.config.name);
            return;
        }

        self.lifecycle = AgentLifecycle::Active;
        self.subscription = Some(events.subscribe(&[EventKind::PlayerDead]));
        self.arm_timers();
        debug!(
            "{:?} activated as {:?} with {} timer(s)",
            self.config.name,
            self.config.style,
            self.timers.len()
        );
    }

    fn on_tick(&mut self, dt: f32, scene: &mut dyn Scene) {
        if !self.is_active() {
            return;
        }

        self.process_events();

        if self.config.style.moves() {
            self.stop_check(scene);
        }

        self.timers.advance(dt);
        while let Some(timer) = self.timers.pop_due() {
            match timer {
                MovementTimer::Look => self.look_at_target(scene),
                MovementTimer::Follow => self.follow_target(scene),
                MovementTimer::ResumeFollow => self.resume_follow(),
            }
        }
    }

    fn on_boundary_enter(&mut self, edge: Edge, scene: &mut dyn Scene) {
        match edge {
            Edge::Right => self.blocked_right = true,
            Edge::Left => self.blocked_left = true,
        }
        scene.broadcast_to_children(self.entity, ChildMessage::blocked(edge, true));

        if let Some(position) = scene.position(self.entity) {
            self.blocked_at = position.x;
        }
        debug!("{:?} blocked by {edge:?} edge at x={}", self.config.name, self.blocked_at);
    }

    fn on_boundary_exit(&mut self, edge: Edge, scene: &mut dyn Scene) {
        let was_blocked = match edge {
            Edge::Right => std::mem::replace(&mut self.blocked_right, false),
            Edge::Left => std::mem::replace(&mut self.blocked_left, false),
        };
        if !was_blocked {
            debug!("{:?} left {edge:?} edge it never entered", self.config.name);
        }

        scene.broadcast_to_children(self.entity, ChildMessage::blocked(edge, false));
        self.paused = false;
    }

    fn on_deactivate(&mut self, events: &mut EventDispatcher) {
        let cancelled = self.timers.cancel_all();
        if let Some(subscription) = self.subscription.take() {
            events.unsubscribe(subscription.id());
        }
        if self.is_active() {
            debug!("{:?} deactivated, cancelled {cancelled} timer(s)", self.config.name);
        }
        self.lifecycle = AgentLifecycle::Dormant;
    }
}

/// Uniform draw in `[min, max)`.
fn random_in(rng: &mut Rng, (min, max): (f32, f32)) -> f32 {
    let value = min + rng.f32() * (max - min);
    if value < max {
        value
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockScene;
    use proptest::prelude::*;
    use skirmish_common::CollisionHandle;

    const FRAME: f32 = 0.1;

    fn setup(enemy_x: f32, player_x: f32) -> (MockScene, EntityId, EntityId) {
        let mut scene = MockScene::new();
        let player = scene.add("player", player_x);
        let enemy = scene.add("enemy", enemy_x);
        (scene, enemy, player)
    }

    fn spawn(scene: &mut MockScene, enemy: EntityId, config: MovementConfig) -> MovementAi {
        MovementAi::spawn_seeded(enemy, config, scene, 7).expect("spawn agent")
    }

    fn run(agent: &mut MovementAi, scene: &mut MockScene, seconds: f32) {
        let frames = (seconds / FRAME).round() as usize;
        for _ in 0..frames {
            agent.on_tick(FRAME, scene);
        }
    }

    fn player_dead() -> GameEvent {
        GameEvent::PlayerDead {
            cause: "goblin".into(),
            collider: CollisionHandle::new(EntityId::from_raw(1)),
            hit_direction: -1,
        }
    }

    #[test]
    fn test_spawn_requires_target() {
        let mut scene = MockScene::new();
        let enemy = scene.add("enemy", 0.0);
        let result = MovementAi::spawn(enemy, MovementConfig::default(), &mut scene);
        assert!(matches!(result, Err(SpawnError::TargetNotFound(name)) if name == "player"));
    }

    #[test]
    fn test_spawn_requires_body() {
        let mut scene = MockScene::new();
        scene.add("player", 0.0);
        let ghost = EntityId::new();
        let result = MovementAi::spawn(ghost, MovementConfig::default(), &mut scene);
        assert!(matches!(result, Err(SpawnError::MissingBody(id)) if id == ghost));
    }

    #[test]
    fn test_spawn_rejects_invalid_config() {
        let (mut scene, enemy, _) = setup(0.0, 5.0);
        let config = MovementConfig::with_style(MovementStyle::Scout).with_speed(-1.0);
        let result = MovementAi::spawn(enemy, config, &mut scene);
        assert!(matches!(result, Err(SpawnError::InvalidConfig(_))));
    }

    #[test]
    fn test_spawn_plays_walk_animation_and_draws_interval() {
        let (mut scene, enemy, player) = setup(0.0, 5.0);
        let agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::Scout).named("Bat"),
        );

        assert_eq!(agent.target(), player);
        assert!(!agent.is_active());
        assert!((0.15..1.0).contains(&agent.move_interval()));
        assert_eq!(scene.animations, vec![(enemy, "Bat_WALK_".to_string(), 0.5)]);
    }

    #[test]
    fn test_dormant_agent_ignores_ticks() {
        let (mut scene, enemy, _) = setup(0.0, 5.0);
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));

        run(&mut agent, &mut scene, 5.0);
        assert_eq!(scene.mutation_count(enemy), 0);
        assert!(agent.timers().is_empty());
    }

    #[test]
    fn test_wanderer_never_schedules_or_moves() {
        let (mut scene, enemy, _) = setup(0.0, 5.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::Wanderer),
        );

        agent.on_become_active(&mut scene, &mut events);
        assert!(agent.timers().is_empty());

        run(&mut agent, &mut scene, 10.0);
        assert_eq!(scene.mutation_count(enemy), 0);
        assert_eq!(scene.body(enemy).position, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_sentinel_looks_but_never_moves() {
        let (mut scene, enemy, player) = setup(0.0, 5.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::Sentinel),
        );
        agent.on_become_active(&mut scene, &mut events);

        assert!(agent.timers().is_scheduled(MovementTimer::Look));
        assert!(!agent.timers().is_scheduled(MovementTimer::Follow));

        run(&mut agent, &mut scene, 0.9);
        assert_eq!(scene.body(enemy).facing_writes, 0);

        run(&mut agent, &mut scene, 0.1);
        assert_eq!(scene.body(enemy).facing, Some(Facing::Right));

        scene.set_x(player, -5.0);
        run(&mut agent, &mut scene, 0.3);
        assert_eq!(scene.body(enemy).facing, Some(Facing::Left));

        // 1.0s, 1.3s, 1.6s... over 3 seconds after the first fire
        run(&mut agent, &mut scene, 2.7);
        assert!(scene.body(enemy).facing_writes >= 10);
        assert_eq!(scene.body(enemy).velocity_writes, 0);
    }

    #[test]
    fn test_scout_follows_target() {
        let (mut scene, enemy, player) = setup(0.0, 5.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::Scout).with_speed(3.0),
        );
        agent.on_become_active(&mut scene, &mut events);

        run(&mut agent, &mut scene, 1.0);
        assert_eq!(agent.walking_direction(), Facing::Right);
        assert_eq!(scene.body(enemy).velocity, Vec2::new(3.0, 0.0));
        assert_eq!(scene.body(enemy).facing, Some(Facing::Right));

        scene.set_x(player, -5.0);
        run(&mut agent, &mut scene, 2.0);
        assert_eq!(agent.walking_direction(), Facing::Left);
        assert_eq!(scene.body(enemy).velocity, Vec2::new(-3.0, 0.0));
        assert_eq!(scene.body(enemy).facing, Some(Facing::Left));
    }

    #[test]
    fn test_right_edge_pauses_and_snaps_back() {
        let (mut scene, enemy, player) = setup(2.0, 10.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));
        agent.on_become_active(&mut scene, &mut events);

        agent.on_boundary_enter(Edge::Right, &mut scene);
        assert!(agent.is_blocked_right());
        assert_eq!(agent.blocked_at(), 2.0);
        assert_eq!(
            scene.child_messages,
            vec![(enemy, ChildMessage::SetBlockedRightState(true))]
        );

        // Host physics carried the body a little past the edge
        scene.set_x(enemy, 2.4);
        agent.on_tick(FRAME, &mut scene);
        assert!(agent.is_paused());
        assert_eq!(scene.body(enemy).position.x, 2.0);

        // Paused agents keep computing direction but do not drive velocity
        let writes = scene.body(enemy).velocity_writes;
        run(&mut agent, &mut scene, 2.0);
        assert_eq!(scene.body(enemy).velocity_writes, writes);
        assert_eq!(agent.walking_direction(), Facing::Right);

        // Target behind: walking away from the edge is allowed
        scene.set_x(player, -10.0);
        agent.on_tick(FRAME, &mut scene);
        assert!(!agent.is_paused());

        scene.set_x(player, 10.0);
        agent.on_tick(FRAME, &mut scene);
        assert!(agent.is_paused());

        agent.on_boundary_exit(Edge::Right, &mut scene);
        assert!(!agent.is_paused());
        assert!(!agent.is_blocked_right());
        assert_eq!(
            scene.child_messages.last(),
            Some(&(enemy, ChildMessage::SetBlockedRightState(false)))
        );
    }

    #[test]
    fn test_left_edge_only_blocks_leftward_walk() {
        let (mut scene, enemy, _) = setup(0.0, 10.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));
        agent.on_become_active(&mut scene, &mut events);

        agent.on_boundary_enter(Edge::Left, &mut scene);
        agent.on_tick(FRAME, &mut scene);
        assert!(!agent.is_paused());
        assert_eq!(scene.body(enemy).position_writes, 0);
    }

    #[test]
    fn test_left_edge_snaps_back_when_walking_left() {
        let (mut scene, enemy, _) = setup(2.0, -10.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));
        agent.on_become_active(&mut scene, &mut events);

        agent.on_boundary_enter(Edge::Left, &mut scene);
        assert_eq!(agent.blocked_at(), 2.0);

        scene.set_x(enemy, 1.6);
        agent.on_tick(FRAME, &mut scene);
        assert_eq!(agent.walking_direction(), Facing::Left);
        assert!(agent.is_paused());
        assert_eq!(scene.body(enemy).position.x, 2.0);
    }

    #[test]
    fn test_alignment_threshold_is_inclusive() {
        let (mut scene, enemy, player) = setup(0.0, 0.3);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));
        agent.on_become_active(&mut scene, &mut events);

        agent.on_tick(FRAME, &mut scene);
        assert!(agent.is_paused());
        assert_eq!(scene.body(enemy).velocity, Vec2::ZERO);

        scene.set_x(player, 0.31);
        agent.on_tick(FRAME, &mut scene);
        assert!(!agent.is_paused());
    }

    #[test]
    fn test_first_look_fires_after_uneven_frames() {
        let (mut scene, enemy, _) = setup(0.0, 5.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::Sentinel),
        );
        agent.on_become_active(&mut scene, &mut events);

        agent.on_tick(0.9, &mut scene);
        assert_eq!(scene.body(enemy).facing, None);

        agent.on_tick(0.1, &mut scene);
        assert_eq!(scene.body(enemy).facing, Some(Facing::Right));
    }

    #[test]
    fn test_exit_without_enter_is_tolerated() {
        let (mut scene, enemy, _) = setup(0.0, 10.0);
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));

        agent.on_boundary_exit(Edge::Left, &mut scene);
        assert!(!agent.is_blocked_left());
        assert!(!agent.is_paused());
    }

    #[test]
    fn test_alignment_pauses_and_player_death_tightens() {
        let (mut scene, enemy, player) = setup(0.0, 0.2);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));
        agent.on_become_active(&mut scene, &mut events);

        agent.on_tick(FRAME, &mut scene);
        assert!(agent.is_paused());
        assert_eq!(scene.body(enemy).velocity, Vec2::ZERO);

        assert_eq!(events.publish(&player_dead()), 1);
        agent.on_tick(FRAME, &mut scene);
        assert_eq!(agent.x_axis_offset(), 0.005);
        assert!(!agent.is_paused());

        scene.set_x(player, 0.004);
        agent.on_tick(FRAME, &mut scene);
        assert!(agent.is_paused());
    }

    #[test]
    fn test_hesitant_scout_pauses_without_duplicate_timers() {
        let (mut scene, enemy, _) = setup(0.0, 20.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::HesitantScout).with_pause_chance(100.0),
        );
        agent.on_become_active(&mut scene, &mut events);

        run(&mut agent, &mut scene, 1.0);
        assert_eq!(agent.snapshot().pause_count, 1);
        assert!(agent.is_hesitating());
        assert!(!agent.timers().is_scheduled(MovementTimer::Follow));
        assert_eq!(scene.body(enemy).velocity, Vec2::ZERO);

        let wait = agent
            .timers()
            .time_until(MovementTimer::ResumeFollow)
            .expect("resume pending");
        assert!((2.0..5.0).contains(&wait), "wait {wait}");

        // Look keeps running during the pause, follow stays cancelled
        let looks_before = scene.body(enemy).facing_writes;
        let mut elapsed = 0.0;
        while agent.is_hesitating() {
            assert!(!agent.timers().is_scheduled(MovementTimer::Follow));
            assert_eq!(agent.snapshot().pause_count, 1);
            agent.on_tick(FRAME, &mut scene);
            elapsed += FRAME;
            assert!(elapsed < 5.5);
        }
        assert!(scene.body(enemy).facing_writes > looks_before);

        // Resumed at base cadence: a single follow timer, first fire after 1s
        assert!(agent.timers().is_scheduled(MovementTimer::Follow));
        assert_eq!(agent.timers().len(), 2);
        let next = agent
            .timers()
            .time_until(MovementTimer::Follow)
            .expect("follow re-armed");
        assert!(next <= 1.0);

        run(&mut agent, &mut scene, 1.0);
        assert_eq!(agent.snapshot().pause_count, 2);
    }

    #[test]
    fn test_activation_is_idempotent() {
        let (mut scene, enemy, _) = setup(0.0, 5.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(&mut scene, enemy, MovementConfig::with_style(MovementStyle::Scout));

        agent.on_become_active(&mut scene, &mut events);
        let look = agent.timers().handle_of(MovementTimer::Look);
        agent.on_become_active(&mut scene, &mut events);

        assert_eq!(agent.timers().len(), 2);
        assert_eq!(agent.timers().handle_of(MovementTimer::Look), look);
        assert_eq!(events.subscriber_count(), 1);
    }

    #[test]
    fn test_deactivate_cancels_everything() {
        let (mut scene, enemy, _) = setup(0.0, 20.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::HesitantScout).with_pause_chance(100.0),
        );
        agent.on_become_active(&mut scene, &mut events);
        run(&mut agent, &mut scene, 1.0);
        assert!(agent.is_hesitating());

        agent.on_deactivate(&mut events);
        assert!(!agent.is_active());
        assert!(agent.timers().is_empty());
        assert_eq!(events.subscriber_count(), 0);

        let mutations = scene.mutation_count(enemy);
        run(&mut agent, &mut scene, 10.0);
        assert_eq!(scene.mutation_count(enemy), mutations);

        // Deactivating twice is harmless
        agent.on_deactivate(&mut events);
    }

    #[test]
    fn test_reactivation_rearms_timers() {
        let (mut scene, enemy, _) = setup(0.0, 5.0);
        let mut events = EventDispatcher::default();
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::Sentinel),
        );

        agent.on_become_active(&mut scene, &mut events);
        agent.on_deactivate(&mut events);
        agent.on_become_active(&mut scene, &mut events);

        assert!(agent.is_active());
        assert_eq!(agent.timers().len(), 1);
        run(&mut agent, &mut scene, 1.0);
        assert_eq!(scene.body(enemy).facing, Some(Facing::Right));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (mut scene, enemy, _) = setup(1.5, 5.0);
        let mut agent = spawn(
            &mut scene,
            enemy,
            MovementConfig::with_style(MovementStyle::Scout).named("Imp"),
        );
        agent.on_boundary_enter(Edge::Left, &mut scene);

        let snapshot = agent.snapshot();
        assert_eq!(snapshot.name, "Imp");
        assert_eq!(snapshot.lifecycle, AgentLifecycle::Dormant);
        assert!(snapshot.blocked_left);
        assert_eq!(snapshot.blocked_at, 1.5);
    }

    proptest! {
        #[test]
        fn prop_scout_direction_and_facing_track_target(
            enemy_x in -50.0f32..50.0,
            moves in proptest::collection::vec(-50.0f32..50.0, 1..20),
        ) {
            let (mut scene, enemy, player) = setup(enemy_x, 0.0);
            let mut events = EventDispatcher::default();
            let mut agent = spawn(
                &mut scene,
                enemy,
                MovementConfig::with_style(MovementStyle::Scout),
            );
            agent.on_become_active(&mut scene, &mut events);
            agent.on_tick(0.0, &mut scene);

            for player_x in moves {
                scene.set_x(player, player_x);
                let before = scene.body(enemy).velocity_writes;
                agent.on_tick(1.0, &mut scene);

                let own_x = scene.body(enemy).position.x;
                prop_assert_eq!(agent.walking_direction() == Facing::Right, player_x > own_x);
                if !agent.is_paused() && scene.body(enemy).velocity_writes > before {
                    prop_assert_eq!(scene.body(enemy).facing, Some(agent.walking_direction()));
                }
            }
        }
    }
}
