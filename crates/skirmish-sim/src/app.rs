//! Sandbox frame loop.
//!
//! Builds the level from [`SimConfig`], drives every behaviour through the
//! host seams for a fixed number of frames and summarises the result.

use anyhow::{Context, Result};
use glam::Vec2;
use serde::Serialize;
use tracing::{debug, info};

use skirmish_common::{CollisionHandle, EntityId, Facing, SpriteId};
use skirmish_gameplay::{
    AgentSnapshot, Behaviour, EventDispatcher, GameEvent, Hit, HitReaction, MovementAi,
    PlayerData, PlayerManager, Scene, Weapon, WeaponDisplay,
};

use crate::config::SimConfig;
use crate::scene::SandboxScene;

/// Scene name of the player body.
const PLAYER_NAME: &str = "player";

/// World distance per unit of repulse force.
const KNOCKBACK_SCALE: f32 = 0.1;

const PLAYER_SWORD_SPRITE: SpriteId = SpriteId::new(1);
const PLAYER_BOW_SPRITE: SpriteId = SpriteId::new(2);
const ENEMY_CLAW_SPRITE: SpriteId = SpriteId::new(100);

/// Result of a sandbox run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    /// Frames simulated
    pub frames: u32,
    /// Simulated seconds
    pub elapsed: f32,
    /// Player hit points at the end
    pub player_hp: i32,
    /// Whether the player died
    pub player_dead: bool,
    /// Hits the player took
    pub hits_taken: u32,
    /// HUD commands emitted
    pub hud_commands: usize,
    /// Child messages broadcast by agents
    pub child_messages: usize,
    /// Agent states before despawn
    pub agents: Vec<AgentReport>,
}

/// Final state of one agent and its body.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    /// Behaviour state
    #[serde(flatten)]
    pub state: AgentSnapshot,
    /// Body x position
    pub x: f32,
    /// Body facing
    pub facing: Facing,
    /// Walk clip the host was asked to play
    pub walk_clip: Option<String>,
}

#[derive(Debug)]
struct Enemy {
    ai: MovementAi,
    cooldown: f32,
}

/// Runs the sandbox described by `config`.
pub fn run(config: &SimConfig) -> Result<SimReport> {
    let dt = config.frame_dt;
    let mut scene = SandboxScene::new();
    let mut events = EventDispatcher::default();

    let player_id = scene.spawn_body(PLAYER_NAME, config.player_x);
    for volume in &config.edges {
        scene.add_edge_volume(*volume);
    }

    let mut enemies = Vec::with_capacity(config.agents.len());
    for (index, setup) in config.agents.iter().enumerate() {
        let entity = scene.spawn_body(&setup.profile.name, setup.x);
        let seed = config.seed.wrapping_add(index as u64);
        let ai = MovementAi::spawn_seeded(entity, setup.profile.clone(), &mut scene, seed)
            .with_context(|| format!("Failed to spawn {:?}", setup.profile.name))?;
        enemies.push(Enemy { ai, cooldown: 0.0 });
    }
    info!("Level ready: {} agent(s), {} edge volume(s)", enemies.len(), config.edges.len());

    let sword = Weapon::new(EntityId::new(), PLAYER_SWORD_SPRITE, 2);
    let bow = Weapon::new(EntityId::new(), PLAYER_BOW_SPRITE, 1);
    let mut player = PlayerManager::new(PlayerData {
        level: 1,
        hp: config.player_hp,
        ac: 0,
        xp: 0,
        equipped: sword,
        left: bow,
        right: sword,
    });
    let mut hud = WeaponDisplay::new(config.hud.clone(), config.screen_width, config.screen_height);

    player.enable(&mut events);
    hud.enable(&mut events);
    events.publish(&GameEvent::SetDifficultyDamageModifier(
        config.difficulty_damage_modifier,
    ));
    player.init(&mut events);
    events.publish(&GameEvent::InitEquippedWeapon(sword));

    let mut patrol = Facing::Right;
    let mut hits_taken = 0;
    let mut hud_commands = 0;

    for frame in 0..config.frames {
        if player.is_dead() {
            scene.set_velocity(player_id, Vec2::ZERO);
        } else {
            patrol_step(&mut scene, player_id, config, &mut patrol);
        }
        scene.integrate(dt);

        player.update();
        hud.update();
        hud_commands += hud.take_commands().len();

        let camera_x = scene.position(player_id).map_or(0.0, |p| p.x);
        for enemy in &mut enemies {
            let entity = enemy.ai.entity();

            let contacts = scene.update_contacts(entity);
            for contact in &contacts.exited {
                enemy.ai.on_trigger_exit(contact, &mut scene);
            }
            for contact in &contacts.entered {
                enemy.ai.on_trigger_enter(contact, &mut scene);
            }

            let visible = scene
                .position(entity)
                .is_some_and(|p| (p.x - camera_x).abs() <= config.view_half_width);
            if visible && !enemy.ai.is_active() {
                debug!("{:?} became visible on frame {frame}", enemy.ai.config().name);
                enemy.ai.on_become_active(&mut scene, &mut events);
            }

            enemy.ai.on_tick(dt, &mut scene);
            enemy.cooldown = (enemy.cooldown - dt).max(0.0);
        }

        for enemy in &mut enemies {
            if player.is_dead() {
                break;
            }
            if let Some(hit) = contact_hit(&scene, player_id, enemy, config) {
                enemy.cooldown = config.hit_cooldown;
                hits_taken += 1;

                let outcome = player.takes_hit(&hit, &mut events);
                if let Some(position) = scene.position(player_id) {
                    let push = outcome.repulse.sign() * outcome.repulse_force * KNOCKBACK_SCALE;
                    scene.set_position(player_id, position + Vec2::new(push, 0.0));
                }
                if outcome.reaction == HitReaction::Died {
                    events.publish(&GameEvent::FadeHud(true));
                }
            }
        }
    }

    let agents: Vec<_> = enemies
        .iter()
        .map(|enemy| agent_report(&scene, &enemy.ai))
        .collect();
    for enemy in &mut enemies {
        enemy.ai.on_deactivate(&mut events);
    }
    hud.disable(&mut events);
    player.disable(&mut events);

    let report = SimReport {
        frames: config.frames,
        elapsed: config.frames as f32 * dt,
        player_hp: player.data().hp,
        player_dead: player.is_dead(),
        hits_taken,
        hud_commands,
        child_messages: scene.child_message_count(),
        agents,
    };
    info!(
        "Simulated {:.1}s: player hp {} after {} hit(s)",
        report.elapsed, report.player_hp, report.hits_taken
    );
    Ok(report)
}

fn agent_report(scene: &SandboxScene, ai: &MovementAi) -> AgentReport {
    let body = scene.body(ai.entity());
    AgentReport {
        state: ai.snapshot(),
        x: body.map_or(0.0, |body| body.position.x),
        facing: body.map(|body| body.facing).unwrap_or_default(),
        walk_clip: scene.animation(ai.entity()).map(|(clip, _)| clip.clone()),
    }
}

/// Walks the player back and forth between the patrol bounds.
fn patrol_step(
    scene: &mut SandboxScene,
    player: EntityId,
    config: &SimConfig,
    heading: &mut Facing,
) {
    let Some(position) = scene.position(player) else {
        return;
    };
    let (min, max) = config.player_patrol;
    if position.x >= max {
        *heading = Facing::Left;
    } else if position.x <= min {
        *heading = Facing::Right;
    }
    scene.set_velocity(player, Vec2::new(heading.sign() * config.player_speed, 0.0));
    scene.set_facing(player, *heading);
}

/// Hit dealt by `enemy` if it is active, in range and off cooldown.
fn contact_hit(
    scene: &SandboxScene,
    player: EntityId,
    enemy: &Enemy,
    config: &SimConfig,
) -> Option<Hit> {
    if !enemy.ai.is_active() || enemy.cooldown > 0.0 {
        return None;
    }
    let entity = enemy.ai.entity();
    let player_x = scene.position(player)?.x;
    let enemy_x = scene.position(entity)?.x;
    if (enemy_x - player_x).abs() > config.contact_range {
        return None;
    }

    Some(Hit {
        weapon: Weapon::new(entity, ENEMY_CLAW_SPRITE, config.contact_damage),
        hit_side: Facing::toward(player_x, enemy_x),
        cause: enemy.ai.config().name.clone(),
        collider: CollisionHandle::new(entity),
    })
}
