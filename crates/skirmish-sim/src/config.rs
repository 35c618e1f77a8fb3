//! Sandbox configuration.
//!
//! Describes the level the headless host builds: frame budget, player patrol,
//! enemy placements and edge blocker volumes. Loaded from a TOML file, falling
//! back to a small built-in level.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

use skirmish_gameplay::{Edge, HudConfig, MovementConfig, MovementStyle};

/// Configuration file name.
pub const CONFIG_FILE: &str = "skirmish.toml";

/// One enemy placed in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSetup {
    /// Spawn x position
    pub x: f32,
    /// Movement profile
    #[serde(default)]
    pub profile: MovementConfig,
}

/// Edge blocker trigger volume spanning `[min_x, max_x]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeVolume {
    /// Which edge the volume marks
    pub edge: Edge,
    /// Left bound of the volume
    pub min_x: f32,
    /// Right bound of the volume
    pub max_x: f32,
}

impl EdgeVolume {
    /// Whether `x` lies inside the volume.
    #[must_use]
    pub fn contains(&self, x: f32) -> bool {
        (self.min_x..=self.max_x).contains(&x)
    }
}

/// Sandbox run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Run ===
    /// Number of frames to simulate
    pub frames: u32,
    /// Fixed frame delta in seconds
    pub frame_dt: f32,
    /// Seed for agent RNGs (each agent gets `seed + index`)
    pub seed: u64,

    // === Viewport ===
    /// Screen width in pixels
    pub screen_width: f32,
    /// Screen height in pixels
    pub screen_height: f32,
    /// Visible world distance either side of the camera
    pub view_half_width: f32,

    // === Player ===
    /// Player spawn x
    pub player_x: f32,
    /// Player patrol bounds
    pub player_patrol: (f32, f32),
    /// Player walking speed
    pub player_speed: f32,
    /// Player starting hit points
    pub player_hp: i32,
    /// Damage multiplier for the selected difficulty
    pub difficulty_damage_modifier: i32,

    // === Enemies ===
    /// Damage an enemy deals on contact
    pub contact_damage: i32,
    /// Distance at which an enemy touches the player
    pub contact_range: f32,
    /// Seconds an enemy waits between contact hits
    pub hit_cooldown: f32,
    /// Enemy placements
    pub agents: Vec<AgentSetup>,
    /// Edge blocker volumes
    pub edges: Vec<EdgeVolume>,

    // === HUD ===
    /// HUD layout and fades
    pub hud: HudConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        let scout = |name: &str, style| MovementConfig::with_style(style).named(name);

        Self {
            frames: 1200,
            frame_dt: 1.0 / 60.0,
            seed: 42,

            screen_width: 1280.0,
            screen_height: 720.0,
            view_half_width: 10.0,

            player_x: 0.0,
            player_patrol: (-4.0, 12.0),
            player_speed: 1.5,
            player_hp: 20,
            difficulty_damage_modifier: 1,

            contact_damage: 2,
            contact_range: 0.5,
            hit_cooldown: 1.0,
            agents: vec![
                AgentSetup {
                    x: 6.0,
                    profile: scout("Sentry", MovementStyle::Sentinel),
                },
                AgentSetup {
                    x: 9.0,
                    profile: scout("Grunt", MovementStyle::Scout),
                },
                AgentSetup {
                    x: 18.0,
                    profile: scout("Skulker", MovementStyle::HesitantScout)
                        .with_pause_chance(10.0),
                },
            ],
            edges: vec![
                EdgeVolume {
                    edge: Edge::Left,
                    min_x: 3.0,
                    max_x: 3.5,
                },
                EdgeVolume {
                    edge: Edge::Right,
                    min_x: 20.0,
                    max_x: 20.5,
                },
            ],

            hud: HudConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from `skirmish.toml` in the working directory.
    /// Returns default config if the file doesn't exist.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    #[must_use]
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let mut contents = String::new();
        if let Err(e) = fs::File::open(path).and_then(|mut f| f.read_to_string(&mut contents)) {
            warn!("Failed to read config file: {e}");
            return Self::default();
        }

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                info!("Loaded config from {}", path.display());
                config.validate();
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values to sane ranges and drop unusable entries.
    pub fn validate(&mut self) {
        // Run
        self.frames = self.frames.clamp(1, 1_000_000);
        self.frame_dt = self.frame_dt.clamp(0.001, 0.25);

        // Viewport
        self.screen_width = self.screen_width.max(1.0);
        self.screen_height = self.screen_height.max(1.0);
        self.view_half_width = self.view_half_width.max(0.1);

        // Player
        let (min, max) = self.player_patrol;
        if min > max {
            self.player_patrol = (max, min);
        }
        self.player_speed = self.player_speed.max(0.0);
        self.difficulty_damage_modifier = self.difficulty_damage_modifier.max(0);

        // Enemies
        self.contact_range = self.contact_range.max(0.0);
        self.hit_cooldown = self.hit_cooldown.max(0.0);
        self.agents.retain(|agent| match agent.profile.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping agent {:?}: {e}", agent.profile.name);
                false
            },
        });
        for volume in &mut self.edges {
            if volume.min_x > volume.max_x {
                std::mem::swap(&mut volume.min_x, &mut volume.max_x);
            }
        }
    }
}
