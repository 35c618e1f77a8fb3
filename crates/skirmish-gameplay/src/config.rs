//! Authoring-time configuration for behaviours.
//!
//! Agent profiles are plain serde structs so they can be embedded in level
//! data or loaded from RON files:
//!
//! ```ron
//! (
//!     name: "Grunt",
//!     style: HesitantScout,
//!     movement_speed: 2.5,
//!     chance_of_pause: 10.0,
//! )
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use skirmish_common::{ConfigError, SkirmishResult};

/// Movement profile selected when an agent is authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MovementStyle {
    /// Turns to watch the target, never moves
    #[default]
    Sentinel,
    /// Watches and walks towards the target
    Scout,
    /// Scout that randomly stops to hesitate
    HesitantScout,
    /// Reserved profile, no behaviour attached
    Wanderer,
}

impl MovementStyle {
    /// Whether this style runs the look timer.
    #[must_use]
    pub const fn looks(self) -> bool {
        matches!(self, Self::Sentinel | Self::Scout | Self::HesitantScout)
    }

    /// Whether this style walks (follow timer and edge checks).
    #[must_use]
    pub const fn moves(self) -> bool {
        matches!(self, Self::Scout | Self::HesitantScout)
    }

    /// Whether this style randomly pauses while following.
    #[must_use]
    pub const fn is_hesitant(self) -> bool {
        matches!(self, Self::HesitantScout)
    }
}

/// Per-agent movement configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Agent name, used to derive the walk animation clip
    pub name: String,
    /// Behaviour profile
    pub style: MovementStyle,
    /// Walking speed in units per second
    pub movement_speed: f32,
    /// Playback rate of the walk animation
    pub walk_animation_speed: f32,
    /// Percent chance (0-100) of pausing on each follow step
    pub chance_of_pause: f32,
    /// Seconds between look updates
    pub look_interval: f32,
    /// Horizontal distance under which the agent counts as aligned
    pub x_axis_offset: f32,
    /// Alignment distance used once the player is dead
    pub victory_x_axis_offset: f32,
    /// Delay before the first look/follow step after activation
    pub first_fire_delay: f32,
    /// Range `[min, max)` the follow interval is drawn from at spawn
    pub move_interval_range: (f32, f32),
    /// Range `[min, max)` of a hesitation pause in seconds
    pub pause_duration_range: (f32, f32),
    /// Scene name of the object to track
    pub target_name: String,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            name: "Enemy".to_string(),
            style: MovementStyle::Sentinel,
            movement_speed: 2.0,
            walk_animation_speed: 0.5,
            chance_of_pause: 1.0,
            look_interval: 0.3,
            x_axis_offset: 0.3,
            victory_x_axis_offset: 0.005,
            first_fire_delay: 1.0,
            move_interval_range: (0.15, 1.0),
            pause_duration_range: (2.0, 5.0),
            target_name: "player".to_string(),
        }
    }
}

impl MovementConfig {
    /// Default config with the given style.
    #[must_use]
    pub fn with_style(style: MovementStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Set the agent name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set walking speed.
    #[must_use]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    /// Set pause chance in percent.
    #[must_use]
    pub const fn with_pause_chance(mut self, percent: f32) -> Self {
        self.chance_of_pause = percent;
        self
    }

    /// Name of the walk animation clip.
    #[must_use]
    pub fn walk_clip(&self) -> String {
        format!("{}_WALK_", self.name)
    }

    /// Parse a config from RON text and validate it.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON config file.
    pub fn load_ron<P: AsRef<Path>>(path: P) -> SkirmishResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        debug!("Loaded movement profile {:?} from {}", config.name, path.display());
        Ok(config)
    }

    /// Check every tunable against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("movement_speed", self.movement_speed)?;
        non_negative("walk_animation_speed", self.walk_animation_speed)?;
        non_negative("x_axis_offset", self.x_axis_offset)?;
        non_negative("victory_x_axis_offset", self.victory_x_axis_offset)?;
        non_negative("first_fire_delay", self.first_fire_delay)?;

        if !(0.0..=100.0).contains(&self.chance_of_pause) {
            return Err(out_of_range("chance_of_pause", "must be within 0..=100"));
        }
        if !(self.look_interval.is_finite() && self.look_interval > 0.0) {
            return Err(out_of_range("look_interval", "must be positive"));
        }

        let (min, max) = self.move_interval_range;
        if !(min > 0.0 && min < max && max.is_finite()) {
            return Err(out_of_range("move_interval_range", "needs 0 < min < max"));
        }
        let (min, max) = self.pause_duration_range;
        if !(min >= 0.0 && min < max && max.is_finite()) {
            return Err(out_of_range("pause_duration_range", "needs 0 <= min < max"));
        }

        if self.target_name.trim().is_empty() {
            return Err(out_of_range("target_name", "must not be empty"));
        }
        Ok(())
    }
}

/// HUD layout and fade timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Distance of the weapon icon from the top of the screen, in pixels
    pub weapon_top_margin: f32,
    /// Depth the HUD is placed at
    pub z: f32,
    /// Delay before the first fade-in
    pub fade_in_after: f32,
    /// Duration of the first fade-in and of fade-outs
    pub initial_fade_time: f32,
    /// Duration of the fade-in after a weapon change
    pub weapon_change_fade: f32,
    /// Delay before a requested fade-out
    pub fade_out_after: f32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            weapon_top_margin: 48.0,
            z: 10.0,
            fade_in_after: 1.0,
            initial_fade_time: 2.0,
            weapon_change_fade: 0.5,
            fade_out_after: 3.0,
        }
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "must be finite and >= 0"))
    }
}

fn out_of_range(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        reason: reason.to_string(),
    }
}
