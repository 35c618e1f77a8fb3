//! HUD weapon display.
//!
//! Shows the equipped weapon's sprite at the top centre of the screen and
//! fades it in or out in reaction to player events. Rendering stays with the
//! host: the display only emits [`HudCommand`]s.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use skirmish_common::SpriteId;

use crate::config::HudConfig;
use crate::events::{EventDispatcher, EventKind, GameEvent, Subscription};
use crate::weapon::Weapon;

/// Render instruction for the host HUD layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HudCommand {
    /// Swap the displayed sprite
    SetSprite(SpriteId),
    /// Stop any running fade on the sprite
    KillTweens,
    /// Tween the sprite alpha
    Fade {
        /// Alpha to reach (0 transparent, 1 opaque)
        to_alpha: f32,
        /// Seconds before the tween starts
        delay: f32,
        /// Tween duration in seconds
        duration: f32,
    },
    /// Move the HUD element to a screen-space point (x, y in pixels, z depth)
    MoveTo(Vec3),
}

/// Events the display listens to.
const HUD_EVENTS: [EventKind; 4] = [
    EventKind::InitEquippedWeapon,
    EventKind::ChangeEquippedWeapon,
    EventKind::FadeHud,
    EventKind::ScreenSizeChanged,
];

/// Equipped-weapon HUD element.
#[derive(Debug)]
pub struct WeaponDisplay {
    config: HudConfig,
    screen: (f32, f32),
    sprite: Option<SpriteId>,
    commands: Vec<HudCommand>,
    subscription: Option<Subscription>,
}

impl WeaponDisplay {
    /// Creates the display for a screen of `width` x `height` pixels and
    /// positions it.
    #[must_use]
    pub fn new(config: HudConfig, width: f32, height: f32) -> Self {
        let mut display = Self {
            config,
            screen: (width, height),
            sprite: None,
            commands: Vec::new(),
            subscription: None,
        };
        display.reposition();
        display
    }

    /// Starts listening for HUD events.
    pub fn enable(&mut self, events: &mut EventDispatcher) {
        if self.subscription.is_none() {
            self.subscription = Some(events.subscribe(&HUD_EVENTS));
        }
    }

    /// Stops listening for HUD events.
    pub fn disable(&mut self, events: &mut EventDispatcher) {
        if let Some(subscription) = self.subscription.take() {
            events.unsubscribe(subscription.id());
        }
    }

    /// Handles every pending event.
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
            GameEvent::InitEquippedWeapon(weapon) => self.on_init_equipped(weapon),
            GameEvent::ChangeEquippedWeapon(weapon) => self.on_change_equipped(weapon),
            GameEvent::FadeHud(_) => self.fade_out(),
            GameEvent::ScreenSizeChanged { width, height } => {
                self.screen = (*width, *height);
                self.reposition();
            },
            _ => {},
        }
    }

    /// Sprite currently shown.
    #[must_use]
    pub fn sprite(&self) -> Option<SpriteId> {
        self.sprite
    }

    /// Screen-space anchor of the weapon icon.
    #[must_use]
    pub fn anchor(&self) -> Vec3 {
        let (width, height) = self.screen;
        Vec3::new(
            width / 2.0,
            height - self.config.weapon_top_margin,
            self.config.z,
        )
    }

    /// Takes the commands emitted since the last call.
    pub fn take_commands(&mut self) -> Vec<HudCommand> {
        std::mem::take(&mut self.commands)
    }

    fn on_init_equipped(&mut self, weapon: &Weapon) {
        self.show(weapon.sprite);
        // Hide instantly, then fade in slowly
        self.commands.push(fade(0.0, 0.0, 0.0));
        self.commands.push(fade(
            1.0,
            self.config.fade_in_after,
            self.config.initial_fade_time,
        ));
    }

    fn on_change_equipped(&mut self, weapon: &Weapon) {
        self.show(weapon.sprite);
        self.commands.push(fade(0.0, 0.0, 0.0));
        self.commands
            .push(fade(1.0, 0.0, self.config.weapon_change_fade));
    }

    fn show(&mut self, sprite: SpriteId) {
        debug!("HUD weapon sprite -> {sprite:?}");
        self.sprite = Some(sprite);
        self.commands.push(HudCommand::SetSprite(sprite));
        self.commands.push(HudCommand::KillTweens);
    }

    fn fade_out(&mut self) {
        self.commands.push(fade(
            0.0,
            self.config.fade_out_after,
            self.config.initial_fade_time,
        ));
    }

    fn reposition(&mut self) {
        self.commands.push(HudCommand::MoveTo(self.anchor()));
    }
}

const fn fade(to_alpha: f32, delay: f32, duration: f32) -> HudCommand {
    HudCommand::Fade {
        to_alpha,
        delay,
        duration,
    }
}
