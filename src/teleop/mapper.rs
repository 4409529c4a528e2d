//! Keyboard to velocity command mapping.
//!
//! Every held key contributes its signed speed to one axis of a
//! [`VelocityCommand`]; contributions are summed, so opposing keys cancel.
//! Releasing the last held key emits an explicit stop command.

use std::collections::BTreeSet;

use crate::constants::{DEFAULT_ANGULAR_SPEED_RAD, DEFAULT_LINEAR_SPEED_METER};
use crate::teleop::command::VelocityCommand;
use crate::teleop::key::{ActiveKeySet, TeleopKey};
use crate::teleop::traits::CommandMapper;

/// Configuration for a [`KeyCommandMapper`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapperConfig {
    /// Linear speed added per held translation key (m/s)
    pub linear_speed: f64,
    /// Angular speed added per held rotation key (rad/s)
    pub angular_speed: f64,
    /// Keys that drive the mapper; others are ignored
    pub recognized_keys: BTreeSet<TeleopKey>,
    /// Whether key events are processed
    pub enabled: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            linear_speed: DEFAULT_LINEAR_SPEED_METER,
            angular_speed: DEFAULT_ANGULAR_SPEED_RAD,
            recognized_keys: TeleopKey::all().iter().copied().collect(),
            enabled: true,
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-key speeds.
    pub fn speeds(mut self, linear: f64, angular: f64) -> Self {
        self.linear_speed = linear;
        self.angular_speed = angular;
        self
    }

    /// Restrict the recognized keys.
    pub fn recognized_keys(mut self, keys: impl IntoIterator<Item = TeleopKey>) -> Self {
        self.recognized_keys = keys.into_iter().collect();
        self
    }

    /// Set the initial enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Whether any key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperState {
    /// No key held
    Idle,
    /// At least one key held
    Active,
}

/// Stateful mapper from held keys to a composed [`VelocityCommand`].
#[derive(Debug, Clone)]
pub struct KeyCommandMapper {
    config: MapperConfig,
    active: ActiveKeySet,
}

impl KeyCommandMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            active: ActiveKeySet::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn state(&self) -> MapperState {
        if self.active.is_empty() {
            MapperState::Idle
        } else {
            MapperState::Active
        }
    }

    /// Update the per-key speeds. Takes effect on the next key event.
    pub fn set_speeds(&mut self, linear: f64, angular: f64) {
        self.config.linear_speed = linear;
        self.config.angular_speed = angular;
    }

    /// The command for the keys held right now.
    pub fn current_command(&self) -> VelocityCommand {
        let mut command = VelocityCommand::zero();
        for key in self.active.iter() {
            let (axis, sign) = key.binding();
            let speed = if axis.is_linear() {
                self.config.linear_speed
            } else {
                self.config.angular_speed
            };
            command.add(axis, sign * speed);
        }
        command
    }

    fn accepts(&self, key: TeleopKey) -> bool {
        self.config.enabled && self.config.recognized_keys.contains(&key)
    }
}

impl Default for KeyCommandMapper {
    fn default() -> Self {
        Self::new(MapperConfig::default())
    }
}

impl CommandMapper for KeyCommandMapper {
    type Command = VelocityCommand;

    fn on_key_down(&mut self, key: TeleopKey) -> Option<VelocityCommand> {
        if !self.accepts(key) {
            return None;
        }

        if !self.active.press(key) {
            log::trace!("Key '{}' already held", key);
        }

        let command = self.current_command();
        log::debug!(
            "Keys held: {} -> {:?}",
            self.active.iter().map(|k| k.as_char()).collect::<String>(),
            command
        );
        Some(command)
    }

    fn on_key_up(&mut self, key: TeleopKey) -> Option<VelocityCommand> {
        if !self.accepts(key) || !self.active.release(key) {
            return None;
        }

        if self.active.is_empty() {
            log::debug!("All keys released, sending stop command");
            return Some(VelocityCommand::zero());
        }

        Some(self.current_command())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    fn pressed_keys(&self) -> Vec<TeleopKey> {
        self.active.iter().collect()
    }
}
