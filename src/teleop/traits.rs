//! Trait definitions shared by the keyboard command mappers.

use crate::teleop::command::CommandMessage;
use crate::teleop::key::{KeyAction, KeyEvent, TeleopKey};

/// Maps held teleoperation keys to outgoing commands.
///
/// Implementations own their held-key set and are driven one event at a
/// time by a single owner.
pub trait CommandMapper {
    /// Message emitted by this mapper.
    type Command: CommandMessage;

    /// Handle a key press. Returns the command to publish, if any.
    fn on_key_down(&mut self, key: TeleopKey) -> Option<Self::Command>;

    /// Handle a key release. Returns the command to publish, if any.
    fn on_key_up(&mut self, key: TeleopKey) -> Option<Self::Command>;

    /// Whether key events are currently processed.
    fn is_enabled(&self) -> bool;

    /// Enable or disable key handling. The held-key set is kept as is.
    fn set_enabled(&mut self, enabled: bool);

    /// Keys currently held, in a stable order.
    fn pressed_keys(&self) -> Vec<TeleopKey>;

    /// Handle a raw host key event.
    ///
    /// Key names outside the teleoperation alphabet and auto-repeat presses
    /// are dropped without emitting anything.
    fn on_key_event(&mut self, event: &KeyEvent) -> Option<Self::Command> {
        let key = TeleopKey::from_key_name(&event.key)?;
        match event.action {
            KeyAction::Down if event.repeat => None,
            KeyAction::Down => self.on_key_down(key),
            KeyAction::Up => self.on_key_up(key),
        }
    }
}
