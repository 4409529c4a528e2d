//! Teleoperation keys, their axis bindings and the held-key set.
//!
//! Keys are laid out as two 3x2 blocks on a QWERTY keyboard:
//! `Q W E / A S D` drive translation and `U I O / J K L` drive rotation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A key of the teleoperation alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeleopKey {
    W,
    S,
    A,
    D,
    Q,
    E,
    U,
    O,
    I,
    K,
    J,
    L,
}

/// Command axis a key contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LinearX,
    LinearY,
    LinearZ,
    AngularX,
    AngularY,
    AngularZ,
}

impl Axis {
    /// Whether this is a translation axis.
    pub fn is_linear(&self) -> bool {
        matches!(self, Axis::LinearX | Axis::LinearY | Axis::LinearZ)
    }
}

impl TeleopKey {
    /// All keys, translation block first.
    pub fn all() -> &'static [TeleopKey] {
        &[
            TeleopKey::W,
            TeleopKey::S,
            TeleopKey::A,
            TeleopKey::D,
            TeleopKey::Q,
            TeleopKey::E,
            TeleopKey::U,
            TeleopKey::O,
            TeleopKey::I,
            TeleopKey::K,
            TeleopKey::J,
            TeleopKey::L,
        ]
    }

    /// Parse a host key name (`KeyboardEvent.key` style), ignoring case.
    ///
    /// Returns `None` for anything outside the alphabet, including
    /// multi-character names like "Shift".
    pub fn from_key_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(c)
    }

    /// Parse a single character, ignoring case.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(TeleopKey::W),
            's' => Some(TeleopKey::S),
            'a' => Some(TeleopKey::A),
            'd' => Some(TeleopKey::D),
            'q' => Some(TeleopKey::Q),
            'e' => Some(TeleopKey::E),
            'u' => Some(TeleopKey::U),
            'o' => Some(TeleopKey::O),
            'i' => Some(TeleopKey::I),
            'k' => Some(TeleopKey::K),
            'j' => Some(TeleopKey::J),
            'l' => Some(TeleopKey::L),
            _ => None,
        }
    }

    /// Lowercase character for this key.
    pub fn as_char(&self) -> char {
        match self {
            TeleopKey::W => 'w',
            TeleopKey::S => 's',
            TeleopKey::A => 'a',
            TeleopKey::D => 'd',
            TeleopKey::Q => 'q',
            TeleopKey::E => 'e',
            TeleopKey::U => 'u',
            TeleopKey::O => 'o',
            TeleopKey::I => 'i',
            TeleopKey::K => 'k',
            TeleopKey::J => 'j',
            TeleopKey::L => 'l',
        }
    }

    /// Axis and sign this key contributes to the composed command.
    pub fn binding(&self) -> (Axis, f64) {
        match self {
            TeleopKey::W => (Axis::LinearX, 1.0),
            TeleopKey::S => (Axis::LinearX, -1.0),
            TeleopKey::A => (Axis::LinearY, 1.0),
            TeleopKey::D => (Axis::LinearY, -1.0),
            TeleopKey::Q => (Axis::LinearZ, 1.0),
            TeleopKey::E => (Axis::LinearZ, -1.0),
            TeleopKey::U => (Axis::AngularX, 1.0),
            TeleopKey::O => (Axis::AngularX, -1.0),
            TeleopKey::I => (Axis::AngularY, -1.0),
            TeleopKey::K => (Axis::AngularY, 1.0),
            TeleopKey::J => (Axis::AngularZ, 1.0),
            TeleopKey::L => (Axis::AngularZ, -1.0),
        }
    }

    /// Caption shown under the key in keyboard displays.
    pub fn description(&self) -> &'static str {
        match self {
            TeleopKey::W => "Forward",
            TeleopKey::S => "Backward",
            TeleopKey::A => "Left",
            TeleopKey::D => "Right",
            TeleopKey::Q => "Up",
            TeleopKey::E => "Down",
            TeleopKey::U => "Roll Left",
            TeleopKey::O => "Roll Right",
            TeleopKey::I => "Pitch Up",
            TeleopKey::K => "Pitch Down",
            TeleopKey::J => "Yaw Left",
            TeleopKey::L => "Yaw Right",
        }
    }
}

impl fmt::Display for TeleopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A keyboard event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Host key name, e.g. "w" or "Shift"
    pub key: String,
    /// Press or release
    pub action: KeyAction,
    /// Set by the host for auto-repeat presses while a key is held
    pub repeat: bool,
}

impl KeyEvent {
    /// A key press.
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: KeyAction::Down,
            repeat: false,
        }
    }

    /// A key release.
    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: KeyAction::Up,
            repeat: false,
        }
    }

    /// Mark this event as an auto-repeat.
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Parse a script token: `+w` press, `-w` release, `~w` auto-repeat press.
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let prefix = chars.next()?;
        let key = chars.as_str();
        if key.is_empty() {
            return None;
        }
        match prefix {
            '+' => Some(Self::down(key)),
            '-' => Some(Self::up(key)),
            '~' => Some(Self::down(key).with_repeat(true)),
            _ => None,
        }
    }
}

/// Set of keys currently held down.
///
/// Keys are added and removed one at a time; the set is never bulk-cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveKeySet {
    keys: BTreeSet<TeleopKey>,
}

impl ActiveKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. Returns `false` if it was already held.
    pub fn press(&mut self, key: TeleopKey) -> bool {
        self.keys.insert(key)
    }

    /// Remove a key. Returns `false` if it was not held.
    pub fn release(&mut self, key: TeleopKey) -> bool {
        self.keys.remove(&key)
    }

    pub fn contains(&self, key: TeleopKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Held keys in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = TeleopKey> + '_ {
        self.keys.iter().copied()
    }
}
