//! Settings actions and the persisted panel wrapper.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::panel::error::SettingsError;
use crate::panel::topics::Topic;
use crate::panel::tree::SettingsTree;

/// Action sent by the host's settings editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "kebab-case")]
pub enum SettingsAction {
    /// Set the field at `path` to `value`
    Update { path: Vec<String>, value: Value },
    /// Node-level button; carries the node path and action id
    PerformNodeAction { path: Vec<String>, id: String },
}

/// Persistable panel state editable through a settings tree.
pub trait PanelSettings: Serialize + DeserializeOwned + Default + Clone + PartialEq {
    /// Build the editor tree for the current state and available topics.
    fn settings_tree(&self, topics: &[Topic]) -> SettingsTree;

    /// Build a state from a host-saved, possibly partial, JSON value.
    ///
    /// Missing fields take their defaults. An unreadable value logs a
    /// warning and yields the default state.
    fn from_initial_state(initial: Option<&Value>) -> Self {
        let Some(initial) = initial else {
            return Self::default();
        };
        match serde_json::from_value(initial.clone()) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Ignoring saved panel state: {}", e);
                Self::default()
            }
        }
    }

    /// Set the field at `path`.
    ///
    /// The path must name an existing leaf field, not a group, and the
    /// value must fit its type; otherwise the state is left untouched.
    /// Returns whether the state changed.
    fn apply_update(&mut self, path: &[String], value: Value) -> Result<bool, SettingsError> {
        if path.is_empty() {
            return Err(SettingsError::unknown_path(path));
        }

        let mut tree = serde_json::to_value(&*self)?;
        let mut slot = &mut tree;
        for segment in path {
            slot = slot
                .as_object_mut()
                .and_then(|object| object.get_mut(segment))
                .ok_or_else(|| SettingsError::unknown_path(path))?;
        }
        if slot.is_object() {
            return Err(SettingsError::not_a_field(path));
        }
        *slot = value;

        let updated: Self =
            serde_json::from_value(tree).map_err(|e| SettingsError::invalid_value(path, e))?;
        if updated == *self {
            return Ok(false);
        }
        *self = updated;
        Ok(true)
    }
}

/// Panel state plus the host's save callback.
///
/// Every change to the state is handed to the persist callback, and the
/// initial state is persisted on construction.
pub struct SettingsPanel<T: PanelSettings> {
    state: T,
    persist: Box<dyn FnMut(&T) + Send>,
}

impl<T: PanelSettings> SettingsPanel<T> {
    pub fn new(state: T, mut persist: Box<dyn FnMut(&T) + Send>) -> Self {
        persist(&state);
        Self { state, persist }
    }

    pub fn state(&self) -> &T {
        &self.state
    }

    /// Handle one editor action. Returns whether the state changed.
    pub fn handle_action(&mut self, action: SettingsAction) -> Result<bool, SettingsError> {
        match action {
            SettingsAction::Update { path, value } => {
                let changed = self.state.apply_update(&path, value)?;
                if changed {
                    log::debug!("Settings updated at {}", path.join("."));
                    (self.persist)(&self.state);
                }
                Ok(changed)
            }
            SettingsAction::PerformNodeAction { path, id } => {
                log::debug!("Ignoring node action '{}' at {}", id, path.join("."));
                Ok(false)
            }
        }
    }

    /// Modify the state in place, persisting if anything changed.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) -> bool {
        let before = self.state.clone();
        f(&mut self.state);
        let changed = self.state != before;
        if changed {
            (self.persist)(&self.state);
        }
        changed
    }

    pub fn settings_tree(&self, topics: &[Topic]) -> SettingsTree {
        self.state.settings_tree(topics)
    }
}

impl<T: PanelSettings + std::fmt::Debug> std::fmt::Debug for SettingsPanel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsPanel")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
