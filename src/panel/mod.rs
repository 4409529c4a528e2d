//! Panel state, settings editing and topic selection.
//!
//! Each panel keeps a small serializable state that the host saves and
//! restores. The host's settings editor changes it through
//! [`SettingsAction`]s addressed by field path.

mod apply;
mod error;
mod settings;
mod state;
mod topics;
mod tree;

pub use error::SettingsError;
pub use settings::{PanelSettings, SettingsAction, SettingsPanel};
pub use state::{
    DescriptionDisplay, DetectionData, DetectionPanelState, PoseTeleopData, PoseTeleopPanelState,
    TeleopData, TeleopPanelState,
};
pub use topics::{Topic, default_image_topic, filter_topics};
pub use tree::{FieldInput, SelectOption, SettingsTree, SettingsTreeField, SettingsTreeNode};
