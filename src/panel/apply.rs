//! Pushing panel settings into live teleop sessions.

use crate::panel::state::{PoseTeleopPanelState, TeleopPanelState};
use crate::teleop::{CommandSink, KeyCommandMapper, PoseCommandMapper, TeleopSession};

impl<S: CommandSink> TeleopSession<KeyCommandMapper, S> {
    /// Create a session from saved panel state.
    pub fn from_state(state: &TeleopPanelState, sink: S) -> Self {
        Self::new(
            KeyCommandMapper::new(state.mapper_config()),
            sink,
            state.data.target_topic.clone(),
        )
    }

    /// Apply updated settings: speeds, enabled flag and topic.
    ///
    /// New speeds take effect on the next key event.
    pub fn apply_state(&mut self, state: &TeleopPanelState) {
        self.mapper_mut()
            .set_speeds(state.data.linear_speed_meter, state.data.angular_speed_rad);
        self.set_enabled(state.data.enabled);
        self.set_topic(state.data.target_topic.clone());
    }
}

impl<S: CommandSink> TeleopSession<PoseCommandMapper, S> {
    /// Create a session from saved panel state.
    pub fn from_state(state: &PoseTeleopPanelState, sink: S) -> Self {
        Self::new(
            PoseCommandMapper::new(state.mapper_config()),
            sink,
            state.data.camera_control_topic.clone(),
        )
    }

    /// Apply updated settings: deltas, enabled flag and topic.
    pub fn apply_state(&mut self, state: &PoseTeleopPanelState) {
        self.mapper_mut().set_deltas(
            state.data.position_meter_delta,
            state.data.orientation_deg_delta,
        );
        self.set_enabled(state.data.enabled);
        self.set_topic(state.data.camera_control_topic.clone());
    }
}
