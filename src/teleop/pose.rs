//! Keyboard to camera pose delta mapping.
//!
//! Uses the same key layout as velocity teleoperation, but each press
//! produces a relative pose: a position step in meters and an orientation
//! step built from roll/pitch/yaw degrees. Releases emit nothing since the
//! deltas are not continuous commands.

use std::collections::BTreeSet;

use glam::{DQuat, EulerRot};

use crate::constants::{DEFAULT_ORIENTATION_DEG_DELTA, DEFAULT_POSITION_METER_DELTA};
use crate::teleop::command::{PoseCommand, Quaternion};
use crate::teleop::key::{ActiveKeySet, Axis, TeleopKey};
use crate::teleop::traits::CommandMapper;

/// Configuration for a [`PoseCommandMapper`].
#[derive(Debug, Clone, PartialEq)]
pub struct PoseMapperConfig {
    /// Position change per key press (m)
    pub position_delta: f64,
    /// Orientation change per key press (degrees)
    pub orientation_delta_deg: f64,
    /// Keys that drive the mapper; others are ignored
    pub recognized_keys: BTreeSet<TeleopKey>,
    /// Whether key events are processed
    pub enabled: bool,
}

impl Default for PoseMapperConfig {
    fn default() -> Self {
        Self {
            position_delta: DEFAULT_POSITION_METER_DELTA,
            orientation_delta_deg: DEFAULT_ORIENTATION_DEG_DELTA,
            recognized_keys: TeleopKey::all().iter().copied().collect(),
            enabled: true,
        }
    }
}

impl PoseMapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-press position (m) and orientation (degrees) steps.
    pub fn deltas(mut self, position_delta: f64, orientation_delta_deg: f64) -> Self {
        self.position_delta = position_delta;
        self.orientation_delta_deg = orientation_delta_deg;
        self
    }

    pub fn recognized_keys(mut self, keys: impl IntoIterator<Item = TeleopKey>) -> Self {
        self.recognized_keys = keys.into_iter().collect();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Convert roll/pitch/yaw in degrees to a quaternion.
///
/// Rotation order is Z (yaw), then Y (pitch), then X (roll), intrinsic,
/// as used by ROS 2.
pub fn euler_deg_to_quaternion(roll_deg: f64, pitch_deg: f64, yaw_deg: f64) -> Quaternion {
    DQuat::from_euler(
        EulerRot::ZYX,
        yaw_deg.to_radians(),
        pitch_deg.to_radians(),
        roll_deg.to_radians(),
    )
    .into()
}

/// Stateful mapper from held keys to a [`PoseCommand`] delta.
#[derive(Debug, Clone, Default)]
pub struct PoseCommandMapper {
    config: PoseMapperConfig,
    active: ActiveKeySet,
}

impl PoseCommandMapper {
    pub fn new(config: PoseMapperConfig) -> Self {
        Self {
            config,
            active: ActiveKeySet::new(),
        }
    }

    pub fn config(&self) -> &PoseMapperConfig {
        &self.config
    }

    /// Update the per-press deltas.
    pub fn set_deltas(&mut self, position_delta: f64, orientation_delta_deg: f64) {
        self.config.position_delta = position_delta;
        self.config.orientation_delta_deg = orientation_delta_deg;
    }

    /// The pose delta for the keys held right now.
    pub fn current_command(&self) -> PoseCommand {
        let mut command = PoseCommand::default();
        let (mut roll, mut pitch, mut yaw) = (0.0, 0.0, 0.0);

        for key in self.active.iter() {
            let (axis, sign) = key.binding();
            let position_step = sign * self.config.position_delta;
            let angle_step = sign * self.config.orientation_delta_deg;
            match axis {
                Axis::LinearX => command.position.x += position_step,
                Axis::LinearY => command.position.y += position_step,
                Axis::LinearZ => command.position.z += position_step,
                Axis::AngularX => roll += angle_step,
                Axis::AngularY => pitch += angle_step,
                Axis::AngularZ => yaw += angle_step,
            }
        }

        if roll != 0.0 || pitch != 0.0 || yaw != 0.0 {
            command.orientation = euler_deg_to_quaternion(roll, pitch, yaw);
        }
        command
    }

    fn accepts(&self, key: TeleopKey) -> bool {
        self.config.enabled && self.config.recognized_keys.contains(&key)
    }
}

impl CommandMapper for PoseCommandMapper {
    type Command = PoseCommand;

    fn on_key_down(&mut self, key: TeleopKey) -> Option<PoseCommand> {
        if !self.accepts(key) {
            return None;
        }
        self.active.press(key);

        let command = self.current_command();
        log::debug!(
            "Keys pressed: {} -> {:?}",
            self.active.iter().map(|k| k.as_char()).collect::<String>(),
            command
        );
        Some(command)
    }

    fn on_key_up(&mut self, key: TeleopKey) -> Option<PoseCommand> {
        if self.accepts(key) {
            self.active.release(key);
        }
        None
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teleop::command::Vector3;

    const EPSILON: f64 = 1e-9;

    fn assert_quat_eq(actual: Quaternion, expected: Quaternion) {
        assert!(
            (actual.x - expected.x).abs() < EPSILON
                && (actual.y - expected.y).abs() < EPSILON
                && (actual.z - expected.z).abs() < EPSILON
                && (actual.w - expected.w).abs() < EPSILON,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn test_translation_keeps_identity_orientation() {
        let mut mapper = PoseCommandMapper::default();
        mapper.on_key_down(TeleopKey::W);
        let command = mapper.on_key_down(TeleopKey::E).unwrap();

        assert_eq!(command.position, Vector3::new(0.1, 0.0, -0.1));
        assert_eq!(command.orientation, Quaternion::identity());
    }

    #[test]
    fn test_yaw_only() {
        let mut mapper = PoseCommandMapper::new(PoseMapperConfig {
            orientation_delta_deg: 90.0,
            ..PoseMapperConfig::default()
        });
        let command = mapper.on_key_down(TeleopKey::J).unwrap();

        let half = std::f64::consts::FRAC_1_SQRT_2;
        assert_quat_eq(
            command.orientation,
            Quaternion {
                x: 0.0,
                y: 0.0,
                z: half,
                w: half,
            },
        );
        assert!(command.position.is_zero());
    }

    #[test]
    fn test_roll_and_pitch_signs() {
        let roll = euler_deg_to_quaternion(60.0, 0.0, 0.0);
        let half = 30f64.to_radians();
        assert_quat_eq(
            roll,
            Quaternion {
                x: half.sin(),
                y: 0.0,
                z: 0.0,
                w: half.cos(),
            },
        );

        // "i" pitches by a negative angle.
        let mut mapper = PoseCommandMapper::new(PoseMapperConfig {
            orientation_delta_deg: 60.0,
            ..PoseMapperConfig::default()
        });
        let command = mapper.on_key_down(TeleopKey::I).unwrap();
        assert_quat_eq(
            command.orientation,
            Quaternion {
                x: 0.0,
                y: -half.sin(),
                z: 0.0,
                w: half.cos(),
            },
        );
    }

    #[test]
    fn test_combined_rotation_order() {
        // Yaw 90 then roll 90, intrinsic ZYX: q = qz * qx
        let q = euler_deg_to_quaternion(90.0, 0.0, 90.0);
        assert_quat_eq(
            q,
            Quaternion {
                x: 0.5,
                y: 0.5,
                z: 0.5,
                w: 0.5,
            },
        );
    }

    #[test]
    fn test_opposing_rotation_is_identity() {
        let mut mapper = PoseCommandMapper::default();
        mapper.on_key_down(TeleopKey::J);
        let command = mapper.on_key_down(TeleopKey::L).unwrap();
        assert_eq!(command.orientation, Quaternion::identity());
    }

    #[test]
    fn test_release_emits_nothing() {
        let mut mapper = PoseCommandMapper::default();
        mapper.on_key_down(TeleopKey::A);
        assert_eq!(mapper.on_key_up(TeleopKey::A), None);
        assert!(mapper.pressed_keys().is_empty());
    }

    #[test]
    fn test_disabled() {
        let mut mapper = PoseCommandMapper::default();
        mapper.set_enabled(false);
        assert_eq!(mapper.on_key_down(TeleopKey::W), None);
        assert!(mapper.pressed_keys().is_empty());
    }
}
