//! Command messages published by the teleoperation panels.

use serde::{Deserialize, Serialize};

use crate::constants::schema;
use crate::teleop::key::Axis;

/// A message type published to the host, tagged with its schema name.
pub trait CommandMessage: Serialize + Clone {
    /// Host schema name used when advertising the topic.
    const SCHEMA_NAME: &'static str;
}

/// Three-component vector (`geometry_msgs/msg/Vector3`, `Point`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Linear and angular velocity (`geometry_msgs/msg/Twist`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityCommand {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl VelocityCommand {
    /// The stop command: all components zero.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.linear.is_zero() && self.angular.is_zero()
    }

    /// Add `amount` to one axis.
    pub fn add(&mut self, axis: Axis, amount: f64) {
        match axis {
            Axis::LinearX => self.linear.x += amount,
            Axis::LinearY => self.linear.y += amount,
            Axis::LinearZ => self.linear.z += amount,
            Axis::AngularX => self.angular.x += amount,
            Axis::AngularY => self.angular.y += amount,
            Axis::AngularZ => self.angular.z += amount,
        }
    }
}

impl CommandMessage for VelocityCommand {
    const SCHEMA_NAME: &'static str = schema::TWIST;
}

/// Rotation quaternion (`geometry_msgs/msg/Quaternion`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<glam::DQuat> for Quaternion {
    fn from(q: glam::DQuat) -> Self {
        Self {
            x: q.x,
            y: q.y,
            z: q.z,
            w: q.w,
        }
    }
}

/// Position and orientation delta (`geometry_msgs/msg/Pose`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseCommand {
    pub position: Vector3,
    pub orientation: Quaternion,
}

impl CommandMessage for PoseCommand {
    const SCHEMA_NAME: &'static str = schema::POSE;
}
