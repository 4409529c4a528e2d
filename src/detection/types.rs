//! `vision_msgs` wire message types.
//!
//! Field names follow the ROS 2 message definitions so the host's JSON
//! form deserializes directly. Optional parts default when absent.

use serde::{Deserialize, Serialize};

use crate::teleop::{Quaternion, Vector3};

/// `builtin_interfaces/msg/Time`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub sec: i32,
    pub nanosec: u32,
}

/// `std_msgs/msg/Header`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub stamp: Time,
    #[serde(default)]
    pub frame_id: String,
}

/// Two-component vector used for 2D positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// `vision_msgs/msg/Pose2D`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    pub position: Vector2,
    #[serde(default)]
    pub theta: f64,
}

/// `vision_msgs/msg/BoundingBox2D`: center plus full extents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    pub center: Pose2D,
    pub size_x: f64,
    pub size_y: f64,
}

impl BoundingBox2D {
    pub fn left(&self) -> f64 {
        self.center.position.x - self.size_x / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.position.x + self.size_x / 2.0
    }

    pub fn top(&self) -> f64 {
        self.center.position.y - self.size_y / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.position.y + self.size_y / 2.0
    }
}

/// `geometry_msgs/msg/Pose`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub orientation: Quaternion,
}

/// `geometry_msgs/msg/PoseWithCovariance`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseWithCovariance {
    #[serde(default)]
    pub pose: Pose,
    /// Row-major 6x6 covariance, 36 entries
    #[serde(default)]
    pub covariance: Vec<f64>,
}

/// `vision_msgs/msg/ObjectHypothesis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectHypothesis {
    pub class_id: String,
    /// Confidence in [0, 1]
    pub score: f64,
}

/// `vision_msgs/msg/ObjectHypothesisWithPose`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectHypothesisWithPose {
    pub hypothesis: ObjectHypothesis,
    #[serde(default)]
    pub pose: PoseWithCovariance,
}

/// `vision_msgs/msg/Detection2D`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection2D {
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub results: Vec<ObjectHypothesisWithPose>,
    pub bbox: BoundingBox2D,
    #[serde(default)]
    pub id: String,
}

impl Detection2D {
    /// The first (best) hypothesis, if any.
    pub fn top_hypothesis(&self) -> Option<&ObjectHypothesis> {
        self.results.first().map(|result| &result.hypothesis)
    }
}

/// `vision_msgs/msg/Detection2DArray`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection2DArray {
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub detections: Vec<Detection2D>,
}
