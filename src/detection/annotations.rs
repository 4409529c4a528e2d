//! `foxglove.ImageAnnotations` output types.

use serde::{Deserialize, Serialize};

use crate::detection::types::Time;

/// Annotation timestamp. Same instant as [`Time`] under the host's field names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub sec: i32,
    pub nsec: u32,
}

impl From<Time> for Timestamp {
    fn from(time: Time) -> Self {
        Self {
            sec: time.sec,
            nsec: time.nanosec,
        }
    }
}

/// A point in image pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const GREEN: Color = Color::rgba(0.0, 1.0, 0.0, 1.0);
}

/// How the points of a [`PointsAnnotation`] are connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PointsAnnotationType {
    #[default]
    Unknown,
    Points,
    LineLoop,
    LineStrip,
    LineList,
}

impl From<PointsAnnotationType> for u8 {
    fn from(kind: PointsAnnotationType) -> Self {
        match kind {
            PointsAnnotationType::Unknown => 0,
            PointsAnnotationType::Points => 1,
            PointsAnnotationType::LineLoop => 2,
            PointsAnnotationType::LineStrip => 3,
            PointsAnnotationType::LineList => 4,
        }
    }
}

impl TryFrom<u8> for PointsAnnotationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PointsAnnotationType::Unknown),
            1 => Ok(PointsAnnotationType::Points),
            2 => Ok(PointsAnnotationType::LineLoop),
            3 => Ok(PointsAnnotationType::LineStrip),
            4 => Ok(PointsAnnotationType::LineList),
            other => Err(format!("invalid points annotation type {}", other)),
        }
    }
}

/// Circle annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleAnnotation {
    pub timestamp: Timestamp,
    pub position: Point2,
    pub diameter: f64,
    pub thickness: f64,
    pub fill_color: Color,
    pub outline_color: Color,
}

/// Set of points, drawn as markers or a polyline depending on `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsAnnotation {
    pub timestamp: Timestamp,
    #[serde(rename = "type")]
    pub kind: PointsAnnotationType,
    pub points: Vec<Point2>,
    pub outline_color: Color,
    #[serde(default)]
    pub outline_colors: Vec<Color>,
    pub fill_color: Color,
    pub thickness: f64,
}

/// Text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    pub timestamp: Timestamp,
    pub position: Point2,
    pub text: String,
    pub font_size: f64,
    pub text_color: Color,
    pub background_color: Color,
}

/// Annotations drawn over an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnnotations {
    #[serde(default)]
    pub circles: Vec<CircleAnnotation>,
    #[serde(default)]
    pub points: Vec<PointsAnnotation>,
    #[serde(default)]
    pub texts: Vec<TextAnnotation>,
}

impl ImageAnnotations {
    pub fn is_empty(&self) -> bool {
        self.circles.is_empty() && self.points.is_empty() && self.texts.is_empty()
    }
}
