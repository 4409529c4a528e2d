//! Object detection overlays.
//!
//! Converts `vision_msgs/msg/Detection2DArray` messages into
//! `foxglove.ImageAnnotations` so detections render on top of camera images.

mod annotations;
mod converter;
mod error;
mod labels;
mod types;

pub use annotations::{
    CircleAnnotation, Color, ImageAnnotations, Point2, PointsAnnotation, PointsAnnotationType,
    TextAnnotation, Timestamp,
};
pub use converter::{
    ConverterOptions, Detection2DArrayConverter, DisplayOptions, MessageConverter, convert,
    format_score,
};
pub use error::ConverterError;
pub use labels::{ObjectLabels, Variables, ensure_default_label_variable, resolve_labels};
pub use types::{
    BoundingBox2D, Detection2D, Detection2DArray, Header, ObjectHypothesis,
    ObjectHypothesisWithPose, Pose, Pose2D, PoseWithCovariance, Time, Vector2,
};
