//! Global constants for powerpack

/// Default linear speed per held key (m/s)
pub const DEFAULT_LINEAR_SPEED_METER: f64 = 0.2;

/// Default angular speed per held key (rad/s, about 5 degrees)
pub const DEFAULT_ANGULAR_SPEED_RAD: f64 = 0.0873;

/// Default camera position change per key press (m)
pub const DEFAULT_POSITION_METER_DELTA: f64 = 0.1;

/// Default camera orientation change per key press (degrees)
pub const DEFAULT_ORIENTATION_DEG_DELTA: f64 = 2.0;

/// Default font size for detection labels
pub const DEFAULT_LABEL_FONT_SIZE: f64 = 12.0;

/// Default vertical offset of the id/score text below the box top edge
pub const DEFAULT_LABEL_Y_OFFSET: f64 = 12.0;

/// Outline thickness of detection boxes
pub const BOUNDING_BOX_THICKNESS: f64 = 2.0;

/// Name of the host variable holding the default object label map
pub const DEFAULT_OBJECT_LABEL_VAR_NAME: &str = "ipp_default_object_label";

/// Image topic preferred as default when present
pub const PREFERRED_IMAGE_TOPIC: &str = "/resize/image";

/// Schema names used on the host
pub mod schema {
    pub const IMAGE: &str = "sensor_msgs/msg/Image";
    pub const DETECTION_2D_ARRAY: &str = "vision_msgs/msg/Detection2DArray";
    pub const IMAGE_ANNOTATIONS: &str = "foxglove.ImageAnnotations";
    pub const TWIST: &str = "geometry_msgs/msg/Twist";
    pub const POSE: &str = "geometry_msgs/msg/Pose";
}
