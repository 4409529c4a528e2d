//! Raw sensor image decoding.
//!
//! Converts `sensor_msgs/msg/Image` style buffers (mono8, rgb8, bgr8, rgba8,
//! bgra8) into RGBA bitmaps for a 2D drawing surface, and computes how a
//! bitmap fits inside a panel.

mod decoder;
mod encoding;
mod error;
mod fit;

pub use decoder::{
    EncodedImage, FrameDecoder, RgbaBitmap, SensorImage, decode, decode_into, decode_or_skip,
};
pub use encoding::ImageEncoding;
pub use error::DecodeError;
pub use fit::{Dimensions, ImageFit, calculate_image_fit};
