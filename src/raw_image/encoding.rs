//! Pixel channel layouts understood by the decoder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::raw_image::error::DecodeError;

/// Channel layout of a raw sensor image row.
///
/// Names match the `encoding` field of `sensor_msgs/msg/Image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    /// Single 8-bit luminance channel
    Mono8,
    /// Red, green, blue
    Rgb8,
    /// Blue, green, red
    Bgr8,
    /// Red, green, blue, alpha
    Rgba8,
    /// Blue, green, red, alpha
    Bgra8,
}

impl ImageEncoding {
    /// All supported encodings.
    pub fn all() -> &'static [ImageEncoding] {
        &[
            ImageEncoding::Mono8,
            ImageEncoding::Rgb8,
            ImageEncoding::Bgr8,
            ImageEncoding::Rgba8,
            ImageEncoding::Bgra8,
        ]
    }

    /// Wire name of this encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageEncoding::Mono8 => "mono8",
            ImageEncoding::Rgb8 => "rgb8",
            ImageEncoding::Bgr8 => "bgr8",
            ImageEncoding::Rgba8 => "rgba8",
            ImageEncoding::Bgra8 => "bgra8",
        }
    }

    /// Number of bytes per pixel.
    pub fn channels(&self) -> usize {
        match self {
            ImageEncoding::Mono8 => 1,
            ImageEncoding::Rgb8 | ImageEncoding::Bgr8 => 3,
            ImageEncoding::Rgba8 | ImageEncoding::Bgra8 => 4,
        }
    }

    /// Read one pixel starting at `index` and return it as RGBA.
    ///
    /// Bytes past the end of `src` read as 0. Alpha is 255 for layouts
    /// without an alpha channel.
    pub fn read_pixel(&self, src: &[u8], index: usize) -> [u8; 4] {
        let byte = |offset: usize| {
            index
                .checked_add(offset)
                .and_then(|i| src.get(i))
                .copied()
                .unwrap_or(0)
        };

        match self {
            ImageEncoding::Mono8 => {
                let v = byte(0);
                [v, v, v, 255]
            }
            ImageEncoding::Rgb8 => [byte(0), byte(1), byte(2), 255],
            ImageEncoding::Bgr8 => [byte(2), byte(1), byte(0), 255],
            ImageEncoding::Rgba8 => [byte(0), byte(1), byte(2), byte(3)],
            ImageEncoding::Bgra8 => [byte(2), byte(1), byte(0), byte(3)],
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageEncoding {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageEncoding::all()
            .iter()
            .copied()
            .find(|encoding| encoding.as_str() == s)
            .ok_or_else(|| DecodeError::UnsupportedEncoding(s.to_string()))
    }
}
