//! Error types for image decoding.

use thiserror::Error;

/// Errors that can occur while decoding a raw sensor image.
///
/// Truncated buffers are not an error; missing bytes decode as zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The encoding string is not one of the supported layouts
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// The output bitmap would not fit in memory
    #[error("Image dimensions {width}x{height} are too large to decode")]
    DimensionsTooLarge {
        /// Declared image width
        width: u32,
        /// Declared image height
        height: u32,
    },
}
