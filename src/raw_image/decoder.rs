//! Raw sensor image to RGBA bitmap conversion.
//!
//! Sensor images arrive as row-major byte buffers with a row stride that may
//! include padding. The decoder walks every destination pixel, computes the
//! source offset from the stride and channel count, and reads the channels
//! for the declared encoding. Bytes past the end of the buffer read as zero,
//! so truncated frames still render best-effort.

use serde::{Deserialize, Serialize};

use crate::raw_image::encoding::ImageEncoding;
use crate::raw_image::error::DecodeError;

/// Borrowed view of an encoded image buffer plus its layout metadata.
#[derive(Debug, Clone, Copy)]
pub struct EncodedImage<'a> {
    /// Number of columns
    pub width: u32,
    /// Number of rows
    pub height: u32,
    /// Bytes per row, normally `width * channels` or more when padded
    pub row_stride: u32,
    /// Encoding name as sent on the wire (e.g. "bgr8")
    pub encoding: &'a str,
    /// Pixel bytes, expected to be at least `row_stride * height` long
    pub data: &'a [u8],
}

impl<'a> EncodedImage<'a> {
    /// Create a view over `data` with the given layout.
    pub fn new(width: u32, height: u32, row_stride: u32, encoding: &'a str, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            row_stride,
            encoding,
            data,
        }
    }

    /// Create a view with a tightly packed row stride for a known encoding.
    pub fn packed(width: u32, height: u32, encoding: ImageEncoding, data: &'a [u8]) -> Self {
        let row_stride = width.saturating_mul(encoding.channels() as u32);
        Self::new(width, height, row_stride, encoding.as_str(), data)
    }
}

/// `sensor_msgs/msg/Image` as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorImage {
    /// Message header
    #[serde(default)]
    pub header: crate::detection::Header,
    /// Image height, number of rows
    pub height: u32,
    /// Image width, number of columns
    pub width: u32,
    /// Channel meaning, ordering and size
    pub encoding: String,
    /// Whether multi-byte channels are big-endian (unused for 8-bit layouts)
    #[serde(default)]
    pub is_bigendian: u8,
    /// Full row length in bytes
    pub step: u32,
    /// Image data, `step * height` bytes
    pub data: Vec<u8>,
}

impl SensorImage {
    /// Borrow this message as a decoder input.
    pub fn as_encoded(&self) -> EncodedImage<'_> {
        EncodedImage::new(self.width, self.height, self.step, &self.encoding, &self.data)
    }
}

/// An RGBA8 bitmap ready to be drawn on a 2D surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RgbaBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaBitmap {
    /// Bitmap width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bitmap height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// RGBA value of the pixel at (`x`, `y`), if inside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(index..index + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Take ownership of the raw pixel bytes.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Convert into an `image` crate buffer for saving or further processing.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }
}

/// Decode an encoded image into a new RGBA bitmap.
///
/// Fails only when the encoding is not supported (or the output would not
/// fit in memory); short buffers and undersized strides are zero-filled.
pub fn decode(image: &EncodedImage<'_>) -> Result<RgbaBitmap, DecodeError> {
    let mut bitmap = RgbaBitmap::default();
    decode_into(image, &mut bitmap)?;
    Ok(bitmap)
}

/// Decode into an existing bitmap, reusing its allocation.
///
/// On error `out` is left untouched. On success it is resized and every
/// byte is overwritten, so the result is identical to [`decode`].
pub fn decode_into(image: &EncodedImage<'_>, out: &mut RgbaBitmap) -> Result<(), DecodeError> {
    let encoding: ImageEncoding = image.encoding.parse()?;

    let width = image.width as usize;
    let height = image.height as usize;
    let row_bytes = width
        .checked_mul(4)
        .ok_or(DecodeError::DimensionsTooLarge {
            width: image.width,
            height: image.height,
        })?;
    let len = row_bytes
        .checked_mul(height)
        .ok_or(DecodeError::DimensionsTooLarge {
            width: image.width,
            height: image.height,
        })?;

    log::trace!(
        "Decoding {}x{} {} image (stride {}, {} bytes)",
        image.width,
        image.height,
        encoding,
        image.row_stride,
        image.data.len()
    );

    out.width = image.width;
    out.height = image.height;
    out.pixels.clear();
    out.pixels.resize(len, 0);

    if len == 0 {
        return Ok(());
    }

    let channels = encoding.channels();
    let stride = image.row_stride as usize;

    for (y, row) in out.pixels.chunks_exact_mut(row_bytes).enumerate() {
        let row_start = y.saturating_mul(stride);
        for (x, dst) in row.chunks_exact_mut(4).enumerate() {
            let src_index = row_start.saturating_add(x.saturating_mul(channels));
            dst.copy_from_slice(&encoding.read_pixel(image.data, src_index));
        }
    }

    Ok(())
}

/// Decode a frame, logging and skipping it when the encoding is unsupported.
pub fn decode_or_skip(image: &EncodedImage<'_>) -> Option<RgbaBitmap> {
    match decode(image) {
        Ok(bitmap) => Some(bitmap),
        Err(e) => {
            log::warn!("Skipping frame: {}", e);
            None
        }
    }
}

/// Per-panel frame decoder that keeps the last decoded bitmap.
///
/// Reuses the bitmap allocation from frame to frame. A frame with an
/// unsupported encoding clears the current bitmap.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    bitmap: RgbaBitmap,
    has_frame: bool,
}

impl FrameDecoder {
    /// Create a decoder with no frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the latest frame. `None` clears the current frame.
    pub fn update(&mut self, frame: Option<&EncodedImage<'_>>) -> Option<&RgbaBitmap> {
        let Some(frame) = frame else {
            self.has_frame = false;
            return None;
        };

        match decode_into(frame, &mut self.bitmap) {
            Ok(()) => self.has_frame = true,
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                self.has_frame = false;
            }
        }
        self.current()
    }

    /// The last successfully decoded frame, if any.
    pub fn current(&self) -> Option<&RgbaBitmap> {
        self.has_frame.then_some(&self.bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_single(encoding: &str, data: &[u8]) -> [u8; 4] {
        let channels = data.len() as u32;
        let image = EncodedImage::new(1, 1, channels, encoding, data);
        let bitmap = decode(&image).unwrap();
        bitmap.pixel(0, 0).unwrap()
    }

    #[test]
    fn test_single_pixel_per_encoding() {
        let cases: &[(&str, &[u8], [u8; 4])] = &[
            ("mono8", &[77], [77, 77, 77, 255]),
            ("rgb8", &[10, 20, 30], [10, 20, 30, 255]),
            ("bgr8", &[10, 20, 30], [30, 20, 10, 255]),
            ("rgba8", &[10, 20, 30, 40], [10, 20, 30, 40]),
            ("bgra8", &[10, 20, 30, 40], [30, 20, 10, 40]),
        ];

        for (encoding, data, expected) in cases {
            assert_eq!(decode_single(encoding, data), *expected, "{}", encoding);
        }
    }

    #[test]
    fn test_output_length() {
        let data = vec![0u8; 6 * 4 * 3];
        let image = EncodedImage::packed(6, 4, ImageEncoding::Rgb8, &data);
        let bitmap = decode(&image).unwrap();
        assert_eq!(bitmap.width(), 6);
        assert_eq!(bitmap.height(), 4);
        assert_eq!(bitmap.pixels().len(), 6 * 4 * 4);
    }

    #[test]
    fn test_row_stride_padding_is_skipped() {
        // 2x2 rgb8 with two bytes of padding per row.
        let data = [
            1, 2, 3, 4, 5, 6, 0xEE, 0xEE, //
            7, 8, 9, 10, 11, 12, 0xEE, 0xEE,
        ];
        let image = EncodedImage::new(2, 2, 8, "rgb8", &data);
        let bitmap = decode(&image).unwrap();
        assert_eq!(
            bitmap.pixels(),
            &[
                1, 2, 3, 255, 4, 5, 6, 255, //
                7, 8, 9, 255, 10, 11, 12, 255,
            ]
        );
    }

    #[test]
    fn test_truncated_buffer_zero_fills() {
        let data = [100, 101, 102, 103];
        let image = EncodedImage::new(2, 2, 8, "rgba8", &data);
        let bitmap = decode(&image).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([100, 101, 102, 103]));
        assert_eq!(bitmap.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(bitmap.pixel(0, 1), Some([0, 0, 0, 0]));
        assert_eq!(bitmap.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_empty_buffer_opaque_for_rgb() {
        let image = EncodedImage::new(3, 1, 9, "bgr8", &[]);
        let bitmap = decode(&image).unwrap();
        assert_eq!(bitmap.pixels(), &[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_undersized_stride_does_not_panic() {
        // Stride of 1 byte for a 2-wide rgb8 image: rows overlap.
        let data = [1, 2, 3, 4, 5, 6, 7];
        let image = EncodedImage::new(2, 2, 1, "rgb8", &data);
        let bitmap = decode(&image).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(bitmap.pixel(1, 0), Some([4, 5, 6, 255]));
        assert_eq!(bitmap.pixel(0, 1), Some([2, 3, 4, 255]));
        assert_eq!(bitmap.pixel(1, 1), Some([5, 6, 7, 255]));
    }

    #[test]
    fn test_huge_stride_reads_zeros() {
        let data = [9, 9, 9];
        let image = EncodedImage::new(1, 2, u32::MAX, "rgb8", &data);
        let bitmap = decode(&image).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([9, 9, 9, 255]));
        assert_eq!(bitmap.pixel(0, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_zero_dimensions() {
        let image = EncodedImage::new(0, 10, 0, "mono8", &[1, 2, 3]);
        let bitmap = decode(&image).unwrap();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.height(), 10);

        let image = EncodedImage::new(10, 0, 10, "mono8", &[1, 2, 3]);
        assert!(decode(&image).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_encoding() {
        let image = EncodedImage::new(1, 1, 4, "32FC1", &[0, 0, 0, 0]);
        assert_eq!(
            decode(&image),
            Err(DecodeError::UnsupportedEncoding("32FC1".to_string()))
        );
    }

    #[test]
    fn test_decode_into_leaves_output_on_error() {
        let good = EncodedImage::new(1, 1, 1, "mono8", &[5]);
        let mut bitmap = decode(&good).unwrap();
        let before = bitmap.clone();

        let bad = EncodedImage::new(4, 4, 16, "yuv422", &[0; 64]);
        assert!(decode_into(&bad, &mut bitmap).is_err());
        assert_eq!(bitmap, before);
    }

    #[test]
    fn test_decode_into_matches_decode() {
        let data: Vec<u8> = (0..48).collect();
        let image = EncodedImage::packed(4, 3, ImageEncoding::Bgra8, &data);

        // Start from a larger stale bitmap to check every byte is rewritten.
        let stale = vec![0xAB; 1000];
        let mut reused = decode(&EncodedImage::packed(10, 25, ImageEncoding::Rgba8, &stale)).unwrap();
        decode_into(&image, &mut reused).unwrap();

        assert_eq!(reused, decode(&image).unwrap());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let data: Vec<u8> = (0..=255).cycle().take(5 * 7 * 3).collect();
        let image = EncodedImage::packed(5, 7, ImageEncoding::Bgr8, &data);
        assert_eq!(decode(&image).unwrap(), decode(&image).unwrap());
    }

    #[test]
    fn test_decode_or_skip() {
        assert!(decode_or_skip(&EncodedImage::new(1, 1, 2, "16UC1", &[0, 0])).is_none());
        assert!(decode_or_skip(&EncodedImage::new(1, 1, 1, "mono8", &[0])).is_some());
    }

    #[test]
    fn test_frame_decoder_tracks_last_frame() {
        let mut frames = FrameDecoder::new();
        assert!(frames.current().is_none());

        let frame = EncodedImage::new(1, 1, 3, "rgb8", &[1, 2, 3]);
        let bitmap = frames.update(Some(&frame)).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some([1, 2, 3, 255]));

        let bad = EncodedImage::new(1, 1, 3, "nv12", &[1, 2, 3]);
        assert!(frames.update(Some(&bad)).is_none());

        frames.update(Some(&frame));
        assert!(frames.update(None).is_none());
        assert!(frames.current().is_none());
    }

    #[test]
    fn test_sensor_image_json() {
        let json = r#"{
            "header": { "stamp": { "sec": 1, "nanosec": 2 }, "frame_id": "cam" },
            "height": 1, "width": 2, "encoding": "bgr8",
            "is_bigendian": 0, "step": 6, "data": [1, 2, 3, 4, 5, 6]
        }"#;
        let msg: SensorImage = serde_json::from_str(json).unwrap();
        let bitmap = decode(&msg.as_encoded()).unwrap();
        assert_eq!(bitmap.pixels(), &[3, 2, 1, 255, 6, 5, 4, 255]);
    }

    #[test]
    fn test_into_rgba_image() {
        let image = EncodedImage::new(2, 1, 2, "mono8", &[10, 20]);
        let rgba = decode(&image).unwrap().into_rgba_image().unwrap();
        assert_eq!(rgba.dimensions(), (2, 1));
        assert_eq!(rgba.get_pixel(1, 0).0, [20, 20, 20, 255]);
    }
}
