//! Fitting a decoded image into a panel.
//!
//! The image is scaled to the container width and centered vertically.

/// Width and height of a container or image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Scale and offset that place an image inside a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFit {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
}

/// Compute the fit of `image` into `container`.
///
/// Missing image dimensions count as 1x1. A container with zero width
/// keeps scale 1.
pub fn calculate_image_fit(container: Dimensions, image: Option<Dimensions>) -> ImageFit {
    let image = image.unwrap_or(Dimensions::new(1.0, 1.0));
    let scale = if container.width > 0.0 {
        container.width / image.width
    } else {
        1.0
    };
    let scaled_height = image.height * scale;

    ImageFit {
        scale,
        x: 0.0,
        y: (container.height - scaled_height) / 2.0,
    }
}
