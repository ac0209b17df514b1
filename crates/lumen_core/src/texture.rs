//! Decoded bitmaps backing image textures.
//!
//! The renderer never decodes files itself: it samples an `ImageData`
//! loaded here once, before rendering, and shared read-only afterwards.

use std::path::Path;

use lumen_math::Vec3;
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded RGB bitmap in linear float format.
#[derive(Clone, Debug)]
pub struct ImageData {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Linear RGB pixels, row-major, row 0 at the top of the image
    pub pixels: Vec<Vec3>,

    /// Original file path (for debugging)
    pub path: String,
}

impl ImageData {
    /// Create an image from pixel data.
    ///
    /// Returns `TextureError::Empty` when the dimensions don't describe any
    /// pixel or disagree with the pixel count.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Vec3>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(TextureError::Empty(path));
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Load and decode an image file (any format the `image` crate reads).
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels = rgb
            .pixels()
            .map(|p| {
                Vec3::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        let data = Self::new(width, height, pixels, path.to_string_lossy())?;
        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            data.path,
            data.width,
            data.height,
            data.size_bytes() as f32 / 1024.0
        );
        Ok(data)
    }

    /// Nearest-pixel lookup at `(u, v)`.
    ///
    /// `u` runs left to right, `v` bottom to top. Coordinates outside
    /// [0,1] are clamped first.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        let u = clamp_unit(u);
        let v = 1.0 - clamp_unit(v);

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        self.pixels[(j * self.width + i) as usize]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Vec3>()
    }
}

/// Clamp into [0,1]; NaN maps to 0.
fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
