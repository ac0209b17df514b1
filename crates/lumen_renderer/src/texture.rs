//! Texture trait and procedural/image textures feeding material color.

use std::path::Path;
use std::sync::Arc;

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
use lumen_core::{ImageData, TextureResult};
use lumen_math::Vec3;
use rand::RngCore;

/// Color type alias (linear RGB, components typically 0-1 but unbounded for lights)
pub type Color = Vec3;

/// Color returned by an image texture with no backing image.
const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// A pure function from surface parametrization and world point to color.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A single constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3-D checkerboard partitioned by the sign of `sin(10x)·sin(10y)·sin(10z)`.
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    /// Checker of two solid colors.
    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(even)), Arc::new(SolidColor::new(odd)))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like gray bands: `0.5·(1 + sin(scale·z + 10·turb(p)))`.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, DEFAULT_TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

/// Texture sampled from a decoded bitmap at (u, v).
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image: Some(image) }
    }

    /// Decode `path` and wrap it.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        Ok(Self::new(Arc::new(ImageData::load(path)?)))
    }

    /// Placeholder that renders solid cyan, for scenes whose image failed to load.
    pub fn missing() -> Self {
        Self { image: None }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        match &self.image {
            Some(image) => image.sample(u, v),
            None => MISSING_IMAGE_COLOR,
        }
    }
}
