//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a hard depth cutoff
//! - Solid or sky-gradient backgrounds
//! - Anti-aliasing via jittered multi-sampling
//! - Square-root gamma and 8-bit quantization for output

use std::path::Path;
use std::time::Instant;

use crate::{sampling::gen_f32, Camera, Color, Hittable, Ray};
use lumen_math::Interval;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Minimum hit distance for secondary rays, suppressing self-intersection.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Uniform ambient color
    Solid(Color),
    /// White at the horizon blending to light blue overhead
    SkyGradient,
}

impl Background {
    /// Radiance arriving along an escaped ray.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance for rays that hit nothing
    pub background: Background,
    /// Base seed for the per-bucket generators of a parallel render
    pub seed: u64,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
            seed: 0,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Estimate the radiance arriving along a ray.
///
/// This is the core path tracing function. It traces the ray through the
/// scene, adding emission at every hit and recursing on the scattered ray
/// until a surface absorbs it, the ray escapes, or `depth` runs out.
pub fn radiance(
    ray: &Ray,
    background: &Background,
    world: &dyn Hittable,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::from_min(SHADOW_ACNE_EPSILON), rng) else {
        return background.color(ray);
    };

    // Get emission from material (for lights)
    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let incoming = radiance(&result.scattered, background, world, depth - 1, rng);
            emitted + result.attenuation * incoming
        }
        // Absorbed: only the surface's own light
        None => emitted,
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Displayable range of a gamma-corrected channel before quantization.
const INTENSITY: Interval = Interval { min: 0.0, max: 0.999 };

/// Quantize one linear channel: `floor(256 * clamp(sqrt(c), 0, 0.999))`.
#[inline]
fn channel_to_u8(linear: f32) -> u8 {
    (256.0 * INTENSITY.clamp(linear_to_gamma(linear))) as u8
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
    ]
}

/// Rec. 709 relative luminance of a linear color.
#[inline]
pub fn luminance(color: Color) -> f32 {
    0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z
}

/// Render a single pixel with multi-sampling.
///
/// Pixel rows are numbered from the top. Samples with a non-finite or
/// negative component are counted as black rather than poisoning the average.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let span_x = camera.image_width.saturating_sub(1).max(1) as f32;
    let span_y = camera.image_height.saturating_sub(1).max(1) as f32;
    let row_from_bottom = camera.image_height.saturating_sub(1).saturating_sub(y) as f32;

    let mut pixel_color = Color::ZERO;
    let mut discarded = 0;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / span_x;
        let t = (row_from_bottom + gen_f32(rng)) / span_y;
        let ray = camera.get_ray(s, t, rng);

        let sample = radiance(&ray, &config.background, world, config.max_depth, rng);
        if sample.is_finite() && sample.min_element() >= 0.0 {
            pixel_color += sample;
        } else {
            discarded += 1;
        }
    }

    if discarded > 0 {
        log::trace!("pixel ({x}, {y}): discarded {discarded} degenerate samples");
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Linear-radiance image, stored row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Gamma-corrected RGB bytes, three per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|color| color_to_rgb(*color)).collect()
    }

    /// Mean luminance over all pixels (0 for an empty image).
    pub fn mean_luminance(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        self.pixels.iter().map(|color| luminance(*color)).sum::<f32>() / self.pixels.len() as f32
    }

    /// Convert to an `image` crate RGB image.
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb(self.get(x, y)))
        })
    }

    /// Encode the image as PNG at `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let path = path.as_ref();
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render the entire scene to an image buffer.
///
/// This is a simple single-threaded renderer driven by the caller's
/// generator; see [`crate::render_parallel`] for the bucketed version.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let start = Instant::now();
    log::info!(
        "Rendering {}x{} at {} spp, max depth {}",
        camera.image_width,
        camera.image_height,
        config.samples_per_pixel,
        config.max_depth
    );

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, world, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
