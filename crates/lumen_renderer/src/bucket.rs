//! Tiled parallel rendering.
//!
//! The image is cut into buckets, each rendered on a rayon worker with a
//! generator seeded from its position.

use std::time::Instant;

use crate::renderer::{render_pixel, ImageBuffer};
use crate::{Camera, Color, Hittable, RenderConfig};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Top-left pixel column
    pub x: u32,
    /// Top-left pixel row (row 0 is the top of the image)
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Pixels covered by this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator, fixed by its position in the image.
    pub fn seed(&self, base: u64) -> u64 {
        let position = (u64::from(self.y) << 32) | u64::from(self.x);
        base.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ position
    }
}

/// Tile edge length used when a config does not set one.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Cover a `width` x `height` image with tiles of at most `bucket_size`
/// pixels per side, ordered by distance from the image center.
///
/// Tiles on the right and bottom edges are cropped to the image. A zero
/// `bucket_size` is treated as 1.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| {
                Bucket::new(x, y, size.min(width - x), size.min(height - y), 0)
            })
        })
        .collect();

    sort_center_out(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Order tiles by squared distance from their center to the image center.
fn sort_center_out(buckets: &mut [Bucket], width: u32, height: u32) {
    let center = (width as f32 / 2.0, height as f32 / 2.0);

    let distance = |b: &Bucket| {
        let dx = b.x as f32 + b.width as f32 / 2.0 - center.0;
        let dy = b.y as f32 + b.height as f32 / 2.0 - center.1;
        dx * dx + dy * dy
    };

    // Stable: equidistant tiles stay in row-major order
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render every pixel of `bucket` in row-major order, drawing from `rng`.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(camera, world, global_x, global_y, config, rng);
            pixels.push(color);
        }
    }

    pixels
}

/// Colors produced for one bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Row-major within the bucket
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into their place in `image`.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let mut colors = self.pixels.iter();
        for local_y in 0..self.bucket.height {
            for local_x in 0..self.bucket.width {
                if let Some(color) = colors.next() {
                    image.set(self.bucket.x + local_x, self.bucket.y + local_y, *color);
                }
            }
        }
    }
}

/// Render the scene across all cores, one bucket per task.
///
/// Each bucket draws from its own generator seeded by `config.seed` and the
/// bucket's position, so the output does not depend on thread scheduling.
pub fn render_parallel(camera: &Camera, world: &dyn Hittable, config: &RenderConfig) -> ImageBuffer {
    use rayon::prelude::*;

    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}: {} buckets on {} threads",
        camera.image_width,
        camera.image_height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let bucket_start = Instant::now();
            let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
            let pixels = render_bucket(bucket, camera, world, config, &mut rng);
            log::debug!(
                "Bucket {} at ({}, {}) done in {:.2?}",
                bucket.index,
                bucket.x,
                bucket.y,
                bucket_start.elapsed()
            );
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        result.write_into(&mut image);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
