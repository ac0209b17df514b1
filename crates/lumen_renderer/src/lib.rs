//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer: textured materials scatter rays off spheres,
//! rectangles, boxes, instanced and volumetric geometry, accelerated by a
//! BVH and rendered in parallel buckets.

mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod instance;
mod material;
mod medium;
mod perlin;
mod rect;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;

pub use bucket::{
    generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{GeometryError, GeometryResult};
pub use hittable::{FlipFace, HitRecord, Hittable, HittableList};
pub use instance::{RotateY, Translate};
pub use material::{
    reflect, refract, schlick, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use rect::{AxisAlignedRect, Cuboid, Plane};
pub use renderer::{
    color_to_rgb, linear_to_gamma, luminance, radiance, render, render_pixel, sky_gradient,
    Background, ImageBuffer, RenderConfig,
};
pub use sphere::{sphere_uv, MovingSphere, Sphere};
pub use texture::{CheckerTexture, Color, ImageTexture, NoiseTexture, SolidColor, Texture};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
