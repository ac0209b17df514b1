//! Participating media: fog and smoke of constant density inside a boundary.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f32,
    Color, Isotropic, Ray, Texture,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Offset past the entry point when probing the boundary for its exit.
const EXIT_PROBE_OFFSET: f32 = 0.0001;

/// A homogeneous volume filling a closed boundary.
///
/// The boundary must be convex: the hit test assumes one entry and one exit
/// along any ray, so a concave or multi-shell boundary only sees its first
/// segment.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            density,
            phase_function: Isotropic::with_texture(albedo),
        }
    }

    pub fn with_color(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self {
            boundary,
            density,
            phase_function: Isotropic::new(albedo),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        if !(self.density > 0.0) {
            return None;
        }

        // Entry and exit along the whole line, then clip to the query range
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::from_min(entry.t + EXIT_PROBE_OFFSET), rng)?;

        let mut t1 = entry.t.max(ray_t.min);
        let t2 = exit.t.min(ray_t.max);
        if t1 >= t2 {
            return None;
        }
        t1 = t1.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t2 - t1) * ray_length;
        let hit_distance = -gen_f32(rng).ln() / self.density;
        if !(hit_distance <= distance_inside) {
            return None;
        }

        let t = t1 + hit_distance / ray_length;
        log::trace!("medium scatter at t={t} ({hit_distance} of {distance_inside})");

        // Normal and face are arbitrary; isotropic scattering ignores them
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
