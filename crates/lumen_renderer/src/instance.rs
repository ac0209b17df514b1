//! Instance wrappers that place an existing object elsewhere in the world.
//!
//! Rather than copying geometry, a wrapper moves the incoming ray into the
//! inner object's space, intersects there, and moves the hit back out.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use lumen_math::{Aabb, Interval, Mat3, TransformAabb, Vec3};
use rand::RngCore;

/// An object displaced by a constant offset.
pub struct Translate {
    inner: Arc<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(inner: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self { inner, offset }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let moved = ray.offset(-self.offset);
        let mut rec = self.inner.hit(&moved, ray_t, rng)?;

        // Direction is unchanged, so t and the oriented normal carry over
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.inner
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// An object rotated about the world Y axis.
pub struct RotateY {
    inner: Arc<dyn Hittable>,
    /// Object-to-world rotation
    rotation: Mat3,
    /// World-to-object rotation (the transpose)
    inverse: Mat3,
    bbox: Option<Aabb>,
}

impl RotateY {
    /// Rotate `inner` by `degrees` about +Y (right-handed).
    pub fn new(inner: Arc<dyn Hittable>, degrees: f32) -> Self {
        let rotation = Mat3::from_rotation_y(degrees.to_radians());
        let inverse = rotation.transpose();

        // Rotated objects are static scenery; the box covers the default shutter
        let bbox = inner
            .bounding_box(0.0, 1.0)
            .map(|bbox| rotation.transform_aabb(&bbox));

        Self {
            inner,
            rotation,
            inverse,
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let local = Ray::new(
            self.inverse * ray.origin(),
            self.inverse * ray.direction(),
            ray.time(),
        );
        let mut rec = self.inner.hit(&local, ray_t, rng)?;

        // Rotation preserves dot products, so front_face is still valid
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        Some(rec)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Cuboid, Lambertian, Material, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(0.0, 0.0, -5.0));
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = moved.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();

        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        assert!((ray.at(rec.t) - rec.p).length() < 1e-5);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_translate_box() {
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(10.0, 0.0, 0.0));
        let bbox = moved.bounding_box(0.0, 1.0).unwrap();

        assert_eq!(bbox.min(), Vec3::new(9.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // +X maps to -Z under a positive quarter turn about Y
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 0.5, gray()));
        let rotated = RotateY::new(sphere, 90.0);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = rotated.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();

        assert!((rec.t - 1.5).abs() < 1e-4);
        assert!((rec.p - Vec3::new(0.0, 0.0, -1.5)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
        assert!(rec.front_face);

        // The unrotated location is now empty
        let old = Ray::new_simple(Vec3::ZERO, Vec3::X);
        assert!(rotated.hit(&old, Interval::from_min(0.001), &mut rng).is_none());
    }

    #[test]
    fn test_rotate_y_box_encloses_rotated_cuboid() {
        let cuboid: Arc<dyn Hittable> = Arc::new(Cuboid::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 2.0), gray()));
        let rotated = RotateY::new(cuboid, 45.0);
        let bbox = rotated.bounding_box(0.0, 1.0).unwrap();

        // Diagonal of the 2x2 footprint lies along an axis after 45 degrees
        let diagonal = 2.0 * std::f32::consts::SQRT_2;
        assert!((bbox.x.size() - diagonal).abs() < 1e-3 || (bbox.z.size() - diagonal).abs() < 1e-3);
        assert!((bbox.y.size() - 1.0).abs() < 1e-4);

        // Every hit on the rotated surface stays inside
        let center = Mat3::from_rotation_y(45f32.to_radians()) * Vec3::new(1.0, 0.5, 1.0);
        let inside = |p: Vec3| {
            let slack = 1e-4;
            bbox.x.expand(slack).contains(p.x)
                && bbox.y.expand(slack).contains(p.y)
                && bbox.z.expand(slack).contains(p.z)
        };
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let dir = crate::sampling::random_unit_vector(&mut rng);
            let ray = Ray::new_simple(center + dir * 20.0, -dir);
            let rec = rotated.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();
            assert!(inside(rec.p), "hit {:?} outside {:?}", rec.p, bbox);
        }
    }

    #[test]
    fn test_rotate_y_unbounded_inner() {
        let empty: Arc<dyn Hittable> = Arc::new(crate::HittableList::new());
        assert!(RotateY::new(empty, 30.0).bounding_box(0.0, 1.0).is_none());
    }
}
