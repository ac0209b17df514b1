//! Sphere primitives for ray tracing: static and linearly moving.

use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A sphere primitive.
///
/// A negative radius keeps the same surface but turns the outward normal
/// inward, which makes a hollow shell when nested inside a dielectric.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(sphere_box(self.center, self.radius))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1` (and keeps extrapolating outside that range).
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Center position at `time`.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span.abs() < f32::EPSILON {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        hit_sphere(self.center(ray.time()), self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        // Linear motion: the boxes at both ends enclose every position between.
        let box0 = sphere_box(self.center(time0), self.radius);
        let box1 = sphere_box(self.center(time1), self.radius);
        Some(Aabb::surrounding(&box0, &box1))
    }
}

fn sphere_box(center: Vec3, radius: f32) -> Aabb {
    let rvec = Vec3::splat(radius);
    Aabb::from_points(center - rvec, center + rvec)
}

/// Shared ray-sphere intersection: nearest root inside `ray_t` wins.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    if ray.is_degenerate() || radius == 0.0 {
        return None;
    }
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if !(discriminant > 0.0) {
        return None;
    }
    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let p = ray.at(root);
    let outward_normal = (p - center) / radius;
    Some(HitRecord::new(
        ray,
        root,
        p,
        outward_normal,
        sphere_uv(outward_normal),
        material,
    ))
}

/// UV coordinates for a point on the unit sphere centered at the origin.
///
/// `u` is the angle around Y starting from -X, `v` runs from the south
/// pole (0) to the north pole (1).
pub fn sphere_uv(p: Vec3) -> (f32, f32) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();

    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + FRAC_PI_2) / PI;
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit_lies_on_surface() {
        let mut rng = StdRng::seed_from_u64(42);

        for r in [0.5_f32, 1.0, 2.0, 3.0] {
            let center = Vec3::ZERO;
            let sphere = Sphere::new(center, r, gray());
            let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -2.0 * r), Vec3::Z);

            let rec = sphere
                .hit(&ray, Interval::from_min(0.001), &mut rng)
                .expect("ray aimed at the center must hit");

            assert!(((ray.at(rec.t) - center).length() - r).abs() < 1e-6);
            let radial = (rec.p - center) / r;
            assert!(rec.normal.cross(radial).length() < 1e-6);
            assert!(rec.front_face);
        }
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let mut rng = StdRng::seed_from_u64(42);

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::from_min(0.001), &mut rng).is_none());

        // Tangent ray: discriminant == 0 is not a hit
        let ray = Ray::new_simple(Vec3::new(0.5, 0.0, 0.0), -Vec3::Z);
        assert!(sphere.hit(&ray, Interval::from_min(0.001), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);
    }

    #[test]
    fn test_sphere_degenerate_ray_is_miss() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray());
        let mut rng = StdRng::seed_from_u64(42);

        let zero = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::ZERO);
        assert!(sphere.hit(&zero, Interval::from_min(0.001), &mut rng).is_none());

        let nan = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::new(f32::NAN, 0.0, 1.0));
        assert!(sphere.hit(&nan, Interval::from_min(0.001), &mut rng).is_none());
    }

    #[test]
    fn test_negative_radius_flips_normal_inward() {
        let mut rng = StdRng::seed_from_u64(42);
        let solid = Sphere::new(Vec3::ZERO, 1.0, gray());
        let hollow = Sphere::new(Vec3::ZERO, -1.0, gray());
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);

        let outer = solid.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();
        let inner = hollow.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();

        assert_eq!(outer.t, inner.t);
        assert!(outer.front_face);
        // Outward normal points into the shell, so the ray arrives from its back
        assert!(!inner.front_face);
        assert_eq!(inner.normal, -Vec3::Z);

        let bbox = hollow.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::splat(-1.0));
        assert_eq!(bbox.max(), Vec3::splat(1.0));
    }

    #[test]
    fn test_zero_radius_is_never_hit() {
        let sphere = Sphere::new(Vec3::ZERO, 0.0, gray());
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);

        assert!(sphere.hit(&ray, Interval::from_min(0.001), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_uv() {
        let close = |a: (f32, f32), b: (f32, f32)| (a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6;

        assert!(close(sphere_uv(Vec3::new(1.0, 0.0, 0.0)), (0.5, 0.5)));
        assert!(close(sphere_uv(Vec3::new(0.0, 1.0, 0.0)), (0.5, 1.0)));
        assert!(close(sphere_uv(Vec3::new(0.0, -1.0, 0.0)), (0.5, 0.0)));
        assert!(close(sphere_uv(Vec3::new(0.0, 0.0, 1.0)), (0.25, 0.5)));
        assert!(close(sphere_uv(Vec3::new(0.0, 0.0, -1.0)), (0.75, 0.5)));

        // Slightly outside the unit sphere must not produce NaN
        let (u, v) = sphere_uv(Vec3::new(0.0, 1.000_001, 0.0));
        assert!(u.is_finite() && v.is_finite());
    }

    #[test]
    fn test_moving_sphere_center_interpolates() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.0, 1.0, 0.5, gray());

        assert_eq!(sphere.center(0.0), Vec3::ZERO);
        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(sphere.center(1.0), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_moving_sphere_hit_depends_on_time() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, 1.0, 1.0, gray());
        let mut rng = StdRng::seed_from_u64(42);

        let early = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        let late = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 1.0);

        assert!(sphere.hit(&early, Interval::from_min(0.001), &mut rng).is_some());
        assert!(sphere.hit(&late, Interval::from_min(0.001), &mut rng).is_none());
    }

    #[test]
    fn test_moving_sphere_box_covers_motion() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 0.0, 1.0, 1.0, gray());
        let bbox = sphere.bounding_box(0.0, 1.0).unwrap();

        assert_eq!(bbox.min(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(5.0, 1.0, 1.0));
    }

    #[test]
    fn test_moving_sphere_zero_shutter() {
        let sphere = MovingSphere::new(Vec3::ONE, Vec3::splat(3.0), 0.5, 0.5, 1.0, gray());
        assert_eq!(sphere.center(0.9), Vec3::ONE);
    }
}
