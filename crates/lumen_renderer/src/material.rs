//! Material trait for surface scattering.

use std::sync::Arc;

use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::texture::{Color, SolidColor, Texture};
use crate::{HitRecord, Ray};
use lumen_math::Vec3;
use rand::RngCore;

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel fraction of the scattered radiance that survives
    pub attenuation: Color,
    /// Continuation ray leaving the surface
    pub scattered: Ray,
}

impl ScatterResult {
    pub fn new(attenuation: Color, scattered: Ray) -> Self {
        Self {
            attenuation,
            scattered,
        }
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` when the ray is absorbed. That is a normal outcome,
    /// not an error: the integrator falls back to emission only.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with a constant albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        let scattered = Ray::new(rec.p, scatter_direction, ray_in.time());
        Some(ScatterResult::new(self.albedo.value(rec.u, rec.v, rec.p), scattered))
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = if self.fuzz > 0.0 {
            reflected + self.fuzz * random_in_unit_sphere(rng)
        } else {
            reflected
        };

        // Reflections that end up below the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            let scattered = Ray::new(rec.p, scattered_dir, ray_in.time());
            Some(ScatterResult::new(self.albedo, scattered))
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract || gen_f32(rng) < schlick(cos_theta, refraction_ratio) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        let scattered = Ray::new(rec.p, direction, ray_in.time());
        Some(ScatterResult::new(Color::ONE, scattered))
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with a constant emission color.
    pub fn new(emit: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn with_texture(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Phase function of a constant-density medium: scatters uniformly.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let scattered = Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time());
        Some(ScatterResult::new(self.albedo.value(rec.u, rec.v, rec.p), scattered))
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `etai_over_etat`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn schlick(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Hit at the origin on the plane y = 0, approached from above.
    fn floor_hit<'a>(ray: &Ray, material: &'a dyn Material) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, Vec3::ZERO, Vec3::Y, (0.5, 0.5), material)
    }

    #[test]
    fn test_lambertian_scatters_above_surface() {
        let mat = Lambertian::new(Color::new(0.5, 0.25, 0.125));
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, -1.0), Vec3::new(0.0, -1.0, 1.0));
        let rec = floor_hit(&ray, &mat);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("lambertian always scatters");
            assert_eq!(result.attenuation, Color::new(0.5, 0.25, 0.125));
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
            assert_eq!(result.scattered.origin(), rec.p);
        }
    }

    #[test]
    fn test_metal_zero_fuzz_is_perfect_mirror() {
        let mat = Metal::new(Color::new(0.8, 0.8, 0.8), 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        for dir in [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.3, -2.0, 0.7),
            Vec3::new(-4.0, -0.1, 1.0),
        ] {
            let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), dir, 0.25);
            let rec = floor_hit(&ray, &mat);
            let result = mat.scatter(&ray, &rec, &mut rng).expect("mirror reflection leaves the surface");

            let expected = reflect(dir.normalize(), Vec3::Y);
            assert!((result.scattered.direction() - expected).length() < 1e-6);
            assert_eq!(result.scattered.time(), 0.25);
            assert_eq!(result.attenuation, Color::new(0.8, 0.8, 0.8));
        }
    }

    #[test]
    fn test_metal_rejects_reflection_into_surface() {
        let mat = Metal::new(Color::ONE, 0.0);
        let mut rng = StdRng::seed_from_u64(42);

        // Normal forced opposite to what set_face_normal would pick, so the
        // mirror direction points into the surface.
        let ray = Ray::new_simple(Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        let mut rec = floor_hit(&ray, &mat);
        rec.normal = Vec3::Y;

        assert!(mat.scatter(&ray, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let mat = Metal::new(Color::ONE, 10.0);
        assert_eq!(mat.fuzz, 1.0);
    }

    #[test]
    fn test_dielectric_never_absorbs() {
        let mat = Dielectric::new(1.5);
        let mut rng = StdRng::seed_from_u64(42);

        for i in 0..500 {
            let angle = i as f32 / 500.0 * std::f32::consts::FRAC_PI_2;
            let dir = Vec3::new(angle.sin(), -angle.cos(), 0.0);
            let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), dir);

            let mut rec = floor_hit(&ray, &mat);
            // Alternate between entering and leaving the glass
            if i % 2 == 1 {
                rec.front_face = false;
            }

            let result = mat.scatter(&ray, &rec, &mut rng).expect("dielectric always scatters");
            assert_eq!(result.attenuation, Color::ONE);
            assert!(result.scattered.direction().is_finite());
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        let mut rng = StdRng::seed_from_u64(42);

        // Grazing ray inside glass: ratio 1.5 * sin(80°) > 1
        let angle = 80.0_f32.to_radians();
        let dir = Vec3::new(angle.sin(), -angle.cos(), 0.0);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), dir);
        let mut rec = floor_hit(&ray, &mat);
        rec.front_face = false;

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = reflect(dir.normalize(), Vec3::Y);
            assert!((result.scattered.direction() - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_schlick_normal_incidence_is_r0() {
        for ratio in [1.0_f32 / 1.5, 1.5, 2.4, 1.0] {
            let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
            assert_eq!(schlick(1.0, ratio), r0);
        }
        // Grazing incidence reflects everything
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_refract_straight_through_at_normal_incidence() {
        let out = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5);
        assert!((out - (-Vec3::Y)).length() < 1e-6);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let light = DiffuseLight::new(Color::splat(4.0));
        let ray = Ray::new_simple(Vec3::Y, -Vec3::Y);
        let rec = floor_hit(&ray, &light);
        let mut rng = StdRng::seed_from_u64(42);

        assert!(light.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(0.5, 0.5, Vec3::ZERO), Color::splat(4.0));
        assert_eq!(Lambertian::new(Color::ONE).emitted(0.5, 0.5, Vec3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_isotropic_scatters_from_hit_point() {
        let mat = Isotropic::new(Color::new(0.2, 0.4, 0.9));
        let ray = Ray::new(Vec3::Y, -Vec3::Y, 0.5);
        let rec = floor_hit(&ray, &mat);
        let mut rng = StdRng::seed_from_u64(42);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(result.attenuation, Color::new(0.2, 0.4, 0.9));
        assert_eq!(result.scattered.origin(), rec.p);
        assert_eq!(result.scattered.time(), 0.5);
        assert!(result.scattered.direction().length_squared() < 1.0);
    }
}
