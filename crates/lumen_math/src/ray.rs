use crate::Vec3;

/// A ray in 3D space with origin, direction, and time.
///
/// Rays are immutable once built. `time` lies inside the camera's shutter
/// interval and drives the position of moving geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Create a ray at time 0.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// True when the direction cannot be traced (zero length or non-finite).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let len_sq = self.direction.length_squared();
        !(len_sq.is_finite() && len_sq > f32::EPSILON * f32::EPSILON)
    }

    /// Same ray with its origin shifted by `offset`.
    #[inline]
    pub fn offset(&self, offset: Vec3) -> Ray {
        Ray::new(self.origin + offset, self.direction, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_creation() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let ray = Ray::new(origin, direction, 0.5);

        assert_eq!(ray.origin(), origin);
        assert_eq!(ray.direction(), direction);
        assert_eq!(ray.time(), 0.5);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_degenerate() {
        assert!(Ray::new_simple(Vec3::ZERO, Vec3::ZERO).is_degenerate());
        assert!(Ray::new_simple(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)).is_degenerate());
        assert!(!Ray::new_simple(Vec3::ZERO, Vec3::Z).is_degenerate());
    }

    #[test]
    fn test_ray_offset_keeps_direction_and_time() {
        let ray = Ray::new(Vec3::ONE, Vec3::Y, 0.25);
        let moved = ray.offset(Vec3::new(-1.0, 0.0, 2.0));

        assert_eq!(moved.origin, Vec3::new(0.0, 1.0, 3.0));
        assert_eq!(moved.direction, Vec3::Y);
        assert_eq!(moved.time, 0.25);
    }
}
