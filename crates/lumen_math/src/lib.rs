// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::TransformAabb;

/// Index of a coordinate axis (0=X, 1=Y, 2=Z).
pub type Axis = usize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_axis_indexing() {
        let v = Vec3::new(4.0, 5.0, 6.0);
        let axis: Axis = 2;
        assert_eq!(v[axis], 6.0);
    }
}
