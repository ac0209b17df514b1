// Bounding-box transforms for glam rotation matrices.
//
// Used by instance wrappers (rotation) that must re-derive a world-space
// box from an object-space one.

use crate::Aabb;
use glam::Mat3;

/// Extension trait for transforming an axis-aligned bounding box.
pub trait TransformAabb {
    /// Transform all 8 corners and return the box of their componentwise extrema.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl TransformAabb for Mat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        extrema(aabb.corners().map(|corner| *self * corner))
    }
}

fn extrema(corners: [glam::Vec3; 8]) -> Aabb {
    let mut result_min = corners[0];
    let mut result_max = corners[0];

    for &corner in &corners[1..] {
        result_min = result_min.min(corner);
        result_max = result_max.max(corner);
    }

    Aabb::from_points(result_min, result_max)
}
