//! Axis-aligned rectangles and the box (cuboid) built from them.

use std::sync::Arc;

use crate::{
    hittable::{FlipFace, HitRecord, Hittable, HittableList},
    Material, Ray,
};
use lumen_math::{Aabb, Axis, Interval, Vec3};
use rand::RngCore;

/// Which pair of axes a rectangle spans; the third axis is held fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// (first free axis, second free axis, fixed axis)
    fn axes(self) -> (Axis, Axis, Axis) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

/// A rectangle in a plane of constant x, y, or z.
///
/// The outward normal is the positive direction of the fixed axis.
pub struct AxisAlignedRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    material: Arc<dyn Material>,
}

impl AxisAlignedRect {
    /// Rectangle spanning `a` x `b` on the plane's free axes at fixed coordinate `k`.
    pub fn new(plane: Plane, a: (f32, f32), b: (f32, f32), k: f32, material: Arc<dyn Material>) -> Self {
        Self {
            plane,
            a: Interval::new(a.0.min(a.1), a.0.max(a.1)),
            b: Interval::new(b.0.min(b.1), b.0.max(b.1)),
            k,
            material,
        }
    }

    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, z: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XY, (x0, x1), (y0, y1), z, material)
    }

    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, y: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XZ, (x0, x1), (z0, z1), y, material)
    }

    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, x: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::YZ, (y0, y1), (z0, z1), x, material)
    }

    /// Point on the rectangle's plane from (free a, free b) coordinates.
    fn point(&self, a: f32, b: f32) -> Vec3 {
        let (a_axis, b_axis, k_axis) = self.plane.axes();
        let mut p = Vec3::ZERO;
        p[a_axis] = a;
        p[b_axis] = b;
        p[k_axis] = self.k;
        p
    }
}

impl Hittable for AxisAlignedRect {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, _rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        let (a_axis, b_axis, k_axis) = self.plane.axes();

        if ray.is_degenerate() {
            return None;
        }

        // Parallel rays never cross the plane
        let dk = ray.direction()[k_axis];
        if dk == 0.0 {
            return None;
        }
        let t = (self.k - ray.origin()[k_axis]) / dk;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        if !self.a.contains(p[a_axis]) || !self.b.contains(p[b_axis]) {
            return None;
        }

        let u = normalized(self.a, p[a_axis]);
        let v = normalized(self.b, p[b_axis]);

        let mut outward_normal = Vec3::ZERO;
        outward_normal[k_axis] = 1.0;

        // Snap the fixed coordinate so the hit lies exactly on the plane
        let mut p = p;
        p[k_axis] = self.k;

        Some(HitRecord::new(ray, t, p, outward_normal, (u, v), self.material.as_ref()))
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        // Zero thickness along the fixed axis is padded by Aabb::from_points
        Some(Aabb::from_points(
            self.point(self.a.min, self.b.min),
            self.point(self.a.max, self.b.max),
        ))
    }
}

/// Position of `x` within `range` mapped to [0,1]; 0 for a zero-width range.
fn normalized(range: Interval, x: f32) -> f32 {
    let size = range.size();
    if size > 0.0 {
        (x - range.min) / size
    } else {
        0.0
    }
}

/// Closed axis-aligned box made of six rectangles.
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    sides: HittableList,
}

impl Cuboid {
    /// Box spanning the two opposite corners `p0` and `p1`.
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let min = p0.min(p1);
        let max = p0.max(p1);

        let mut sides = HittableList::new();

        // Faces on the max side already have outward +axis normals; faces on
        // the min side face -axis, so their front_face is flipped.
        sides.add(Arc::new(AxisAlignedRect::xy(min.x, max.x, min.y, max.y, max.z, material.clone())));
        sides.add(Arc::new(FlipFace::new(Arc::new(AxisAlignedRect::xy(
            min.x, max.x, min.y, max.y, min.z, material.clone(),
        )))));

        sides.add(Arc::new(AxisAlignedRect::xz(min.x, max.x, min.z, max.z, max.y, material.clone())));
        sides.add(Arc::new(FlipFace::new(Arc::new(AxisAlignedRect::xz(
            min.x, max.x, min.z, max.z, min.y, material.clone(),
        )))));

        sides.add(Arc::new(AxisAlignedRect::yz(min.y, max.y, min.z, max.z, max.x, material.clone())));
        sides.add(Arc::new(FlipFace::new(Arc::new(AxisAlignedRect::yz(
            min.y, max.y, min.z, max.z, min.x, material,
        )))));

        Self { min, max, sides }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::from_points(self.min, self.max))
    }
}
