//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built once per scene (or per shutter interval) by median
//! splits on a randomly chosen axis. Interior nodes are owned exclusively by
//! their parent; leaves share the scene's primitives.

use std::sync::Arc;
use std::time::Instant;

use crate::{
    error::{GeometryError, GeometryResult},
    hittable::{HitRecord, Hittable, HittableList},
    Ray,
};
use lumen_math::{Aabb, Axis, Interval};
use rand::{Rng, RngCore};

/// One side of a BVH node: a subtree or a scene primitive.
enum BvhChild {
    Node(Box<BvhNode>),
    Primitive(Arc<dyn Hittable>),
}

impl BvhChild {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        match self {
            BvhChild::Node(node) => node.hit(ray, ray_t, rng),
            BvhChild::Primitive(object) => object.hit(ray, ray_t, rng),
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhChild::Node(node) => node.depth(),
            BvhChild::Primitive(_) => 0,
        }
    }
}

/// A primitive paired with its box over the build's time range.
type Entry = (Arc<dyn Hittable>, Aabb);

/// BVH node with exactly two children.
///
/// A node over a single primitive stores that primitive on both sides, so
/// there is no separate leaf type.
pub struct BvhNode {
    left: BvhChild,
    right: BvhChild,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over `primitives` for the shutter interval `[time0, time1]`.
    ///
    /// Fails if the list is empty, the time range is reversed, or any
    /// primitive reports no bounding box or one with an infinite side.
    pub fn build(
        primitives: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> GeometryResult<Self> {
        if !(time0 <= time1) {
            return Err(GeometryError::InvalidTimeRange { time0, time1 });
        }
        if primitives.is_empty() {
            return Err(GeometryError::EmptyPrimitiveList);
        }

        let start = Instant::now();
        let count = primitives.len();

        // Query every box once up front; recursion only sorts cached boxes
        let entries = primitives
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                match object.bounding_box(time0, time1) {
                    Some(bbox) if bbox.is_finite() => Ok((object, bbox)),
                    _ => Err(GeometryError::UnboundedPrimitive { index }),
                }
            })
            .collect::<GeometryResult<Vec<Entry>>>()?;

        let root = Self::build_recursive(entries, rng);

        log::info!(
            "Built BVH: {} primitives, depth {} in {:.2?}",
            count,
            root.depth(),
            start.elapsed()
        );

        Ok(root)
    }

    /// Build over every object currently in `list`.
    pub fn from_list(
        list: &HittableList,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> GeometryResult<Self> {
        Self::build(list.objects().to_vec(), time0, time1, rng)
    }

    /// Recursive median split. `entries` is never empty.
    fn build_recursive(mut entries: Vec<Entry>, rng: &mut dyn RngCore) -> Self {
        let bbox = entries
            .iter()
            .skip(1)
            .fold(entries[0].1, |acc, (_, bbox)| Aabb::surrounding(&acc, bbox));

        let axis: Axis = rng.gen_range(0..3);
        entries.sort_unstable_by(|(_, a), (_, b)| {
            a.axis_interval(axis).min.total_cmp(&b.axis_interval(axis).min)
        });

        let (left, right) = match entries.len() {
            1 => {
                let object = entries[0].0.clone();
                (BvhChild::Primitive(object.clone()), BvhChild::Primitive(object))
            }
            2 => (
                BvhChild::Primitive(entries[0].0.clone()),
                BvhChild::Primitive(entries[1].0.clone()),
            ),
            n => {
                let right_entries = entries.split_off(n / 2);
                (
                    BvhChild::Node(Box::new(Self::build_recursive(entries, rng))),
                    BvhChild::Node(Box::new(Self::build_recursive(right_entries, rng))),
                )
            }
        };

        Self { left, right, bbox }
    }

    /// Number of node levels below and including this one.
    pub fn depth(&self) -> usize {
        1 + self.left.depth().max(self.right.depth())
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let left = self.left.hit(ray, ray_t, rng);

        // Only check right up to the closest hit so far
        let right_t = match &left {
            Some(rec) => ray_t.with_max(rec.t),
            None => ray_t,
        };
        let right = self.right.hit(ray, right_t, rng);

        right.or(left)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}
