//! Scene-construction errors.
//!
//! Query paths (`hit`, `scatter`, texture lookups) never fail; only building
//! an acceleration structure over malformed input does.

use thiserror::Error;

/// Errors raised while building scene geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("cannot build a BVH over an empty primitive list")]
    EmptyPrimitiveList,

    #[error("primitive {index} has no bounding box and cannot be placed in a BVH")]
    UnboundedPrimitive { index: usize },

    #[error("invalid time range: time1 ({time1}) is before time0 ({time0})")]
    InvalidTimeRange { time0: f32, time1: f32 },
}

/// Result type for geometry construction.
pub type GeometryResult<T> = std::result::Result<T, GeometryError>;
