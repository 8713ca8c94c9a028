//! Broad-phase spatial primitives
//!
//! Provides the axis-aligned bounding boxes every obstacle caches so that
//! pairwise queries can be pruned before any narrow-phase test runs.

pub mod bounding_box;

pub use bounding_box::{BoundingBox, BoundingBox2D, BoundingBox3D};
