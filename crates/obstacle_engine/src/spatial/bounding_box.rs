//! Axis-aligned bounding boxes for broad-phase pruning

use std::fmt;

use crate::foundation::math::{Real, VectorN};

/// Axis-Aligned Bounding Box in `D` dimensions
///
/// An empty box (no points added yet) has `min > max` on every axis and
/// intersects nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<const D: usize> {
    /// Minimum corner of the bounding box
    pub min: VectorN<D>,
    /// Maximum corner of the bounding box
    pub max: VectorN<D>,
}

/// Planar bounding box
pub type BoundingBox2D = BoundingBox<2>;

/// Spatial bounding box
pub type BoundingBox3D = BoundingBox<3>;

impl<const D: usize> BoundingBox<D> {
    /// Create a new bounding box from min and max points
    pub fn new(min: VectorN<D>, max: VectorN<D>) -> Self {
        Self { min, max }
    }

    /// The empty box, ready to be grown with [`BoundingBox::expand_point`]
    pub fn empty() -> Self {
        Self {
            min: VectorN::<D>::repeat(Real::INFINITY),
            max: VectorN::<D>::repeat(Real::NEG_INFINITY),
        }
    }

    /// Create a bounding box centered at a point with given half-size extents
    pub fn from_center_extents(center: VectorN<D>, extents: VectorN<D>) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing every point of `points`
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a VectorN<D>>,
    {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_point(p);
        }
        bb
    }

    /// True if no point has been added to this box
    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.min[i] > self.max[i])
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> VectorN<D> {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the bounding box
    pub fn extents(&self) -> VectorN<D> {
        (self.max - self.min) * 0.5
    }

    /// Full size along each axis
    pub fn dimensions(&self) -> VectorN<D> {
        self.max - self.min
    }

    /// Grow the box to include `point`
    pub fn expand_point(&mut self, point: &VectorN<D>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Grow the box to include `other`
    pub fn expand(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Copy of this box grown by `amount` on every side
    pub fn inflated(&self, amount: Real) -> Self {
        Self {
            min: self.min.add_scalar(-amount),
            max: self.max.add_scalar(amount),
        }
    }

    /// Move the box by `offset`
    pub fn translate(&mut self, offset: &VectorN<D>) {
        self.min += offset;
        self.max += offset;
    }

    /// Check if this bounding box contains a point (boundary inclusive)
    pub fn contains_point(&self, point: &VectorN<D>) -> bool {
        (0..D).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Check if this bounding box intersects another (boundary inclusive)
    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }
}

impl<const D: usize> Default for BoundingBox<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const D: usize> fmt::Display for BoundingBox<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundingBox[min=(")?;
        for i in 0..D {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", self.min[i])?;
        }
        write!(f, "),max=(")?;
        for i in 0..D {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", self.max[i])?;
        }
        write!(f, ")]")
    }
}
