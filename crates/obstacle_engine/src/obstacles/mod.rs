//! Obstacle shapes used by the motion planner
//!
//! Every shape stores its own minimal geometry and answers the same set of
//! queries through the [`Obstacle`] capability trait. Shapes are grouped into
//! two closed families, [`Obstacle2D`] and [`Obstacle3D`], which are what the
//! collision dispatcher matches on.
//!
//! # Module Organization
//!
//! - Planar: [`rectangle`], [`circle`], [`ellipse`], [`convex_poly`], [`hierarchy`]
//! - Spatial: [`box_obstacle`], [`sphere`], [`cylinder`], [`ellipsoid`]
//! - Closed families: [`obstacle2d`], [`obstacle3d`]

pub mod box_obstacle;
pub mod circle;
pub mod convex_poly;
pub mod cylinder;
pub mod ellipse;
pub mod ellipsoid;
pub mod hierarchy;
pub mod obstacle2d;
pub mod obstacle3d;
pub mod rectangle;
pub mod sphere;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat3, Real, Rot3, RotationN, VectorN};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox;

pub use box_obstacle::BoxObstacle;
pub use circle::CircularObstacle;
pub use convex_poly::ConvexPolyObstacle;
pub use cylinder::CylindricalObstacle;
pub use ellipse::EllipticalObstacle;
pub use ellipsoid::EllipsoidObstacle;
pub use hierarchy::HierarchicalObstacle;
pub use obstacle2d::Obstacle2D;
pub use obstacle3d::Obstacle3D;
pub use rectangle::RectangularObstacle;
pub use sphere::SphericalObstacle;

/// Type tag of a concrete obstacle shape, used for collision dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Oriented rectangle
    Rectangle,
    /// Circle
    Circle,
    /// Oriented ellipse
    Ellipse,
    /// Convex polygon with counter-clockwise winding
    ConvexPoly,
    /// Composite of planar obstacles sharing one rigid transform
    Hierarchy,
    /// Oriented box
    Box,
    /// Oriented cylinder
    Cylinder,
    /// Sphere
    Sphere,
    /// Oriented ellipsoid
    Ellipsoid,
}

impl ObstacleKind {
    /// Record type name used by the obstacle factory
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Ellipse => "Ellipse",
            Self::ConvexPoly => "ConvexPoly",
            Self::Hierarchy => "Hierarchy",
            Self::Box => "Box",
            Self::Cylinder => "Cylinder",
            Self::Sphere => "Sphere",
            Self::Ellipsoid => "Ellipsoid",
        }
    }

    /// Number of spatial dimensions the shape lives in
    pub const fn dimensions(self) -> usize {
        match self {
            Self::Rectangle | Self::Circle | Self::Ellipse | Self::ConvexPoly | Self::Hierarchy => 2,
            Self::Box | Self::Cylinder | Self::Sphere | Self::Ellipsoid => 3,
        }
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Reasons a gradient (escape vector) could not be produced
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GradientError {
    /// The shape has no gradient implementation
    #[error("gradient is not supported for {0} obstacles")]
    Unsupported(ObstacleKind),

    /// The nearest-point quartic produced no admissible real root
    #[error("nearest-point equation has no real root")]
    NoRealRoot,

    /// Polygon has not been closed (or has fewer than three points)
    #[error("convex polygon is not closed")]
    NotClosed,

    /// Composite has no component able to provide an escape vector
    #[error("hierarchical obstacle has no usable component")]
    Empty,
}

/// Invalid geometry supplied at construction time
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ObstacleError {
    /// Semimajor axis shorter than half the distance between the foci
    #[error("semimajor {semimajor} is shorter than half the focal distance {half_focal}")]
    SemimajorTooShort {
        /// Requested semimajor
        semimajor: Real,
        /// Half the distance between the foci
        half_focal: Real,
    },

    /// Polygon needs at least three distinct points
    #[error("convex polygon needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),

    /// Orientation matrix is not a proper rotation
    #[error("orientation matrix is not orthonormal")]
    NotOrthonormal,

    /// Radius, extent or half-height is negative or not finite
    #[error("{0} must be a non-negative finite value")]
    NonPositiveExtent(&'static str),
}

/// Capability set shared by every obstacle shape
///
/// Points and directions are plain column vectors in the world frame.
pub trait Obstacle<const D: usize>: SupportMap<D> + fmt::Display {
    /// Human readable name for debugging and display
    fn name(&self) -> &str;

    /// Replace the debug name
    fn set_name(&mut self, name: String);

    /// Type tag used for dispatch
    fn kind(&self) -> ObstacleKind;

    /// Center point of the obstacle
    fn center(&self) -> VectorN<D>;

    /// Axis-aligned bounding box agreeing with the current geometry
    fn bounding_box(&self) -> BoundingBox<D>;

    /// True if `point` lies strictly inside the obstacle
    fn contains_point(&self, point: &VectorN<D>) -> bool;

    /// Vector from `point` to the nearest point on the obstacle boundary
    ///
    /// Its magnitude is the clearance when `point` is outside and the
    /// penetration depth when it is inside.
    fn gradient(&self, point: &VectorN<D>) -> Result<VectorN<D>, GradientError>;

    /// Move the obstacle so that its center lands on `new_center`
    fn update_position(&mut self, new_center: &VectorN<D>);

    /// Rotate the obstacle by `rotation` about `origin`
    fn rotate_about(&mut self, origin: &VectorN<D>, rotation: &RotationN<D>);

    /// Rotate the obstacle about its own center
    fn rotate(&mut self, rotation: &RotationN<D>) {
        let center = self.center();
        self.rotate_about(&center, rotation);
    }

    /// Grow the obstacle by at least `amount` in every direction
    fn bloat(&mut self, amount: Real);

    /// Shrink the obstacle by at least `amount` in every direction
    fn contract(&mut self, amount: Real) {
        self.bloat(-amount);
    }
}

/// Clamp a size parameter that a mutation pushed below zero
pub(crate) fn clamp_extent(value: Real, what: &str, name: &str) -> Real {
    if value < 0.0 {
        log::warn!("{}: {} shrank below zero ({}), clamping", name, what, value);
        0.0
    } else {
        value
    }
}

/// Tolerance on `M^T M = I` and `det M = 1` when accepting a raw matrix
const ORTHONORMAL_TOLERANCE: Real = 1e-6;

/// Accept a 3x3 matrix as a rotation if it is orthonormal and right-handed
pub fn rotation_from_matrix(m: &Mat3) -> Result<Rot3, ObstacleError> {
    let deviation = (m.transpose() * m - Mat3::identity()).abs().max();
    if deviation > ORTHONORMAL_TOLERANCE || (m.determinant() - 1.0).abs() > ORTHONORMAL_TOLERANCE {
        log::warn!("rejecting orientation matrix with deviation {}", deviation);
        return Err(ObstacleError::NotOrthonormal);
    }
    Ok(Rot3::from_matrix_unchecked(*m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dimensions() {
        assert_eq!(ObstacleKind::ConvexPoly.dimensions(), 2);
        assert_eq!(ObstacleKind::Hierarchy.dimensions(), 2);
        assert_eq!(ObstacleKind::Ellipsoid.dimensions(), 3);
    }

    #[test]
    fn test_rotation_from_matrix() {
        let r = Rot3::from_euler_angles(0.3, 0.2, -1.0);
        assert!(rotation_from_matrix(r.matrix()).is_ok());
        let mirror = Mat3::from_diagonal(&crate::foundation::math::Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(rotation_from_matrix(&mirror), Err(ObstacleError::NotOrthonormal));
    }

    #[test]
    fn test_gradient_error_messages() {
        let err = GradientError::Unsupported(ObstacleKind::Cylinder);
        assert_eq!(err.to_string(), "gradient is not supported for Cylinder obstacles");
    }
}
