//! Math utilities and types
//!
//! Provides the fundamental math types used by the obstacle shapes. All
//! geometry is computed in double precision; the simplex and quartic code
//! paths are too sensitive for `f32`.

pub use nalgebra::{Matrix2, Matrix3, Rotation, SVector, Vector2, Vector3};

/// Scalar type used throughout the crate
pub type Real = f64;

/// N-dimensional column vector (points and directions share this type)
pub type VectorN<const D: usize> = SVector<Real, D>;

/// N-dimensional rotation
pub type RotationN<const D: usize> = Rotation<Real, D>;

/// 2D vector type
pub type Vec2 = Vector2<Real>;

/// 3D vector type
pub type Vec3 = Vector3<Real>;

/// 2x2 matrix type
pub type Mat2 = Matrix2<Real>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<Real>;

/// 2D rotation type
pub type Rot2 = nalgebra::Rotation2<Real>;

/// 3D rotation type
pub type Rot3 = nalgebra::Rotation3<Real>;

/// Tolerance below which a length or determinant is treated as zero
pub const EPSILON: Real = 1e-9;

/// Math constants
pub mod constants {
    use super::Real;

    /// Pi constant
    pub const PI: Real = std::f64::consts::PI;

    /// Pi / 2
    pub const HALF_PI: Real = std::f64::consts::FRAC_PI_2;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: Real = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{Real, VectorN, EPSILON};

    /// Sign of `x`, treating zero as positive
    pub fn sgn(x: Real) -> Real {
        if x < 0.0 { -1.0 } else { 1.0 }
    }

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: Real) -> Real {
        degrees * super::constants::DEG_TO_RAD
    }

    /// Normalize `v`, or `None` if it is too short to have a direction
    pub fn safe_normalize<const D: usize>(v: &VectorN<D>) -> Option<VectorN<D>> {
        let norm = v.norm();
        if norm < EPSILON {
            None
        } else {
            Some(v / norm)
        }
    }

    /// Unit vector along the first axis
    pub fn first_axis<const D: usize>() -> VectorN<D> {
        let mut axis = VectorN::<D>::zeros();
        axis[0] = 1.0;
        axis
    }

    /// Rotate `point` by `rotation` about `origin`
    pub fn rotate_about<const D: usize>(
        point: &VectorN<D>,
        origin: &VectorN<D>,
        rotation: &super::RotationN<D>,
    ) -> VectorN<D> {
        rotation * (point - origin) + origin
    }
}
