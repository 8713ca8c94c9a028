//! Oriented ellipsoid obstacle

use std::fmt;

use crate::foundation::math::utils::rotate_about;
use crate::foundation::math::{Mat3, Real, Rot3, Vec3, EPSILON};
use crate::obstacles::{clamp_extent, rotation_from_matrix, GradientError, Obstacle, ObstacleError, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox3D;

/// Ellipsoid given by center, orientation and the three semi-axes
#[derive(Debug, Clone, PartialEq)]
pub struct EllipsoidObstacle {
    name: String,
    center: Vec3,
    orientation: Rot3,
    extents: Vec3,
}

impl EllipsoidObstacle {
    /// Create an ellipsoid
    pub fn new(center: Vec3, orientation: Rot3, extents: Vec3) -> Self {
        let mut e = Self {
            name: String::from("ellipsoid"),
            center,
            orientation,
            extents: Vec3::zeros(),
        };
        e.set_extents(extents);
        e
    }

    /// Create an ellipsoid whose orientation is given as a raw matrix
    pub fn from_matrix(center: Vec3, orientation: &Mat3, extents: Vec3) -> Result<Self, ObstacleError> {
        Ok(Self::new(center, rotation_from_matrix(orientation)?, extents))
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Semi-axis lengths along the local x, y and z axes
    pub const fn extents(&self) -> Vec3 {
        self.extents
    }

    /// Replace the semi-axes, clamping negative values to zero
    pub fn set_extents(&mut self, extents: Vec3) {
        self.extents = Vec3::new(
            clamp_extent(extents.x, "x extent", &self.name),
            clamp_extent(extents.y, "y extent", &self.name),
            clamp_extent(extents.z, "z extent", &self.name),
        );
    }

    /// Rotation from the local frame to the world frame
    pub const fn orientation(&self) -> Rot3 {
        self.orientation
    }
}

impl SupportMap<3> for EllipsoidObstacle {
    /// Lagrange solution `E^2 d / sqrt(d^T E^2 d)` in the local frame
    fn support(&self, direction: &Vec3) -> Vec3 {
        let dir = self.orientation.inverse() * direction;
        let e2 = self.extents.component_mul(&self.extents);
        let scaled = e2.component_mul(&dir);
        let denom = scaled.dot(&dir).sqrt();
        let local = if denom > EPSILON {
            scaled / denom
        } else {
            Vec3::new(self.extents.x, 0.0, 0.0)
        };
        self.orientation * local + self.center
    }
}

impl Obstacle<3> for EllipsoidObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Ellipsoid
    }

    fn center(&self) -> Vec3 {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox3D {
        let m = self.orientation.matrix();
        let extents = Vec3::from_fn(|i, _| {
            (0..3)
                .map(|j| (m[(i, j)] * self.extents[j]).powi(2))
                .sum::<Real>()
                .sqrt()
        });
        BoundingBox3D::from_center_extents(self.center, extents)
    }

    fn contains_point(&self, point: &Vec3) -> bool {
        if self.extents.min() < EPSILON {
            return false;
        }
        let p = self.orientation.inverse() * (point - self.center);
        p.component_div(&self.extents).norm_squared() < 1.0
    }

    fn gradient(&self, _point: &Vec3) -> Result<Vec3, GradientError> {
        Err(GradientError::Unsupported(ObstacleKind::Ellipsoid))
    }

    fn update_position(&mut self, new_center: &Vec3) {
        self.center = *new_center;
    }

    fn rotate_about(&mut self, origin: &Vec3, rotation: &Rot3) {
        self.center = rotate_about(&self.center, origin, rotation);
        self.orientation = rotation * self.orientation;
    }

    fn bloat(&mut self, amount: Real) {
        self.set_extents(self.extents.add_scalar(amount));
    }
}

impl fmt::Display for EllipsoidObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (roll, pitch, yaw) = self.orientation.euler_angles();
        write!(
            f,
            "EllipsoidObstacle[{},center=({}, {}, {}),extents=({}, {}, {}),rpy=({}, {}, {})]",
            self.name,
            self.center.x,
            self.center.y,
            self.center.z,
            self.extents.x,
            self.extents.y,
            self.extents.z,
            roll,
            pitch,
            yaw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_support_on_axes() {
        let e = EllipsoidObstacle::new(Vec3::new(1.0, 0.0, 0.0), Rot3::identity(), Vec3::new(3.0, 2.0, 1.0));
        assert_relative_eq!(e.support(&Vec3::new(0.0, 0.0, 5.0)), Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(e.support(&Vec3::new(-1.0, 0.0, 0.0)), Vec3::new(-2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_support_is_on_surface_and_extremal() {
        let e = EllipsoidObstacle::new(Vec3::zeros(), Rot3::from_euler_angles(0.3, 0.5, -0.2), Vec3::new(3.0, 2.0, 1.0));
        let d = Vec3::new(0.3, -0.8, 0.5);
        let s = e.support(&d);
        let local = e.orientation().inverse() * s;
        assert_relative_eq!(local.component_div(&e.extents()).norm(), 1.0, epsilon = 1e-9);
        // no sampled surface point goes farther
        for i in 0..40 {
            for j in 0..20 {
                let (theta, phi) = (f64::from(i) * PI / 20.0, f64::from(j) * PI / 19.0);
                let unit = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
                let p = e.orientation() * unit.component_mul(&e.extents());
                assert!(p.dot(&d) <= s.dot(&d) + 1e-9);
            }
        }
    }

    #[test]
    fn test_bounding_box_is_tight() {
        let e = EllipsoidObstacle::new(Vec3::new(0.0, 0.0, 2.0), Rot3::from_euler_angles(0.9, -0.2, 0.4), Vec3::new(2.5, 1.0, 0.5));
        let bb = e.bounding_box();
        for axis in [Vec3::x(), Vec3::y(), Vec3::z()] {
            assert_relative_eq!(e.support(&axis).dot(&axis), bb.max.dot(&axis), epsilon = 1e-9);
            assert_relative_eq!(e.support(&-axis).dot(&axis), bb.min.dot(&axis), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_point_relative_to_center() {
        let e = EllipsoidObstacle::new(Vec3::new(10.0, 0.0, 0.0), Rot3::identity(), Vec3::new(1.0, 2.0, 3.0));
        assert!(e.contains_point(&Vec3::new(10.5, 1.0, 1.0)));
        assert!(!e.contains_point(&Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_gradient_is_unsupported() {
        let e = EllipsoidObstacle::new(Vec3::zeros(), Rot3::identity(), Vec3::repeat(1.0));
        assert!(matches!(
            e.gradient(&Vec3::zeros()),
            Err(GradientError::Unsupported(ObstacleKind::Ellipsoid))
        ));
    }
}
