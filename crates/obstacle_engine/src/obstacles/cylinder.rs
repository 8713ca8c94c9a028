//! Oriented cylinder obstacle
//!
//! The cylinder axis is the local z axis; `half_height` is measured along it
//! from the center.

use std::fmt;

use crate::foundation::math::utils::{rotate_about, sgn};
use crate::foundation::math::{Mat3, Real, Rot3, Vec3, EPSILON};
use crate::obstacles::{clamp_extent, rotation_from_matrix, GradientError, Obstacle, ObstacleError, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox3D;

/// Solid cylinder with arbitrary orientation
#[derive(Debug, Clone, PartialEq)]
pub struct CylindricalObstacle {
    name: String,
    center: Vec3,
    orientation: Rot3,
    radius: Real,
    half_height: Real,
}

impl CylindricalObstacle {
    /// Create a cylinder
    pub fn new(center: Vec3, orientation: Rot3, radius: Real, half_height: Real) -> Self {
        let name = String::from("cylinder");
        let radius = clamp_extent(radius, "radius", &name);
        let half_height = clamp_extent(half_height, "half-height", &name);
        Self {
            name,
            center,
            orientation,
            radius,
            half_height,
        }
    }

    /// Create a cylinder whose orientation is given as a raw matrix
    pub fn from_matrix(center: Vec3, orientation: &Mat3, radius: Real, half_height: Real) -> Result<Self, ObstacleError> {
        Ok(Self::new(center, rotation_from_matrix(orientation)?, radius, half_height))
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Radius of the circular cross-section
    pub const fn radius(&self) -> Real {
        self.radius
    }

    /// Half the length of the cylinder along its axis
    pub const fn half_height(&self) -> Real {
        self.half_height
    }

    /// Rotation from the local frame (axis along z) to the world frame
    pub const fn orientation(&self) -> Rot3 {
        self.orientation
    }

    /// Unit vector along the cylinder axis
    pub fn axis(&self) -> Vec3 {
        self.orientation * Vec3::z()
    }
}

impl SupportMap<3> for CylindricalObstacle {
    fn support(&self, direction: &Vec3) -> Vec3 {
        let dir = self.orientation.inverse() * direction;
        let sigma = dir.xy().norm();
        let z = sgn(dir.z) * self.half_height;
        let local = if sigma > EPSILON {
            let rim = dir.xy() * (self.radius / sigma);
            Vec3::new(rim.x, rim.y, z)
        } else {
            Vec3::new(0.0, 0.0, z)
        };
        self.orientation * local + self.center
    }
}

impl Obstacle<3> for CylindricalObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Cylinder
    }

    fn center(&self) -> Vec3 {
        self.center
    }

    /// Exact box: each end disc spans `r * sqrt(1 - a_i^2)` around its center
    fn bounding_box(&self) -> BoundingBox3D {
        let a = self.axis();
        let extents = a.map(|ai| self.radius * (1.0 - ai * ai).max(0.0).sqrt() + self.half_height * ai.abs());
        BoundingBox3D::from_center_extents(self.center, extents)
    }

    fn contains_point(&self, point: &Vec3) -> bool {
        let p = self.orientation.inverse() * (point - self.center);
        p.z.abs() < self.half_height && p.xy().norm_squared() < self.radius * self.radius
    }

    fn gradient(&self, _point: &Vec3) -> Result<Vec3, GradientError> {
        Err(GradientError::Unsupported(ObstacleKind::Cylinder))
    }

    fn update_position(&mut self, new_center: &Vec3) {
        self.center = *new_center;
    }

    fn rotate_about(&mut self, origin: &Vec3, rotation: &Rot3) {
        self.center = rotate_about(&self.center, origin, rotation);
        self.orientation = rotation * self.orientation;
    }

    fn bloat(&mut self, amount: Real) {
        self.radius = clamp_extent(self.radius + amount, "radius", &self.name);
        self.half_height = clamp_extent(self.half_height + amount, "half-height", &self.name);
    }
}

impl fmt::Display for CylindricalObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.axis();
        write!(
            f,
            "CylindricalObstacle[{},center=({}, {}, {}),axis=({}, {}, {}),half-height={},radius={}]",
            self.name, self.center.x, self.center.y, self.center.z, a.x, a.y, a.z, self.half_height, self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::{HALF_PI, PI};
    use approx::assert_relative_eq;

    fn lying_on_x() -> CylindricalObstacle {
        // axis turned from z onto x
        CylindricalObstacle::new(
            Vec3::new(5.0, 0.0, 0.0),
            Rot3::from_axis_angle(&Vec3::y_axis(), HALF_PI),
            1.0,
            2.0,
        )
    }

    #[test]
    fn test_point_uses_center() {
        let c = lying_on_x();
        assert!(c.contains_point(&Vec3::new(6.5, 0.5, 0.0)));
        assert!(!c.contains_point(&Vec3::new(7.5, 0.0, 0.0)));
        assert!(!c.contains_point(&Vec3::new(0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_support_in_world_frame() {
        let c = lying_on_x();
        assert_relative_eq!(c.support(&Vec3::new(1.0, 0.0, 0.0)), Vec3::new(7.0, 0.0, 0.0), epsilon = 1e-9);
        let s = c.support(&Vec3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(s, Vec3::new(7.0, 1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_bounding_box_is_exact() {
        let c = lying_on_x();
        let bb = c.bounding_box();
        assert_relative_eq!(bb.min, Vec3::new(3.0, -1.0, -1.0), epsilon = 1e-9);
        assert_relative_eq!(bb.max, Vec3::new(7.0, 1.0, 1.0), epsilon = 1e-9);

        let tilted = CylindricalObstacle::new(Vec3::zeros(), Rot3::from_euler_angles(0.4, -0.9, 0.3), 0.7, 1.6);
        let bb = tilted.bounding_box().inflated(1e-9);
        for i in 0..24 {
            for j in 0..12 {
                let (theta, phi) = (f64::from(i) * PI / 12.0, f64::from(j) * PI / 11.0);
                let d = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
                assert!(bb.contains_point(&tilted.support(&d)));
            }
        }
    }

    #[test]
    fn test_gradient_is_unsupported() {
        let c = lying_on_x();
        assert_eq!(
            c.gradient(&Vec3::zeros()),
            Err(GradientError::Unsupported(ObstacleKind::Cylinder))
        );
    }

    #[test]
    fn test_bloat() {
        let mut c = lying_on_x();
        c.bloat(0.5);
        assert_relative_eq!(c.radius(), 1.5);
        assert_relative_eq!(c.half_height(), 2.5);
        c.contract(2.0);
        assert_relative_eq!(c.radius(), 0.0);
        assert_relative_eq!(c.half_height(), 0.5);
    }
}
