//! Sphere obstacle

use std::fmt;

use crate::foundation::math::utils::rotate_about;
use crate::foundation::math::{Real, Rot3, Vec3};
use crate::obstacles::circle::{ball_bounding_box, ball_gradient, ball_support, balls_overlap};
use crate::obstacles::{clamp_extent, GradientError, Obstacle, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox3D;

/// Sphere defined by center and radius
#[derive(Debug, Clone, PartialEq)]
pub struct SphericalObstacle {
    name: String,
    center: Vec3,
    radius: Real,
}

impl SphericalObstacle {
    /// Create a sphere
    pub fn new(center: Vec3, radius: Real) -> Self {
        let name = String::from("sphere");
        let radius = clamp_extent(radius, "radius", &name);
        Self { name, center, radius }
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sphere radius
    pub const fn radius(&self) -> Real {
        self.radius
    }

    /// Change the radius, clamping negative values to zero
    pub fn set_radius(&mut self, radius: Real) {
        self.radius = clamp_extent(radius, "radius", &self.name);
    }

    /// True if the two balls overlap (touching does not count)
    pub fn collides_sphere(&self, other: &Self) -> bool {
        balls_overlap(&self.center, self.radius, &other.center, other.radius)
    }
}

impl SupportMap<3> for SphericalObstacle {
    fn support(&self, direction: &Vec3) -> Vec3 {
        ball_support(&self.center, self.radius, direction)
    }
}

impl Obstacle<3> for SphericalObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Sphere
    }

    fn center(&self) -> Vec3 {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox3D {
        ball_bounding_box(&self.center, self.radius)
    }

    fn contains_point(&self, point: &Vec3) -> bool {
        (point - self.center).norm_squared() < self.radius * self.radius
    }

    fn gradient(&self, point: &Vec3) -> Result<Vec3, GradientError> {
        Ok(ball_gradient(&self.center, self.radius, point))
    }

    fn update_position(&mut self, new_center: &Vec3) {
        self.center = *new_center;
    }

    fn rotate_about(&mut self, origin: &Vec3, rotation: &Rot3) {
        self.center = rotate_about(&self.center, origin, rotation);
    }

    fn bloat(&mut self, amount: Real) {
        self.set_radius(self.radius + amount);
    }
}

impl fmt::Display for SphericalObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SphericalObstacle[{},center=({}, {}, {}),radius={}]",
            self.name, self.center.x, self.center.y, self.center.z, self.radius
        )
    }
}
