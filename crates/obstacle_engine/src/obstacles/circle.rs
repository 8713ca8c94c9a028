//! Circle obstacle and the round-shape helpers shared with spheres

use std::fmt;

use crate::foundation::math::utils::{first_axis, rotate_about, safe_normalize};
use crate::foundation::math::{Real, Rot2, Vec2, VectorN, EPSILON};
use crate::obstacles::{clamp_extent, GradientError, Obstacle, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::{BoundingBox, BoundingBox2D};

/// Circle defined by center and radius
#[derive(Debug, Clone, PartialEq)]
pub struct CircularObstacle {
    name: String,
    center: Vec2,
    radius: Real,
}

impl CircularObstacle {
    /// Create a circle
    pub fn new(center: Vec2, radius: Real) -> Self {
        let name = String::from("circle");
        let radius = clamp_extent(radius, "radius", &name);
        Self { name, center, radius }
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Circle radius
    pub const fn radius(&self) -> Real {
        self.radius
    }

    /// Change the radius, clamping negative values to zero
    pub fn set_radius(&mut self, radius: Real) {
        self.radius = clamp_extent(radius, "radius", &self.name);
    }

    /// True if the two discs overlap (touching does not count)
    pub fn collides_circle(&self, other: &Self) -> bool {
        balls_overlap(&self.center, self.radius, &other.center, other.radius)
    }
}

/// Strict overlap test for two balls in any dimension
pub(crate) fn balls_overlap<const D: usize>(
    a: &VectorN<D>,
    ra: Real,
    b: &VectorN<D>,
    rb: Real,
) -> bool {
    let r = ra + rb;
    (a - b).norm_squared() < r * r
}

/// Support point of a ball; a zero direction yields the first-axis pole
pub(crate) fn ball_support<const D: usize>(center: &VectorN<D>, radius: Real, direction: &VectorN<D>) -> VectorN<D> {
    let dir = safe_normalize(direction).unwrap_or_else(first_axis::<D>);
    center + dir * radius
}

/// Vector from `point` to the nearest point of a ball's boundary
///
/// At the exact center every boundary point is equally near; the first-axis
/// pole is returned.
pub(crate) fn ball_gradient<const D: usize>(center: &VectorN<D>, radius: Real, point: &VectorN<D>) -> VectorN<D> {
    let v = point - center;
    let n = v.norm();
    if n < EPSILON {
        return first_axis::<D>() * radius;
    }
    v * ((radius - n) / n)
}

pub(crate) fn ball_bounding_box<const D: usize>(center: &VectorN<D>, radius: Real) -> BoundingBox<D> {
    BoundingBox::from_center_extents(*center, VectorN::<D>::repeat(radius))
}

impl SupportMap<2> for CircularObstacle {
    fn support(&self, direction: &Vec2) -> Vec2 {
        ball_support(&self.center, self.radius, direction)
    }
}

impl Obstacle<2> for CircularObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Circle
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox2D {
        ball_bounding_box(&self.center, self.radius)
    }

    fn contains_point(&self, point: &Vec2) -> bool {
        (point - self.center).norm_squared() < self.radius * self.radius
    }

    fn gradient(&self, point: &Vec2) -> Result<Vec2, GradientError> {
        Ok(ball_gradient(&self.center, self.radius, point))
    }

    fn update_position(&mut self, new_center: &Vec2) {
        self.center = *new_center;
    }

    fn rotate_about(&mut self, origin: &Vec2, rotation: &Rot2) {
        self.center = rotate_about(&self.center, origin, rotation);
    }

    fn bloat(&mut self, amount: Real) {
        self.set_radius(self.radius + amount);
    }
}

impl fmt::Display for CircularObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CircularObstacle[{},center=({}, {}),radius={}]",
            self.name, self.center.x, self.center.y, self.radius
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_circle_boundary() {
        let a = CircularObstacle::new(Vec2::zeros(), 5.0);
        let apart = CircularObstacle::new(Vec2::new(9.0, 0.0), 4.0);
        let overlap = CircularObstacle::new(Vec2::new(8.0, 0.0), 4.0);
        assert!(!a.collides_circle(&apart));
        assert!(!apart.collides_circle(&a));
        assert!(a.collides_circle(&overlap));
        assert!(overlap.collides_circle(&a));
    }

    #[test]
    fn test_gradient_outside_lands_on_boundary() {
        let c = CircularObstacle::new(Vec2::zeros(), 10.0);
        let g = c.gradient(&Vec2::new(20.0, 0.0)).unwrap();
        assert_relative_eq!(g, Vec2::new(-10.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_inside_and_center() {
        let c = CircularObstacle::new(Vec2::new(1.0, 1.0), 2.0);
        let g = c.gradient(&Vec2::new(1.0, 1.5)).unwrap();
        assert_relative_eq!(g, Vec2::new(0.0, 1.5), epsilon = 1e-12);
        let g = c.gradient(&Vec2::new(1.0, 1.0)).unwrap();
        assert_relative_eq!(g, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_support_and_zero_direction() {
        let c = CircularObstacle::new(Vec2::new(1.0, 0.0), 2.0);
        assert_relative_eq!(c.support(&Vec2::new(0.0, -3.0)), Vec2::new(1.0, -2.0), epsilon = 1e-12);
        let s = c.support(&Vec2::zeros());
        assert!(s.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_contract_clamps_at_zero() {
        let mut c = CircularObstacle::new(Vec2::zeros(), 1.0);
        c.contract(0.25);
        assert_relative_eq!(c.radius(), 0.75);
        c.contract(5.0);
        assert_relative_eq!(c.radius(), 0.0);
        c.bloat(2.0);
        assert_relative_eq!(c.radius(), 2.0);
    }

    #[test]
    fn test_rotate_about_moves_center() {
        let mut c = CircularObstacle::new(Vec2::new(2.0, 0.0), 1.0);
        c.rotate_about(&Vec2::zeros(), &Rot2::new(std::f64::consts::PI));
        assert_relative_eq!(c.center(), Vec2::new(-2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(c.bounding_box().min, Vec2::new(-3.0, -1.0), epsilon = 1e-12);
    }
}
