//! Oriented ellipse obstacle
//!
//! Stored as center, semi-axes and the angle of the major axis. The focal
//! description is derived on demand.
//!
//! The nearest boundary point to `(x, y)` (local frame) is a root of
//!
//! ```text
//! f(t) = A cos t sin t - B sin t + C cos t,   A = a^2 - b^2, B = a x, C = b y
//! ```
//!
//! Substituting `u = cos t` gives a quartic in `u` solved in closed form.

use std::fmt;

use crate::foundation::math::utils::{rotate_about, sgn};
use crate::foundation::math::{constants::HALF_PI, Real, Rot2, Vec2, EPSILON};
use crate::foundation::polynomial::solve_quartic;
use crate::obstacles::circle::{ball_gradient, ball_support, CircularObstacle};
use crate::obstacles::{clamp_extent, GradientError, Obstacle, ObstacleError, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox2D;

/// Relative tolerance under which the two semi-axes are treated as equal
const CIRCLE_TOLERANCE: Real = 1e-9;

const NEWTON_STEPS: usize = 4;

/// Ellipse with arbitrary orientation
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalObstacle {
    name: String,
    center: Vec2,
    semimajor: Real,
    semiminor: Real,
    angle: Real,
}

impl EllipticalObstacle {
    /// Create an ellipse from its center, semi-axes and major-axis angle
    ///
    /// If `semiminor > semimajor` the two are swapped and the angle turned
    /// by a quarter so that the described shape is unchanged.
    pub fn new(center: Vec2, semimajor: Real, semiminor: Real, angle: Real) -> Self {
        let mut ellipse = Self {
            name: String::from("ellipse"),
            center,
            semimajor: 0.0,
            semiminor: 0.0,
            angle: 0.0,
        };
        ellipse.reset(center, semimajor, semiminor, angle);
        ellipse
    }

    /// Create an ellipse from its two foci and semimajor length
    pub fn from_foci(focus1: Vec2, focus2: Vec2, semimajor: Real) -> Result<Self, ObstacleError> {
        let center = (focus1 + focus2) / 2.0;
        let semimajor = semimajor.abs();
        let half = focus1 - center;
        let half_focal = half.norm();
        let d = semimajor * semimajor - half_focal * half_focal;
        if d < 0.0 {
            return Err(ObstacleError::SemimajorTooShort { semimajor, half_focal });
        }
        let angle = if half_focal < EPSILON { 0.0 } else { half.y.atan2(half.x) };
        Ok(Self::new(center, semimajor, d.sqrt(), angle))
    }

    /// Ellipse covering exactly the same disc as `circle`
    pub fn from_circle(circle: &CircularObstacle) -> Self {
        Self::new(circle.center(), circle.radius(), circle.radius(), 0.0).with_name(circle.name())
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the geometry, keeping `semimajor >= semiminor`
    pub fn reset(&mut self, center: Vec2, semimajor: Real, semiminor: Real, angle: Real) {
        let mut semimajor = clamp_extent(semimajor, "semimajor", &self.name);
        let mut semiminor = clamp_extent(semiminor, "semiminor", &self.name);
        let mut angle = angle;
        if semimajor < semiminor {
            std::mem::swap(&mut semimajor, &mut semiminor);
            angle += HALF_PI;
        }
        self.center = center;
        self.semimajor = semimajor;
        self.semiminor = semiminor;
        self.angle = Rot2::new(angle).angle();
    }

    /// Length of the semimajor axis
    pub const fn semimajor(&self) -> Real {
        self.semimajor
    }

    /// Length of the semiminor axis
    pub const fn semiminor(&self) -> Real {
        self.semiminor
    }

    /// Angle of the major axis in radians, in `(-pi, pi]`
    pub const fn angle(&self) -> Real {
        self.angle
    }

    /// Rotation from the local frame (major axis along x) to the world frame
    pub fn orientation(&self) -> Rot2 {
        Rot2::new(self.angle)
    }

    /// The two foci, the first one lying along `+angle`
    pub fn foci(&self) -> (Vec2, Vec2) {
        let focal = (self.semimajor * self.semimajor - self.semiminor * self.semiminor)
            .max(0.0)
            .sqrt();
        let axis = self.orientation() * Vec2::new(focal, 0.0);
        (self.center + axis, self.center - axis)
    }

    fn is_circle(&self) -> bool {
        self.semimajor - self.semiminor <= CIRCLE_TOLERANCE * self.semimajor.max(1.0)
    }

    /// Boundary point at parametric angle `t` (measured in the local frame)
    pub fn point_on_edge(&self, t: Real) -> Vec2 {
        self.center + self.orientation() * Vec2::new(self.semimajor * t.cos(), self.semiminor * t.sin())
    }

    /// Boundary point hit by the ray leaving the center along `direction`
    pub fn point_on_edge_toward(&self, direction: &Vec2) -> Vec2 {
        let rot = self.orientation();
        let local = rot.inverse() * direction;
        if self.semiminor < EPSILON || local.norm() < EPSILON {
            return self.point_on_edge(if local.x < 0.0 { std::f64::consts::PI } else { 0.0 });
        }
        let q = (local.x / self.semimajor).powi(2) + (local.y / self.semiminor).powi(2);
        self.center + rot * (local / q.sqrt())
    }

    /// Nearest boundary point to a local-frame point, by solving the quartic
    ///
    /// `None` only for a non-finite point.
    fn nearest_local(&self, p: &Vec2) -> Option<Vec2> {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        let (a, b) = (self.semimajor, self.semiminor);
        let big_a = a * a - b * b;
        let big_b = a * p.x;
        let big_c = b * p.y;

        let cos_roots: Vec<Real> = if big_c.abs() < EPSILON * big_a {
            // on the major axis: sin t = 0 or cos t = B / A
            vec![1.0, -1.0, big_b / big_a]
        } else {
            let k = big_b / big_a;
            solve_quartic(
                -2.0 * k,
                (big_b * big_b + big_c * big_c - big_a * big_a) / (big_a * big_a),
                2.0 * k,
                -k * k,
            )
        };

        // each cos root maps to +t and -t
        let mut candidates: Vec<Real> = cos_roots
            .into_iter()
            .filter(|u| u.abs() <= 1.0 + 1e-6)
            .map(|u| u.clamp(-1.0, 1.0).acos())
            .flat_map(|t| [t, -t])
            .map(|t| newton_polish(t, big_a, big_b, big_c))
            .collect();
        if candidates.is_empty() {
            log::debug!("{}: no admissible quartic root for local point {:?}", self.name, p);
        }
        // the quartic can lose roots near the vertices of a nearly circular
        // ellipse; the radial seed and the vertices themselves cover that
        let seed = (a * p.y).atan2(b * p.x);
        candidates.push(newton_polish(seed, big_a, big_b, big_c));
        candidates.extend([0.0, HALF_PI, std::f64::consts::PI, -HALF_PI]);

        candidates
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| Vec2::new(a * t.cos(), b * t.sin()))
            .min_by(|x, y| (x - p).norm_squared().total_cmp(&(y - p).norm_squared()))
    }
}

/// Refine a root of `A cos t sin t - B sin t + C cos t`
fn newton_polish(mut t: Real, a: Real, b: Real, c: Real) -> Real {
    for _ in 0..NEWTON_STEPS {
        let (s, co) = t.sin_cos();
        let f = a * co * s - b * s + c * co;
        let df = a * (co * co - s * s) - b * co - c * s;
        if df.abs() < 1e-12 {
            break;
        }
        let next = t - f / df;
        if !next.is_finite() {
            break;
        }
        t = next;
    }
    t
}

impl SupportMap<2> for EllipticalObstacle {
    fn support(&self, direction: &Vec2) -> Vec2 {
        if self.is_circle() {
            return ball_support(&self.center, self.semimajor, direction);
        }

        let rot = self.orientation();
        let dir = rot.inverse() * direction;
        let (a, b) = (self.semimajor, self.semiminor);

        let local = if dir.x.abs() < EPSILON || a < EPSILON {
            Vec2::new(0.0, sgn(dir.y) * b)
        } else if dir.y.abs() < EPSILON || b < EPSILON {
            Vec2::new(sgn(dir.x) * a, 0.0)
        } else {
            // Lagrange multiplier on x^2/a^2 + y^2/b^2 = 1
            let (a2, b2) = (a * a, b * b);
            let k = (dir.y * b2) / (dir.x * a2);
            let x = sgn(dir.x) * (1.0 / (1.0 / a2 + k * k / b2)).sqrt();
            Vec2::new(x, k * x)
        };
        rot * local + self.center
    }
}

impl Obstacle<2> for EllipticalObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Ellipse
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox2D {
        let (s, c) = self.angle.sin_cos();
        let (a2, b2) = (self.semimajor * self.semimajor, self.semiminor * self.semiminor);
        let extents = Vec2::new((a2 * c * c + b2 * s * s).sqrt(), (a2 * s * s + b2 * c * c).sqrt());
        BoundingBox2D::from_center_extents(self.center, extents)
    }

    fn contains_point(&self, point: &Vec2) -> bool {
        if self.semiminor < EPSILON {
            return false;
        }
        let p = self.orientation().inverse() * (point - self.center);
        (p.x / self.semimajor).powi(2) + (p.y / self.semiminor).powi(2) < 1.0
    }

    fn gradient(&self, point: &Vec2) -> Result<Vec2, GradientError> {
        if self.is_circle() {
            return Ok(ball_gradient(&self.center, self.semimajor, point));
        }

        let rot = self.orientation();
        let local = rot.inverse() * (point - self.center);
        match self.nearest_local(&local) {
            Some(nearest) => Ok(rot * (nearest - local)),
            None => {
                log::debug!("{}: no nearest point for non-finite point {:?}", self.name, point);
                Err(GradientError::NoRealRoot)
            }
        }
    }

    fn update_position(&mut self, new_center: &Vec2) {
        self.center = *new_center;
    }

    fn rotate_about(&mut self, origin: &Vec2, rotation: &Rot2) {
        let center = rotate_about(&self.center, origin, rotation);
        self.reset(center, self.semimajor, self.semiminor, self.angle + rotation.angle());
    }

    fn bloat(&mut self, amount: Real) {
        self.reset(self.center, self.semimajor + amount, self.semiminor + amount, self.angle);
    }
}

impl fmt::Display for EllipticalObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (f1, f2) = self.foci();
        write!(
            f,
            "EllipticalObstacle[{},focus1=({}, {}),focus2=({}, {}),center=({}, {}),semimajor={},semiminor={},orientation={}]",
            self.name, f1.x, f1.y, f2.x, f2.y, self.center.x, self.center.y, self.semimajor, self.semiminor, self.angle
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn on_boundary(e: &EllipticalObstacle, p: &Vec2) -> Real {
        let local = e.orientation().inverse() * (p - e.center());
        (local.x / e.semimajor()).powi(2) + (local.y / e.semiminor()).powi(2)
    }

    #[test]
    fn test_axes_are_swapped() {
        let e = EllipticalObstacle::new(Vec2::zeros(), 2.0, 4.0, 0.0);
        assert_relative_eq!(e.semimajor(), 4.0);
        assert_relative_eq!(e.semiminor(), 2.0);
        assert_relative_eq!(e.angle(), HALF_PI);
        assert!(e.contains_point(&Vec2::new(0.0, 3.5)));
        assert!(!e.contains_point(&Vec2::new(3.5, 0.0)));
    }

    #[test]
    fn test_from_foci() {
        let e = EllipticalObstacle::from_foci(Vec2::new(3.0, 0.0), Vec2::new(-3.0, 0.0), 5.0).unwrap();
        assert_relative_eq!(e.semiminor(), 4.0, epsilon = 1e-12);
        let (f1, f2) = e.foci();
        assert_relative_eq!(f1, Vec2::new(3.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(f2, Vec2::new(-3.0, 0.0), epsilon = 1e-12);

        let err = EllipticalObstacle::from_foci(Vec2::new(3.0, 0.0), Vec2::new(-3.0, 0.0), 2.0);
        assert!(matches!(err, Err(ObstacleError::SemimajorTooShort { .. })));
    }

    #[test]
    fn test_support_matches_sampling() {
        let e = EllipticalObstacle::new(Vec2::new(1.0, -2.0), 5.0, 2.0, 0.6);
        for i in 0..32 {
            let theta = Real::from(i) * PI / 16.0;
            let d = Vec2::new(theta.cos(), theta.sin());
            let s = e.support(&d);
            assert_relative_eq!(on_boundary(&e, &s), 1.0, epsilon = 1e-9);
            let best = (0..2000)
                .map(|j| e.point_on_edge(Real::from(j) * 2.0 * PI / 2000.0).dot(&d))
                .fold(Real::NEG_INFINITY, Real::max);
            assert!(s.dot(&d) >= best - 1e-9);
        }
    }

    #[test]
    fn test_bounding_box_contains_supports() {
        let e = EllipticalObstacle::new(Vec2::new(-3.0, 2.0), 6.0, 1.0, 1.1);
        let bb = e.bounding_box().inflated(1e-9);
        for i in 0..64 {
            let theta = Real::from(i) * PI / 32.0;
            assert!(bb.contains_point(&e.support(&Vec2::new(theta.cos(), theta.sin()))));
        }
        // the box is tight along x
        let right = e.support(&Vec2::new(1.0, 0.0));
        assert_relative_eq!(right.x, e.bounding_box().max.x, epsilon = 1e-9);
    }

    #[test]
    fn test_gradient_on_axes() {
        let e = EllipticalObstacle::new(Vec2::zeros(), 4.0, 2.0, 0.0);
        assert_relative_eq!(e.gradient(&Vec2::new(10.0, 0.0)).unwrap(), Vec2::new(-6.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(e.gradient(&Vec2::new(0.0, 5.0)).unwrap(), Vec2::new(0.0, -3.0), epsilon = 1e-9);
    }

    #[test]
    fn test_gradient_inside_off_vertex() {
        let e = EllipticalObstacle::new(Vec2::zeros(), 4.0, 2.0, 0.0);
        let p = Vec2::new(1.0, 0.0);
        let g = e.gradient(&p).unwrap();
        // nearest point is at cos t = 1/3, closer than either vertex
        let expected = Vec2::new(4.0 / 3.0, 2.0 * (8.0 as Real / 9.0).sqrt()) - p;
        assert_relative_eq!(g.norm(), expected.norm(), epsilon = 1e-9);
        assert_relative_eq!(on_boundary(&e, &(p + g)), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gradient_is_nearest_boundary_point() {
        let mut rng = StdRng::seed_from_u64(7);
        let e = EllipticalObstacle::new(Vec2::new(2.0, 1.0), 5.0, 1.5, -0.4);
        let samples: Vec<Vec2> = (0..4000)
            .map(|j| e.point_on_edge(Real::from(j) * 2.0 * PI / 4000.0))
            .collect();
        for _ in 0..200 {
            let p = Vec2::new(rng.gen_range(-8.0..12.0), rng.gen_range(-8.0..10.0));
            let g = e.gradient(&p).unwrap();
            assert_relative_eq!(on_boundary(&e, &(p + g)), 1.0, epsilon = 1e-6);
            let brute = samples
                .iter()
                .map(|s| (s - p).norm())
                .fold(Real::INFINITY, Real::min);
            assert!(g.norm() <= brute + 1e-6, "gradient {} longer than sampled {}", g.norm(), brute);
        }
    }

    #[test]
    fn test_gradient_just_off_the_vertex_of_a_round_ellipse() {
        let e = EllipticalObstacle::new(Vec2::zeros(), 6.46005, 6.10676, 0.0);
        let p = Vec2::new(-5.26e-5, 6.5096);
        let g = e.gradient(&p).unwrap();
        assert_relative_eq!(on_boundary(&e, &(p + g)), 1.0, epsilon = 1e-9);
        assert_relative_eq!(g, Vec2::new(0.0, 6.10676 - 6.5096), epsilon = 1e-4);
    }

    #[test]
    fn test_gradient_across_eccentricities() {
        let mut rng = StdRng::seed_from_u64(8);
        for round in 0..300 {
            let a: Real = rng.gen_range(1.0..8.0);
            // a third of the draws are within a percent of a circle
            let ratio: Real = if round % 3 == 0 {
                rng.gen_range(0.99..0.999_999)
            } else {
                rng.gen_range(0.05..0.99)
            };
            let e = EllipticalObstacle::new(
                Vec2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)),
                a,
                a * ratio,
                rng.gen_range(-PI..PI),
            );
            let samples: Vec<Vec2> = (0..2000)
                .map(|j| e.point_on_edge(Real::from(j) * 2.0 * PI / 2000.0))
                .collect();

            let vertex = e.point_on_edge(Real::from(rng.gen_range(0_u32..4)) * HALF_PI);
            let offset = Vec2::new(rng.gen_range(-1e-3..1e-3), rng.gen_range(-1e-3..1e-3)) * a;
            let anywhere = e.center() + Vec2::new(rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5)) * a;

            for p in [vertex + offset, vertex * 1.05 - e.center() * 0.05 + offset, anywhere] {
                let g = e.gradient(&p).unwrap();
                assert_relative_eq!(on_boundary(&e, &(p + g)), 1.0, epsilon = 1e-6);
                let brute = samples
                    .iter()
                    .map(|s| (s - p).norm())
                    .fold(Real::INFINITY, Real::min);
                assert!(
                    g.norm() <= brute + 1e-6 * a,
                    "{e}: gradient {} from {p:?} longer than sampled {brute}",
                    g.norm()
                );
            }
        }
    }

    #[test]
    fn test_gradient_of_non_finite_point() {
        let e = EllipticalObstacle::new(Vec2::zeros(), 4.0, 2.0, 0.3);
        assert_eq!(e.gradient(&Vec2::new(Real::NAN, 1.0)), Err(GradientError::NoRealRoot));
        assert_eq!(e.gradient(&Vec2::new(Real::INFINITY, 0.0)), Err(GradientError::NoRealRoot));
    }

    #[test]
    fn test_round_ellipse_behaves_like_circle() {
        let e = EllipticalObstacle::from_circle(&CircularObstacle::new(Vec2::zeros(), 10.0));
        assert_relative_eq!(e.gradient(&Vec2::new(20.0, 0.0)).unwrap(), Vec2::new(-10.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(e.support(&Vec2::new(0.0, 2.0)), Vec2::new(0.0, 10.0), epsilon = 1e-12);
    }

    #[test]
    fn test_point_on_edge_toward() {
        let e = EllipticalObstacle::new(Vec2::new(1.0, 1.0), 4.0, 2.0, HALF_PI);
        assert_relative_eq!(e.point_on_edge_toward(&Vec2::new(0.0, 1.0)), Vec2::new(1.0, 5.0), epsilon = 1e-9);
        assert_relative_eq!(e.point_on_edge_toward(&Vec2::new(-3.0, 0.0)), Vec2::new(-1.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_and_bloat() {
        let mut e = EllipticalObstacle::new(Vec2::new(2.0, 0.0), 3.0, 1.0, 0.0);
        e.rotate_about(&Vec2::zeros(), &Rot2::new(HALF_PI));
        assert_relative_eq!(e.center(), Vec2::new(0.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(e.angle(), HALF_PI, epsilon = 1e-12);
        e.bloat(0.5);
        assert_relative_eq!(e.semimajor(), 3.5);
        assert_relative_eq!(e.semiminor(), 1.5);
        e.contract(2.0);
        assert_relative_eq!(e.semiminor(), 0.0);
        assert_relative_eq!(e.semimajor(), 1.5);
    }
}
