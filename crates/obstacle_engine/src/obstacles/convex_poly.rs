//! Convex polygon obstacle
//!
//! Vertices are kept in counter-clockwise order, so the right-hand normal of
//! every edge points outward. A polygon is built either all at once
//! ([`ConvexPolyObstacle::from_points`], [`ConvexPolyObstacle::hull`]) or
//! incrementally with [`ConvexPolyObstacle::add_point`] followed by
//! [`ConvexPolyObstacle::close`]. Queries on an open polygon are rejected.

use std::fmt;

use crate::foundation::math::utils::{rotate_about, safe_normalize};
use crate::foundation::math::{Real, Rot2, Vec2, EPSILON};
use crate::obstacles::circle::CircularObstacle;
use crate::obstacles::rectangle::RectangularObstacle;
use crate::obstacles::{GradientError, Obstacle, ObstacleError, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox2D;

/// Convex polygon given by its vertices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvexPolyObstacle {
    name: String,
    points: Vec<Vec2>,
    // normals[i] belongs to the edge points[i] -> points[i + 1]
    normals: Vec<Vec2>,
    closed: bool,
}

/// Outward normal of the edge `from -> to` for counter-clockwise winding
fn edge_normal(from: &Vec2, to: &Vec2) -> Vec2 {
    let d = to - from;
    safe_normalize(&Vec2::new(d.y, -d.x)).unwrap_or_else(Vec2::zeros)
}

/// z component of `(b - o) x (c - o)`
fn cross(o: &Vec2, b: &Vec2, c: &Vec2) -> Real {
    (b - o).perp(&(c - o))
}

impl ConvexPolyObstacle {
    /// Create an empty, open polygon
    pub fn new() -> Self {
        Self {
            name: String::from("convex_poly"),
            ..Self::default()
        }
    }

    /// Create a closed polygon from explicitly ordered vertices
    ///
    /// Clockwise input is reversed so that normals face outward.
    pub fn from_points<I>(points: I) -> Result<Self, ObstacleError>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut poly = Self::new();
        for p in points {
            poly.add_point(p);
        }
        poly.close()?;
        Ok(poly)
    }

    /// Create the convex hull of an unordered point set (monotone chain)
    pub fn hull(points: &[Vec2]) -> Result<Self, ObstacleError> {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        sorted.dedup_by(|a, b| (*a - *b).norm() < EPSILON);
        if sorted.len() < 3 {
            return Err(ObstacleError::TooFewPoints(sorted.len()));
        }

        let mut chain: Vec<Vec2> = Vec::with_capacity(sorted.len() + 1);
        // lower hull
        for p in &sorted {
            while chain.len() >= 2 && cross(&chain[chain.len() - 2], &chain[chain.len() - 1], p) <= 0.0 {
                chain.pop();
            }
            chain.push(*p);
        }
        // upper hull
        let lower_len = chain.len() + 1;
        for p in sorted.iter().rev().skip(1) {
            while chain.len() >= lower_len && cross(&chain[chain.len() - 2], &chain[chain.len() - 1], p) <= 0.0 {
                chain.pop();
            }
            chain.push(*p);
        }
        // last point repeats the first
        chain.pop();

        if chain.len() < 3 {
            return Err(ObstacleError::TooFewPoints(chain.len()));
        }
        Self::from_points(chain)
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a vertex; reopens a closed polygon
    pub fn add_point(&mut self, point: Vec2) {
        if let Some(last) = self.points.last() {
            if (point - last).norm() < EPSILON {
                log::warn!("{}: skipping duplicate point ({}, {})", self.name, point.x, point.y);
                return;
            }
        }
        if self.closed {
            // drop the closing edge
            self.normals.pop();
            self.closed = false;
        }
        if let Some(last) = self.points.last() {
            self.normals.push(edge_normal(last, &point));
        }
        self.points.push(point);
    }

    /// Add the closing edge, fixing the winding if the points were clockwise
    pub fn close(&mut self) -> Result<(), ObstacleError> {
        if self.closed {
            log::warn!("{}: already closed", self.name);
            return Ok(());
        }
        let repeats_first = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && (first - last).norm() < EPSILON,
            _ => false,
        };
        if repeats_first {
            self.points.pop();
        }
        if self.points.len() < 3 {
            return Err(ObstacleError::TooFewPoints(self.points.len()));
        }

        if self.signed_area() < 0.0 {
            log::debug!("{}: clockwise points, reversing winding", self.name);
            self.points.reverse();
        }
        self.closed = true;
        self.rebuild_normals();
        Ok(())
    }

    /// Remove every vertex
    pub fn clear(&mut self) {
        self.points.clear();
        self.normals.clear();
        self.closed = false;
    }

    /// Translate every vertex by `offset`
    pub fn offset(&mut self, offset: &Vec2) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Vertices in counter-clockwise order (once closed)
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Outward edge normals, one per edge
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// True once [`Self::close`] has succeeded and no point was added after
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Twice the signed area, positive for counter-clockwise winding
    fn signed_area(&self) -> Real {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].perp(&self.points[(i + 1) % n]))
            .sum()
    }

    fn rebuild_normals(&mut self) {
        let n = self.points.len();
        self.normals = (0..n)
            .map(|i| edge_normal(&self.points[i], &self.points[(i + 1) % n]))
            .collect();
    }

    fn next_point(&self, i: usize) -> &Vec2 {
        &self.points[(i + 1) % self.points.len()]
    }

    /// Shared guard for queries requiring a closed polygon
    fn check_closed(&self) -> bool {
        if self.closed && self.points.len() >= 3 {
            true
        } else {
            log::warn!(
                "{}: query on open polygon ({} points, {} normals)",
                self.name,
                self.points.len(),
                self.normals.len()
            );
            false
        }
    }

    /// True if some edge of `self` has every point of `others` on its outer side
    fn has_separating_edge(&self, others: &[Vec2]) -> bool {
        self.points.iter().zip(&self.normals).any(|(p, n)| {
            others.iter().all(|o| (o - p).dot(n) >= 0.0)
        })
    }

    /// Separating axis test against an oriented rectangle
    pub fn collides_rectangle(&self, rect: &RectangularObstacle) -> bool {
        if !self.check_closed() {
            return false;
        }
        if self.has_separating_edge(rect.corners()) {
            return false;
        }
        // our vertices against the rectangle's own axes
        let (lo, hi) = rect.local_bounds();
        let mut min = Vec2::repeat(Real::INFINITY);
        let mut max = Vec2::repeat(Real::NEG_INFINITY);
        for p in &self.points {
            let q = rect.to_local(p);
            min = min.inf(&q);
            max = max.sup(&q);
        }
        lo.x < max.x && min.x < hi.x && lo.y < max.y && min.y < hi.y
    }

    /// Exact test against a circle by walking the edges
    pub fn collides_circle(&self, circle: &CircularObstacle) -> bool {
        if !self.check_closed() {
            return false;
        }
        let center = circle.center();
        let r = circle.radius();
        let r2 = r * r;

        // once outside any half-plane the circle must reach an edge or corner
        let mut outside = false;
        for (i, (p, n)) in self.points.iter().zip(&self.normals).enumerate() {
            let v = center - p;
            let d = v.dot(n);
            if d >= r {
                return false;
            }
            if d < 0.0 {
                continue;
            }
            outside = true;
            // position along the edge direction
            let along = v.x * -n.y + v.y * n.x;
            let next = self.next_point(i);
            let len = (next - p).norm();
            let hit = if along < 0.0 {
                v.norm_squared() < r2
            } else if along > len {
                (center - next).norm_squared() < r2
            } else {
                true
            };
            if hit {
                return true;
            }
        }
        !outside
    }

    /// Separating axis test over both edge sets
    pub fn collides_poly(&self, other: &Self) -> bool {
        if !self.check_closed() || !other.check_closed() {
            return false;
        }
        !(self.has_separating_edge(&other.points) || other.has_separating_edge(&self.points))
    }
}

impl SupportMap<2> for ConvexPolyObstacle {
    fn support(&self, direction: &Vec2) -> Vec2 {
        let mut best: Option<(Real, &Vec2)> = None;
        for p in &self.points {
            let d = direction.dot(p);
            if best.map_or(true, |(max, _)| d > max) {
                best = Some((d, p));
            }
        }
        match best {
            Some((_, p)) => *p,
            None => {
                log::warn!("{}: support of empty polygon", self.name);
                Vec2::zeros()
            }
        }
    }
}

impl Obstacle<2> for ConvexPolyObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::ConvexPoly
    }

    /// Vertex average
    fn center(&self) -> Vec2 {
        if self.points.is_empty() {
            return Vec2::zeros();
        }
        self.points.iter().sum::<Vec2>() / self.points.len() as Real
    }

    fn bounding_box(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(self.points.iter())
    }

    fn contains_point(&self, point: &Vec2) -> bool {
        if !self.check_closed() {
            return false;
        }
        self.points
            .iter()
            .zip(&self.normals)
            .all(|(p, n)| (point - p).dot(n) < 0.0)
    }

    fn gradient(&self, point: &Vec2) -> Result<Vec2, GradientError> {
        if !self.check_closed() {
            return Err(GradientError::NotClosed);
        }

        let mut closest2 = Real::INFINITY;
        let mut answer = Vec2::zeros();
        let mut consider = |candidate: Vec2| {
            let d2 = candidate.norm_squared();
            if d2 < closest2 {
                closest2 = d2;
                answer = candidate;
            }
        };

        for (i, (p, n)) in self.points.iter().zip(&self.normals).enumerate() {
            let v = point - p;
            let along = v.x * -n.y + v.y * n.x;
            if along < 0.0 {
                consider(-v);
                continue;
            }
            let next = self.next_point(i);
            if along <= (next - p).norm() {
                // foot of the perpendicular lies on this edge
                consider(n * -v.dot(n));
            } else {
                consider(next - point);
            }
        }
        Ok(answer)
    }

    fn update_position(&mut self, new_center: &Vec2) {
        let offset = new_center - self.center();
        self.offset(&offset);
    }

    fn rotate_about(&mut self, origin: &Vec2, rotation: &Rot2) {
        for p in &mut self.points {
            *p = rotate_about(p, origin, rotation);
        }
        for n in &mut self.normals {
            *n = rotation * *n;
        }
    }

    /// Push every edge out along its normal by `amount`
    ///
    /// A contraction that would turn an edge inside out is refused.
    fn bloat(&mut self, amount: Real) {
        if !self.check_closed() {
            return;
        }
        let n = self.points.len();
        let moved: Vec<Vec2> = (0..n)
            .map(|i| {
                let prev = &self.normals[(i + n - 1) % n];
                let cur = &self.normals[i];
                let denom = (1.0 + prev.dot(cur)).max(EPSILON);
                self.points[i] + (prev + cur) * (amount / denom)
            })
            .collect();

        let inverted = (0..n).any(|i| {
            let before = self.next_point(i) - self.points[i];
            let after = moved[(i + 1) % n] - moved[i];
            before.dot(&after) <= 0.0
        });
        if inverted {
            log::warn!("{}: contraction by {} would invert the polygon, ignoring", self.name, -amount);
            return;
        }
        self.points = moved;
    }
}

impl fmt::Display for ConvexPolyObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConvexPolyObstacle[{},#points={},#normals={}]",
            self.name,
            self.points.len(),
            self.normals.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: Real = 1e-9;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_counter_clockwise_normals_face_out() {
        let poly = ConvexPolyObstacle::from_points(unit_square()).unwrap();
        assert!(poly.is_closed());
        assert_eq!(poly.normals().len(), 4);
        assert_relative_eq!(poly.normals()[0], Vec2::new(0.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(poly.normals()[1], Vec2::new(1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_clockwise_input_is_corrected() {
        let mut cw = unit_square();
        cw.reverse();
        let poly = ConvexPolyObstacle::from_points(cw).unwrap();
        assert!(poly.signed_area() > 0.0);
        for (p, n) in poly.points().iter().zip(poly.normals()) {
            // the centroid lies on the inner side of every edge
            assert!((Vec2::new(1.0, 1.0) - p).dot(n) < 0.0);
        }
        assert!(poly.contains_point(&Vec2::new(1.0, 1.0)));
        assert!(!poly.contains_point(&Vec2::new(3.0, 1.0)));
    }

    #[test]
    fn test_open_polygon_is_rejected() {
        let mut poly = ConvexPolyObstacle::new();
        poly.add_point(Vec2::new(0.0, 0.0));
        poly.add_point(Vec2::new(1.0, 0.0));
        poly.add_point(Vec2::new(0.0, 1.0));
        assert!(!poly.is_closed());
        assert!(!poly.contains_point(&Vec2::new(0.2, 0.2)));
        assert_eq!(poly.gradient(&Vec2::zeros()), Err(GradientError::NotClosed));
        poly.close().unwrap();
        assert!(poly.contains_point(&Vec2::new(0.2, 0.2)));
        assert_eq!(poly.normals().len(), poly.points().len());
    }

    #[test]
    fn test_too_few_points() {
        let err = ConvexPolyObstacle::from_points(vec![Vec2::zeros(), Vec2::new(1.0, 0.0)]);
        assert_eq!(err, Err(ObstacleError::TooFewPoints(2)));
    }

    #[test]
    fn test_duplicate_points_skipped() {
        let mut poly = ConvexPolyObstacle::new();
        poly.add_point(Vec2::new(0.0, 0.0));
        poly.add_point(Vec2::new(0.0, 0.0));
        assert_eq!(poly.points().len(), 1);
    }

    #[test]
    fn test_hull_drops_interior_points() {
        let mut pts = unit_square();
        pts.push(Vec2::new(1.0, 1.0));
        pts.push(Vec2::new(1.0, 0.0)); // collinear on an edge
        let poly = ConvexPolyObstacle::hull(&pts).unwrap();
        assert_eq!(poly.points().len(), 4);
        assert!(poly.signed_area() > 0.0);
    }

    #[test]
    fn test_poly_collisions() {
        let poly = ConvexPolyObstacle::from_points(unit_square()).unwrap();
        let tri = ConvexPolyObstacle::from_points(vec![
            Vec2::new(1.5, 1.5),
            Vec2::new(4.0, 1.5),
            Vec2::new(1.5, 4.0),
        ])
        .unwrap();
        let far = ConvexPolyObstacle::from_points(vec![
            Vec2::new(3.0, 3.0),
            Vec2::new(5.0, 3.0),
            Vec2::new(3.0, 5.0),
        ])
        .unwrap();
        assert!(poly.collides_poly(&tri));
        assert!(tri.collides_poly(&poly));
        assert!(!poly.collides_poly(&far));
        assert!(!far.collides_poly(&poly));
    }

    #[test]
    fn test_circle_against_edges_and_corners() {
        let poly = ConvexPolyObstacle::from_points(unit_square()).unwrap();
        // beside an edge
        assert!(poly.collides_circle(&CircularObstacle::new(Vec2::new(2.5, 1.0), 0.6)));
        assert!(!poly.collides_circle(&CircularObstacle::new(Vec2::new(2.7, 1.0), 0.6)));
        // diagonal from a corner: distance sqrt(0.5) ~ 0.707
        assert!(poly.collides_circle(&CircularObstacle::new(Vec2::new(2.5, 2.5), 0.75)));
        assert!(!poly.collides_circle(&CircularObstacle::new(Vec2::new(2.5, 2.5), 0.7)));
        // fully inside
        assert!(poly.collides_circle(&CircularObstacle::new(Vec2::new(1.0, 1.0), 0.1)));
    }

    #[test]
    fn test_circle_reaching_a_corner_two_edges_on() {
        // the circle is outside the first two edges but only reaches the far
        // corner of the second, which the third edge also owns
        let sliver = ConvexPolyObstacle::from_points(vec![
            Vec2::new(-1.776, 4.300),
            Vec2::new(-0.826, 2.705),
            Vec2::new(-0.237, 2.612),
        ])
        .unwrap();
        let corner = Vec2::new(-0.237, 2.612);
        let circle = CircularObstacle::new(Vec2::new(-0.470, 1.001), 1.697);
        assert!((corner - circle.center()).norm() < circle.radius());

        assert!(sliver.collides_circle(&circle));
        assert!(crate::physics::gjk::collides(&sliver, &circle));
        assert_relative_eq!(
            sliver.gradient(&circle.center()).unwrap(),
            corner - circle.center(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_rectangle_test_uses_both_axis_sets() {
        let tri = ConvexPolyObstacle::from_points(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
        ])
        .unwrap();
        // no triangle edge separates this one, only the rectangle's x axis does
        let beside = RectangularObstacle::new(Vec2::new(6.0, -0.5), Vec2::new(1.0, 1.0), 0.0);
        assert!(!tri.has_separating_edge(beside.corners()));
        assert!(!tri.collides_rectangle(&beside));

        let beyond = RectangularObstacle::new(Vec2::new(3.2, 3.2), Vec2::new(1.0, 1.0), 0.0);
        assert!(!tri.collides_rectangle(&beyond));

        let hit = RectangularObstacle::new(Vec2::new(3.5, -0.5), Vec2::new(1.0, 1.0), 0.0);
        assert!(tri.collides_rectangle(&hit));
    }

    #[test]
    fn test_gradient_edge_and_corner() {
        let poly = ConvexPolyObstacle::from_points(unit_square()).unwrap();
        assert_relative_eq!(poly.gradient(&Vec2::new(3.0, 1.0)).unwrap(), Vec2::new(-1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(poly.gradient(&Vec2::new(3.0, 3.0)).unwrap(), Vec2::new(-1.0, -1.0), epsilon = EPSILON);
        assert_relative_eq!(poly.gradient(&Vec2::new(1.0, 0.5)).unwrap(), Vec2::new(0.0, -0.5), epsilon = EPSILON);
    }

    #[test]
    fn test_bloat_offsets_edges() {
        let mut poly = ConvexPolyObstacle::from_points(unit_square()).unwrap();
        poly.bloat(0.5);
        let bb = poly.bounding_box();
        assert_relative_eq!(bb.min, Vec2::new(-0.5, -0.5), epsilon = EPSILON);
        assert_relative_eq!(bb.max, Vec2::new(2.5, 2.5), epsilon = EPSILON);
        poly.contract(0.5);
        assert_relative_eq!(poly.points()[0], Vec2::zeros(), epsilon = EPSILON);
        // would invert: ignored
        poly.contract(5.0);
        assert_relative_eq!(poly.bounding_box().max, Vec2::new(2.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_keeps_normals_outward() {
        let mut poly = ConvexPolyObstacle::from_points(unit_square()).unwrap();
        poly.rotate(&Rot2::new(0.8));
        assert_relative_eq!(poly.center(), Vec2::new(1.0, 1.0), epsilon = EPSILON);
        let c = poly.center();
        for (p, n) in poly.points().iter().zip(poly.normals()) {
            assert!((c - p).dot(n) < 0.0);
        }
    }
}
