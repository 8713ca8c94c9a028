//! Oriented rectangle obstacle
//!
//! The canonical state is center, half-extents and orientation. Corners,
//! local-frame extents and the AABB are derived caches rebuilt together by
//! [`RectangularObstacle::reset`], which every mutator goes through.

use std::fmt;

use crate::foundation::math::{Real, Rot2, Vec2};
use crate::obstacles::circle::CircularObstacle;
use crate::obstacles::{clamp_extent, GradientError, Obstacle, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox2D;

/// Index of a rectangle corner in [`RectangularObstacle::corners`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CornerOrder {
    /// `+x, +y` in the local frame
    TopRight = 0,
    /// `-x, +y` in the local frame
    TopLeft = 1,
    /// `-x, -y` in the local frame
    BottomLeft = 2,
    /// `+x, -y` in the local frame
    BottomRight = 3,
}

/// Rectangle with arbitrary orientation
#[derive(Debug, Clone, PartialEq)]
pub struct RectangularObstacle {
    name: String,
    center: Vec2,
    extents: Vec2,
    orientation: Rot2,
    corners: [Vec2; 4],
    // bounds of the rectangle expressed in its own (unrotated) frame
    local_min: Vec2,
    local_max: Vec2,
    bbox: BoundingBox2D,
}

impl RectangularObstacle {
    /// Create a rectangle from its center, half-extents and rotation angle (radians)
    pub fn new(center: Vec2, extents: Vec2, angle: Real) -> Self {
        Self::with_rotation(center, extents, Rot2::new(angle))
    }

    /// Create a rectangle from its center, half-extents and rotation
    pub fn with_rotation(center: Vec2, extents: Vec2, orientation: Rot2) -> Self {
        let mut rect = Self {
            name: String::from("rectangle"),
            center,
            extents,
            orientation,
            corners: [Vec2::zeros(); 4],
            local_min: Vec2::zeros(),
            local_max: Vec2::zeros(),
            bbox: BoundingBox2D::empty(),
        };
        rect.reset(center, extents, orientation);
        rect
    }

    /// Create a rectangle covering `bbox`, rotated by `orientation` about
    /// `bbox.center() + offset`
    pub fn from_bounding_box(bbox: &BoundingBox2D, orientation: Rot2, offset: Vec2) -> Self {
        let pivot = bbox.center() + offset;
        let center = orientation * (bbox.center() - pivot) + pivot;
        Self::with_rotation(center, bbox.extents(), orientation)
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the geometry and rebuild every cached value
    pub fn reset(&mut self, center: Vec2, extents: Vec2, orientation: Rot2) {
        let extents = Vec2::new(
            clamp_extent(extents.x, "width", &self.name),
            clamp_extent(extents.y, "height", &self.name),
        );

        self.center = center;
        self.extents = extents;
        self.orientation = orientation;

        let off = orientation * extents;
        self.corners[CornerOrder::TopRight as usize] = center + off;
        self.corners[CornerOrder::BottomLeft as usize] = center - off;
        let off = orientation * Vec2::new(-extents.x, extents.y);
        self.corners[CornerOrder::TopLeft as usize] = center + off;
        self.corners[CornerOrder::BottomRight as usize] = center - off;

        self.bbox = BoundingBox2D::from_points(self.corners.iter());

        let local_center = orientation.inverse() * center;
        self.local_min = local_center - extents;
        self.local_max = local_center + extents;
    }

    /// World-frame position of one corner
    pub fn corner(&self, which: CornerOrder) -> Vec2 {
        self.corners[which as usize]
    }

    /// All four corners, indexed by [`CornerOrder`]
    pub const fn corners(&self) -> &[Vec2; 4] {
        &self.corners
    }

    /// Full width along the local x axis
    pub fn width(&self) -> Real {
        self.extents.x * 2.0
    }

    /// Full height along the local y axis
    pub fn height(&self) -> Real {
        self.extents.y * 2.0
    }

    /// Half-width and half-height
    pub const fn extents(&self) -> Vec2 {
        self.extents
    }

    /// Rotation from the local frame to the world frame
    pub const fn orientation(&self) -> Rot2 {
        self.orientation
    }

    /// Rotation angle in radians, in `(-pi, pi]`
    pub fn orientation_angle(&self) -> Real {
        self.orientation.angle()
    }

    /// Rotate a world point into the rectangle's unrotated frame
    pub(crate) fn to_local(&self, point: &Vec2) -> Vec2 {
        self.orientation.inverse() * point
    }

    /// Min and max corners in the unrotated frame (see [`Self::to_local`])
    pub(crate) const fn local_bounds(&self) -> (Vec2, Vec2) {
        (self.local_min, self.local_max)
    }

    fn axis(&self, i: usize) -> Vec2 {
        self.orientation.matrix().column(i).into_owned()
    }

    /// Local-frame min/max of another rectangle's corners projected on our axes
    fn project_corners(&self, corners: &[Vec2; 4]) -> (Vec2, Vec2) {
        let mut min = Vec2::repeat(Real::INFINITY);
        let mut max = Vec2::repeat(Real::NEG_INFINITY);
        for c in corners {
            let p = self.to_local(c);
            min = min.inf(&p);
            max = max.sup(&p);
        }
        (min, max)
    }

    fn separated_on_own_axes(&self, other: &Self) -> bool {
        let (min, max) = self.project_corners(&other.corners);
        max.x <= self.local_min.x
            || self.local_max.x <= min.x
            || max.y <= self.local_min.y
            || self.local_max.y <= min.y
    }

    /// Separating axis test against another rectangle
    ///
    /// Rectangles that only touch along an edge do not collide.
    pub fn collides_rectangle(&self, other: &Self) -> bool {
        if !self.bbox.intersects(&other.bbox) {
            return false;
        }
        !(self.separated_on_own_axes(other) || other.separated_on_own_axes(self))
    }

    /// Exact test against a circle using the nine local Voronoi regions
    pub fn collides_circle(&self, circle: &CircularObstacle) -> bool {
        let r = circle.radius();
        let p = self.to_local(&circle.center());
        let (lo, hi) = (self.local_min, self.local_max);

        if p.x + r <= lo.x || hi.x <= p.x - r || p.y + r <= lo.y || hi.y <= p.y - r {
            return false;
        }

        let corner = if p.x < lo.x {
            if p.y < lo.y {
                Some(lo)
            } else if hi.y < p.y {
                Some(Vec2::new(lo.x, hi.y))
            } else {
                None
            }
        } else if hi.x < p.x {
            if p.y < lo.y {
                Some(Vec2::new(hi.x, lo.y))
            } else if hi.y < p.y {
                Some(hi)
            } else {
                None
            }
        } else {
            None
        };

        // edge margins and the interior already overlap after the slab test
        corner.map_or(true, |c| (c - p).norm_squared() < r * r)
    }
}

impl SupportMap<2> for RectangularObstacle {
    fn support(&self, direction: &Vec2) -> Vec2 {
        let dir = self.to_local(direction);
        let which = match (dir.x > 0.0, dir.y > 0.0) {
            (true, true) => CornerOrder::TopRight,
            (true, false) => CornerOrder::BottomRight,
            (false, true) => CornerOrder::TopLeft,
            (false, false) => CornerOrder::BottomLeft,
        };
        self.corner(which)
    }
}

impl Obstacle<2> for RectangularObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Rectangle
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox2D {
        self.bbox
    }

    fn contains_point(&self, point: &Vec2) -> bool {
        let p = self.to_local(point);
        self.local_min.x < p.x && p.x < self.local_max.x && self.local_min.y < p.y && p.y < self.local_max.y
    }

    fn gradient(&self, point: &Vec2) -> Result<Vec2, GradientError> {
        let p = self.to_local(point);
        let (lo, hi) = (self.local_min, self.local_max);
        let (ax, ay) = (self.axis(0), self.axis(1));

        let corner = |which: CornerOrder| self.corner(which) - point;

        let g = if p.x < lo.x {
            if p.y < lo.y {
                corner(CornerOrder::BottomLeft)
            } else if hi.y < p.y {
                corner(CornerOrder::TopLeft)
            } else {
                ax * (lo.x - p.x)
            }
        } else if hi.x < p.x {
            if p.y < lo.y {
                corner(CornerOrder::BottomRight)
            } else if hi.y < p.y {
                corner(CornerOrder::TopRight)
            } else {
                ax * (hi.x - p.x)
            }
        } else if p.y < lo.y {
            ay * (lo.y - p.y)
        } else if hi.y < p.y {
            ay * (hi.y - p.y)
        } else {
            // inside: leave through the nearest edge
            let candidates = [
                (p.x - lo.x, ax * (lo.x - p.x)),
                (p.y - lo.y, ay * (lo.y - p.y)),
                (hi.x - p.x, ax * (hi.x - p.x)),
                (hi.y - p.y, ay * (hi.y - p.y)),
            ];
            candidates
                .iter()
                .fold(candidates[0], |best, c| if c.0 < best.0 { *c } else { best })
                .1
        };
        Ok(g)
    }

    fn update_position(&mut self, new_center: &Vec2) {
        self.reset(*new_center, self.extents, self.orientation);
    }

    fn rotate_about(&mut self, origin: &Vec2, rotation: &Rot2) {
        let center = rotation * (self.center - origin) + origin;
        self.reset(center, self.extents, rotation * self.orientation);
    }

    fn bloat(&mut self, amount: Real) {
        self.reset(self.center, self.extents.add_scalar(amount), self.orientation);
    }
}

impl fmt::Display for RectangularObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RectangularObstacle[{},corners=[", self.name)?;
        for (i, c) in self.corners.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({}, {})", c.x, c.y)?;
        }
        write!(f, "],angle={}]", self.orientation_angle())
    }
}
