//! Closed family of planar obstacles

use std::fmt;

use crate::foundation::math::{Real, Rot2, Vec2};
use crate::obstacles::{
    CircularObstacle, ConvexPolyObstacle, EllipticalObstacle, GradientError, HierarchicalObstacle, Obstacle,
    ObstacleKind, RectangularObstacle,
};
use crate::physics::dispatch::Dispatcher;
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox2D;

/// Any planar obstacle
///
/// This is the unit the dispatcher matches on. Composites own their children
/// as `Obstacle2D` values, so cloning deep-copies the whole subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Obstacle2D {
    /// Oriented rectangle
    Rectangle(RectangularObstacle),
    /// Circle
    Circle(CircularObstacle),
    /// Oriented ellipse
    Ellipse(EllipticalObstacle),
    /// Convex polygon
    ConvexPoly(ConvexPolyObstacle),
    /// Composite of planar obstacles
    Hierarchy(HierarchicalObstacle),
}

macro_rules! each_2d {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Obstacle2D::Rectangle($inner) => $body,
            Obstacle2D::Circle($inner) => $body,
            Obstacle2D::Ellipse($inner) => $body,
            Obstacle2D::ConvexPoly($inner) => $body,
            Obstacle2D::Hierarchy($inner) => $body,
        }
    };
}

impl Obstacle2D {
    /// Deep copy of this obstacle (and of every child, for composites)
    pub fn clone_owned(&self) -> Self {
        self.clone()
    }

    /// True if the two obstacles overlap, using the default dispatcher
    pub fn collides(&self, other: &Self) -> bool {
        Dispatcher::default().collides_2d(self, other)
    }
}

impl SupportMap<2> for Obstacle2D {
    fn support(&self, direction: &Vec2) -> Vec2 {
        each_2d!(self, o => o.support(direction))
    }
}

impl Obstacle<2> for Obstacle2D {
    fn name(&self) -> &str {
        each_2d!(self, o => o.name())
    }

    fn set_name(&mut self, name: String) {
        each_2d!(self, o => o.set_name(name));
    }

    fn kind(&self) -> ObstacleKind {
        each_2d!(self, o => o.kind())
    }

    fn center(&self) -> Vec2 {
        each_2d!(self, o => o.center())
    }

    fn bounding_box(&self) -> BoundingBox2D {
        each_2d!(self, o => o.bounding_box())
    }

    fn contains_point(&self, point: &Vec2) -> bool {
        each_2d!(self, o => o.contains_point(point))
    }

    fn gradient(&self, point: &Vec2) -> Result<Vec2, GradientError> {
        each_2d!(self, o => o.gradient(point))
    }

    fn update_position(&mut self, new_center: &Vec2) {
        each_2d!(self, o => o.update_position(new_center));
    }

    fn rotate_about(&mut self, origin: &Vec2, rotation: &Rot2) {
        each_2d!(self, o => o.rotate_about(origin, rotation));
    }

    fn bloat(&mut self, amount: Real) {
        each_2d!(self, o => o.bloat(amount));
    }
}

impl fmt::Display for Obstacle2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_2d!(self, o => fmt::Display::fmt(o, f))
    }
}

impl From<RectangularObstacle> for Obstacle2D {
    fn from(o: RectangularObstacle) -> Self {
        Self::Rectangle(o)
    }
}

impl From<CircularObstacle> for Obstacle2D {
    fn from(o: CircularObstacle) -> Self {
        Self::Circle(o)
    }
}

impl From<EllipticalObstacle> for Obstacle2D {
    fn from(o: EllipticalObstacle) -> Self {
        Self::Ellipse(o)
    }
}

impl From<ConvexPolyObstacle> for Obstacle2D {
    fn from(o: ConvexPolyObstacle) -> Self {
        Self::ConvexPoly(o)
    }
}

impl From<HierarchicalObstacle> for Obstacle2D {
    fn from(o: HierarchicalObstacle) -> Self {
        Self::Hierarchy(o)
    }
}
