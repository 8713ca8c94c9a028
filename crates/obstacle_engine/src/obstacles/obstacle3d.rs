//! Closed family of spatial obstacles

use std::fmt;

use crate::foundation::math::{Real, Rot3, Vec3};
use crate::obstacles::{
    BoxObstacle, CylindricalObstacle, EllipsoidObstacle, GradientError, Obstacle, ObstacleKind, SphericalObstacle,
};
use crate::physics::dispatch::Dispatcher;
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox3D;

/// Any spatial obstacle
#[derive(Debug, Clone, PartialEq)]
pub enum Obstacle3D {
    /// Oriented box
    Box(BoxObstacle),
    /// Sphere
    Sphere(SphericalObstacle),
    /// Oriented cylinder
    Cylinder(CylindricalObstacle),
    /// Oriented ellipsoid
    Ellipsoid(EllipsoidObstacle),
}

macro_rules! each_3d {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Obstacle3D::Box($inner) => $body,
            Obstacle3D::Sphere($inner) => $body,
            Obstacle3D::Cylinder($inner) => $body,
            Obstacle3D::Ellipsoid($inner) => $body,
        }
    };
}

impl Obstacle3D {
    /// Independent copy of this obstacle
    pub fn clone_owned(&self) -> Self {
        self.clone()
    }

    /// True if the two obstacles overlap, using the default dispatcher
    pub fn collides(&self, other: &Self) -> bool {
        Dispatcher::default().collides_3d(self, other)
    }
}

impl SupportMap<3> for Obstacle3D {
    fn support(&self, direction: &Vec3) -> Vec3 {
        each_3d!(self, o => o.support(direction))
    }
}

impl Obstacle<3> for Obstacle3D {
    fn name(&self) -> &str {
        each_3d!(self, o => o.name())
    }

    fn set_name(&mut self, name: String) {
        each_3d!(self, o => o.set_name(name));
    }

    fn kind(&self) -> ObstacleKind {
        each_3d!(self, o => o.kind())
    }

    fn center(&self) -> Vec3 {
        each_3d!(self, o => o.center())
    }

    fn bounding_box(&self) -> BoundingBox3D {
        each_3d!(self, o => o.bounding_box())
    }

    fn contains_point(&self, point: &Vec3) -> bool {
        each_3d!(self, o => o.contains_point(point))
    }

    fn gradient(&self, point: &Vec3) -> Result<Vec3, GradientError> {
        each_3d!(self, o => o.gradient(point))
    }

    fn update_position(&mut self, new_center: &Vec3) {
        each_3d!(self, o => o.update_position(new_center));
    }

    fn rotate_about(&mut self, origin: &Vec3, rotation: &Rot3) {
        each_3d!(self, o => o.rotate_about(origin, rotation));
    }

    fn bloat(&mut self, amount: Real) {
        each_3d!(self, o => o.bloat(amount));
    }
}

impl fmt::Display for Obstacle3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        each_3d!(self, o => fmt::Display::fmt(o, f))
    }
}

impl From<BoxObstacle> for Obstacle3D {
    fn from(o: BoxObstacle) -> Self {
        Self::Box(o)
    }
}

impl From<SphericalObstacle> for Obstacle3D {
    fn from(o: SphericalObstacle) -> Self {
        Self::Sphere(o)
    }
}

impl From<CylindricalObstacle> for Obstacle3D {
    fn from(o: CylindricalObstacle) -> Self {
        Self::Cylinder(o)
    }
}

impl From<EllipsoidObstacle> for Obstacle3D {
    fn from(o: EllipsoidObstacle) -> Self {
        Self::Ellipsoid(o)
    }
}
