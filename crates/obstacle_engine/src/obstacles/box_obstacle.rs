//! Oriented box obstacle
//!
//! Same layout as [`RectangularObstacle`](super::RectangularObstacle) one
//! dimension up: canonical center, half-extents and orientation, with the
//! eight corners, local-frame bounds and AABB rebuilt by
//! [`BoxObstacle::reset`].

use std::fmt;

use crate::foundation::math::{Mat3, Real, Rot3, Vec3};
use crate::obstacles::{clamp_extent, rotation_from_matrix, GradientError, Obstacle, ObstacleError, ObstacleKind};
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox3D;

/// Tolerance added to `|R|` so near-parallel edge pairs don't produce a
/// false separating axis from a vanishing cross product
const PARALLEL_SLACK: Real = 1e-10;

/// Index of a box corner; "top" is `+z`, "upper" is `+y`, "right" is `+x`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BoxCorner {
    TopUpperRight = 0,
    TopLowerRight = 1,
    TopLowerLeft = 2,
    TopUpperLeft = 3,
    BottomUpperRight = 4,
    BottomLowerRight = 5,
    BottomLowerLeft = 6,
    BottomUpperLeft = 7,
}

impl BoxCorner {
    /// Corner lying farthest along a local-frame direction
    fn toward(dir: &Vec3) -> Self {
        match (dir.x > 0.0, dir.y > 0.0, dir.z > 0.0) {
            (true, true, true) => Self::TopUpperRight,
            (true, true, false) => Self::BottomUpperRight,
            (true, false, true) => Self::TopLowerRight,
            (true, false, false) => Self::BottomLowerRight,
            (false, true, true) => Self::TopUpperLeft,
            (false, true, false) => Self::BottomUpperLeft,
            (false, false, true) => Self::TopLowerLeft,
            (false, false, false) => Self::BottomLowerLeft,
        }
    }
}

/// Box with arbitrary orientation
#[derive(Debug, Clone, PartialEq)]
pub struct BoxObstacle {
    name: String,
    center: Vec3,
    extents: Vec3,
    orientation: Rot3,
    corners: [Vec3; 8],
    local_min: Vec3,
    local_max: Vec3,
    bbox: BoundingBox3D,
}

impl BoxObstacle {
    /// Create a box from its center, half-extents and orientation
    pub fn new(center: Vec3, extents: Vec3, orientation: Rot3) -> Self {
        let mut b = Self {
            name: String::from("box"),
            center,
            extents,
            orientation,
            corners: [Vec3::zeros(); 8],
            local_min: Vec3::zeros(),
            local_max: Vec3::zeros(),
            bbox: BoundingBox3D::empty(),
        };
        b.reset(center, extents, orientation);
        b
    }

    /// Create a box whose orientation is given as a raw matrix
    pub fn from_matrix(center: Vec3, extents: Vec3, orientation: &Mat3) -> Result<Self, ObstacleError> {
        Ok(Self::new(center, extents, rotation_from_matrix(orientation)?))
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the geometry and rebuild every cached value
    pub fn reset(&mut self, center: Vec3, extents: Vec3, orientation: Rot3) {
        let extents = Vec3::new(
            clamp_extent(extents.x, "length", &self.name),
            clamp_extent(extents.y, "width", &self.name),
            clamp_extent(extents.z, "height", &self.name),
        );
        self.center = center;
        self.extents = extents;
        self.orientation = orientation;

        let (ex, ey, ez) = (extents.x, extents.y, extents.z);
        let pairs = [
            (BoxCorner::TopUpperRight, BoxCorner::BottomLowerLeft, Vec3::new(ex, ey, ez)),
            (BoxCorner::TopLowerRight, BoxCorner::BottomUpperLeft, Vec3::new(ex, -ey, ez)),
            (BoxCorner::TopLowerLeft, BoxCorner::BottomUpperRight, Vec3::new(-ex, -ey, ez)),
            (BoxCorner::TopUpperLeft, BoxCorner::BottomLowerRight, Vec3::new(-ex, ey, ez)),
        ];
        for (plus, minus, local) in pairs {
            let off = orientation * local;
            self.corners[plus as usize] = center + off;
            self.corners[minus as usize] = center - off;
        }

        self.bbox = BoundingBox3D::from_points(self.corners.iter());

        let local_center = orientation.inverse() * center;
        self.local_min = local_center - extents;
        self.local_max = local_center + extents;
    }

    /// World-frame position of one corner
    pub fn corner(&self, which: BoxCorner) -> Vec3 {
        self.corners[which as usize]
    }

    /// All eight corners, indexed by [`BoxCorner`]
    pub const fn corners(&self) -> &[Vec3; 8] {
        &self.corners
    }

    /// Half-extents along the local axes
    pub const fn extents(&self) -> Vec3 {
        self.extents
    }

    /// Full size along the local x axis
    pub fn length(&self) -> Real {
        self.extents.x * 2.0
    }

    /// Full size along the local y axis
    pub fn width(&self) -> Real {
        self.extents.y * 2.0
    }

    /// Full size along the local z axis
    pub fn height(&self) -> Real {
        self.extents.z * 2.0
    }

    /// Rotation from the local frame to the world frame
    pub const fn orientation(&self) -> Rot3 {
        self.orientation
    }

    /// Separating axis test over the 15 candidate axes (Ericson, RTCD 4.4.1)
    ///
    /// Boxes touching on a face count as colliding.
    pub fn collides_box(&self, other: &Self) -> bool {
        let a = self.orientation.matrix();
        let b = other.orientation.matrix();
        let ea = &self.extents;
        let eb = &other.extents;

        // other's axes in our frame
        let r = a.transpose() * b;
        let abs_r = r.map(|v| v.abs() + PARALLEL_SLACK);
        let t = a.transpose() * (other.center - self.center);

        // L = A0, A1, A2
        for i in 0..3 {
            let ra = ea[i];
            let rb = eb.dot(&abs_r.row(i).transpose());
            if t[i].abs() > ra + rb {
                return false;
            }
        }

        // L = B0, B1, B2
        for j in 0..3 {
            let ra = ea.dot(&abs_r.column(j));
            let rb = eb[j];
            if t.dot(&r.column(j)).abs() > ra + rb {
                return false;
            }
        }

        // L = Ai x Bj
        for i in 0..3 {
            let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
            for j in 0..3 {
                let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
                let ra = ea[i1] * abs_r[(i2, j)] + ea[i2] * abs_r[(i1, j)];
                let rb = eb[j1] * abs_r[(i, j2)] + eb[j2] * abs_r[(i, j1)];
                let dist = (t[i2] * r[(i1, j)] - t[i1] * r[(i2, j)]).abs();
                if dist > ra + rb {
                    return false;
                }
            }
        }

        true
    }
}

impl SupportMap<3> for BoxObstacle {
    fn support(&self, direction: &Vec3) -> Vec3 {
        self.corner(BoxCorner::toward(&(self.orientation.inverse() * direction)))
    }
}

impl Obstacle<3> for BoxObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Box
    }

    fn center(&self) -> Vec3 {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox3D {
        self.bbox
    }

    fn contains_point(&self, point: &Vec3) -> bool {
        let p = self.orientation.inverse() * point;
        (0..3).all(|i| self.local_min[i] < p[i] && p[i] < self.local_max[i])
    }

    /// Outside points get the vector to the clamped point on the box; inside
    /// points leave through the nearest face
    fn gradient(&self, point: &Vec3) -> Result<Vec3, GradientError> {
        let d = self.orientation.inverse() * (point - self.center);
        let e = self.extents;

        let inside = (0..3).all(|i| d[i].abs() < e[i]);
        let local = if inside {
            let (axis, depth) = (0..3)
                .map(|i| (i, e[i] - d[i].abs()))
                .fold((0, Real::INFINITY), |best, c| if c.1 < best.1 { c } else { best });
            let mut step = Vec3::zeros();
            step[axis] = if d[axis] < 0.0 { -depth } else { depth };
            step
        } else {
            d.zip_map(&e, |v, ext| v.clamp(-ext, ext)) - d
        };
        Ok(self.orientation * local)
    }

    fn update_position(&mut self, new_center: &Vec3) {
        self.reset(*new_center, self.extents, self.orientation);
    }

    fn rotate_about(&mut self, origin: &Vec3, rotation: &Rot3) {
        let center = rotation * (self.center - origin) + origin;
        self.reset(center, self.extents, rotation * self.orientation);
    }

    fn bloat(&mut self, amount: Real) {
        self.reset(self.center, self.extents.add_scalar(amount), self.orientation);
    }
}

impl fmt::Display for BoxObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (roll, pitch, yaw) = self.orientation.euler_angles();
        write!(
            f,
            "BoxObstacle[{},center=({}, {}, {}),extents=({}, {}, {}),rpy=({}, {}, {})]",
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
