//! Plain obstacle records and the factory that builds live obstacles from them
//!
//! A record is what perception produces and what gets written to disk: the
//! geometry only, tagged by `type`, with no cached state. Building an
//! obstacle from a record is a single match over the closed set of kinds.
//!
//! Rectangle and box records carry full dimensions, not half-extents. 3D
//! orientations are column-major 3×3 rotation matrices.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat3, Real, Rot2, Vec2, Vec3};
use crate::obstacles::{
    BoxObstacle, CircularObstacle, ConvexPolyObstacle, CylindricalObstacle, EllipsoidObstacle, EllipticalObstacle,
    HierarchicalObstacle, Obstacle, Obstacle2D, Obstacle3D, ObstacleError, RectangularObstacle, SphericalObstacle,
};

/// Errors raised while turning a record into an obstacle
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A planar record was asked for a spatial obstacle or vice versa
    #[error("{kind} record cannot build a {expected}D obstacle")]
    WrongDimension {
        /// `type` of the offending record
        kind: &'static str,
        /// Dimension that was requested
        expected: usize,
    },

    /// The geometry itself is invalid
    #[error(transparent)]
    Obstacle(#[from] ObstacleError),
}

/// Serialized form of one obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObstacleRecord {
    /// Oriented rectangle
    #[serde(rename_all = "PascalCase")]
    Rectangle {
        /// Center point
        center: [Real; 2],
        /// Full width and height
        dimensions: [Real; 2],
        /// Rotation angle in radians
        orientation: Real,
    },
    /// Circle
    #[serde(rename_all = "PascalCase")]
    Circle {
        /// Center point
        center: [Real; 2],
        /// Radius
        radius: Real,
    },
    /// Oriented ellipse
    #[serde(rename_all = "PascalCase")]
    Ellipse {
        /// Center point
        center: [Real; 2],
        /// Angle of the semimajor axis in radians
        orientation: Real,
        /// Semimajor axis length
        semimajor: Real,
        /// Semiminor axis length
        semiminor: Real,
    },
    /// Convex polygon
    #[serde(rename_all = "PascalCase")]
    ConvexPoly {
        /// Vertices in order
        points: Vec<[Real; 2]>,
    },
    /// Composite of planar records
    #[serde(rename_all = "PascalCase")]
    Hierarchy {
        /// Origin of the children's frame
        center: [Real; 2],
        /// Rotation of the children's frame in radians
        orientation: Real,
        /// Children, in their local frame
        components: Vec<ObstacleRecord>,
    },
    /// Oriented box
    #[serde(rename_all = "PascalCase")]
    Box {
        /// Center point
        center: [Real; 3],
        /// Full length, width and height
        dimensions: [Real; 3],
        /// Column-major rotation matrix
        orientation: [Real; 9],
    },
    /// Sphere
    #[serde(rename_all = "PascalCase")]
    Sphere {
        /// Center point
        center: [Real; 3],
        /// Radius
        radius: Real,
    },
    /// Capped cylinder
    #[serde(rename_all = "PascalCase")]
    Cylinder {
        /// Center point
        center: [Real; 3],
        /// Column-major rotation matrix, the local z axis is the cylinder axis
        orientation: [Real; 9],
        /// Radius
        radius: Real,
        /// Half the length along the axis
        half_height: Real,
    },
    /// Oriented ellipsoid
    #[serde(rename_all = "PascalCase")]
    Ellipsoid {
        /// Center point
        center: [Real; 3],
        /// Column-major rotation matrix
        orientation: [Real; 9],
        /// Semi-axis lengths along the local axes
        extents: [Real; 3],
    },
}

fn checked(value: Real, what: &'static str) -> Result<Real, ObstacleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        log::warn!("record has invalid {what}: {value}");
        Err(ObstacleError::NonPositiveExtent(what))
    }
}

fn checked_vec<const N: usize>(values: [Real; N], what: &'static str) -> Result<[Real; N], ObstacleError> {
    for v in values {
        checked(v, what)?;
    }
    Ok(values)
}

fn matrix(columns: &[Real; 9]) -> Mat3 {
    Mat3::from_column_slice(columns)
}

fn columns(m: &Mat3) -> [Real; 9] {
    let mut out = [0.0; 9];
    out.copy_from_slice(m.as_slice());
    out
}

impl ObstacleRecord {
    /// Value of the `type` tag
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "Rectangle",
            Self::Circle { .. } => "Circle",
            Self::Ellipse { .. } => "Ellipse",
            Self::ConvexPoly { .. } => "ConvexPoly",
            Self::Hierarchy { .. } => "Hierarchy",
            Self::Box { .. } => "Box",
            Self::Sphere { .. } => "Sphere",
            Self::Cylinder { .. } => "Cylinder",
            Self::Ellipsoid { .. } => "Ellipsoid",
        }
    }

    /// Build the planar obstacle this record describes
    pub fn into_planar(self) -> Result<Obstacle2D, RecordError> {
        let obstacle = match self {
            Self::Rectangle {
                center,
                dimensions,
                orientation,
            } => {
                let [w, h] = checked_vec(dimensions, "Dimensions")?;
                RectangularObstacle::new(Vec2::from(center), Vec2::new(w, h) / 2.0, orientation).into()
            }
            Self::Circle { center, radius } => {
                CircularObstacle::new(Vec2::from(center), checked(radius, "Radius")?).into()
            }
            Self::Ellipse {
                center,
                orientation,
                semimajor,
                semiminor,
            } => EllipticalObstacle::new(
                Vec2::from(center),
                checked(semimajor, "Semimajor")?,
                checked(semiminor, "Semiminor")?,
                orientation,
            )
            .into(),
            Self::ConvexPoly { points } => {
                ConvexPolyObstacle::from_points(points.into_iter().map(Vec2::from))?.into()
            }
            Self::Hierarchy {
                center,
                orientation,
                components,
            } => {
                let mut hierarchy = HierarchicalObstacle::new(Vec2::from(center), Rot2::new(orientation));
                for component in components {
                    hierarchy.add(component.into_planar()?);
                }
                hierarchy.into()
            }
            spatial => {
                return Err(RecordError::WrongDimension {
                    kind: spatial.type_name(),
                    expected: 2,
                })
            }
        };
        Ok(obstacle)
    }

    /// Build the spatial obstacle this record describes
    pub fn into_spatial(self) -> Result<Obstacle3D, RecordError> {
        let obstacle = match self {
            Self::Box {
                center,
                dimensions,
                orientation,
            } => {
                let extents = Vec3::from(checked_vec(dimensions, "Dimensions")?) / 2.0;
                BoxObstacle::from_matrix(Vec3::from(center), extents, &matrix(&orientation))?.into()
            }
            Self::Sphere { center, radius } => {
                SphericalObstacle::new(Vec3::from(center), checked(radius, "Radius")?).into()
            }
            Self::Cylinder {
                center,
                orientation,
                radius,
                half_height,
            } => CylindricalObstacle::from_matrix(
                Vec3::from(center),
                &matrix(&orientation),
                checked(radius, "Radius")?,
                checked(half_height, "HalfHeight")?,
            )?
            .into(),
            Self::Ellipsoid {
                center,
                orientation,
                extents,
            } => EllipsoidObstacle::from_matrix(
                Vec3::from(center),
                &matrix(&orientation),
                Vec3::from(checked_vec(extents, "Extents")?),
            )?
            .into(),
            planar => {
                return Err(RecordError::WrongDimension {
                    kind: planar.type_name(),
                    expected: 3,
                })
            }
        };
        Ok(obstacle)
    }

    /// Record describing a live planar obstacle
    pub fn from_planar(obstacle: &Obstacle2D) -> Self {
        match obstacle {
            Obstacle2D::Rectangle(r) => Self::Rectangle {
                center: r.center().into(),
                dimensions: [r.width(), r.height()],
                orientation: r.orientation_angle(),
            },
            Obstacle2D::Circle(c) => Self::Circle {
                center: c.center().into(),
                radius: c.radius(),
            },
            Obstacle2D::Ellipse(e) => Self::Ellipse {
                center: e.center().into(),
                orientation: e.angle(),
                semimajor: e.semimajor(),
                semiminor: e.semiminor(),
            },
            Obstacle2D::ConvexPoly(p) => Self::ConvexPoly {
                points: p.points().iter().map(|&v| v.into()).collect(),
            },
            Obstacle2D::Hierarchy(h) => Self::Hierarchy {
                center: h.center().into(),
                orientation: h.orientation().angle(),
                components: h.components().iter().map(Self::from_planar).collect(),
            },
        }
    }

    /// Record describing a live spatial obstacle
    pub fn from_spatial(obstacle: &Obstacle3D) -> Self {
        match obstacle {
            Obstacle3D::Box(b) => Self::Box {
                center: b.center().into(),
                dimensions: [b.length(), b.width(), b.height()],
                orientation: columns(b.orientation().matrix()),
            },
            Obstacle3D::Sphere(s) => Self::Sphere {
                center: s.center().into(),
                radius: s.radius(),
            },
            Obstacle3D::Cylinder(c) => Self::Cylinder {
                center: c.center().into(),
                orientation: columns(c.orientation().matrix()),
                radius: c.radius(),
                half_height: c.half_height(),
            },
            Obstacle3D::Ellipsoid(e) => Self::Ellipsoid {
                center: e.center().into(),
                orientation: columns(e.orientation().matrix()),
                extents: e.extents().into(),
            },
        }
    }
}

impl From<&Obstacle2D> for ObstacleRecord {
    fn from(obstacle: &Obstacle2D) -> Self {
        Self::from_planar(obstacle)
    }
}

impl From<&Obstacle3D> for ObstacleRecord {
    fn from(obstacle: &Obstacle3D) -> Self {
        Self::from_spatial(obstacle)
    }
}
