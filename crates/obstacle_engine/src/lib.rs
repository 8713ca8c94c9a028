//! # Obstacle Engine
//!
//! Convex obstacle geometry for mobile-robot motion planning.
//!
//! ## Features
//!
//! - **Shapes**: rectangles, circles, ellipses, convex polygons and composite
//!   hierarchies in 2D; boxes, spheres, cylinders and ellipsoids in 3D
//! - **Collision**: analytic tests for the common pairs, GJK for the rest,
//!   both behind one dispatch table
//! - **Proximity**: per-shape gradients toward the nearest boundary point
//! - **Records**: serde records for persisting or receiving obstacles
//!
//! ## Quick Start
//!
//! ```rust
//! use obstacle_engine::prelude::*;
//!
//! let wall: Obstacle2D = RectangularObstacle::new(Vec2::zeros(), Vec2::new(5.0, 5.0), 0.0).into();
//! let robot: Obstacle2D = CircularObstacle::new(Vec2::new(8.0, 0.0), 4.0).into();
//! assert!(wall.collides(&robot));
//!
//! let escape = robot.gradient(&Vec2::new(20.0, 0.0)).unwrap();
//! assert!((escape - Vec2::new(-8.0, 0.0)).norm() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod obstacles;
pub mod physics;
pub mod records;
pub mod spatial;

/// Common imports for planner code
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        foundation::math::{Real, Rot2, Rot3, Vec2, Vec3},
        obstacles::{
            BoxObstacle, CircularObstacle, ConvexPolyObstacle, CylindricalObstacle, EllipsoidObstacle,
            EllipticalObstacle, GradientError, HierarchicalObstacle, Obstacle, Obstacle2D, Obstacle3D, ObstacleError,
            ObstacleKind, RectangularObstacle, SphericalObstacle,
        },
        physics::{Dispatcher, Gjk, SupportMap},
        records::{ObstacleRecord, RecordError},
        spatial::{BoundingBox2D, BoundingBox3D},
    };
}
