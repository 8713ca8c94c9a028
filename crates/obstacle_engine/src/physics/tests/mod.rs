//! Cross-cutting collision properties
//!
//! Shape generators shared by the property and cross-check suites. Every
//! suite seeds its own `StdRng` so failures reproduce.


use rand::rngs::StdRng;
use rand::Rng;

use crate::foundation::math::constants::PI;
use crate::foundation::math::{Real, Rot2, Rot3, Vec2, Vec3};
use crate::obstacles::{
    BoxObstacle, CircularObstacle, ConvexPolyObstacle, CylindricalObstacle, EllipsoidObstacle, EllipticalObstacle,
    HierarchicalObstacle, Obstacle2D, Obstacle3D, RectangularObstacle, SphericalObstacle,
};

/// Half-width of the square that random centers are drawn from
pub(super) const ARENA: Real = 6.0;

/// Route `log` output through the test harness (`RUST_LOG=debug` to see it)
pub(super) fn init_logging() {
    let _ = env_logger::Builder::from_default_env().is_test(true).try_init();
}

pub(super) fn random_point(rng: &mut StdRng) -> Vec2 {
    Vec2::new(rng.gen_range(-ARENA..ARENA), rng.gen_range(-ARENA..ARENA))
}

pub(super) fn random_point_3d(rng: &mut StdRng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-ARENA..ARENA),
        rng.gen_range(-ARENA..ARENA),
        rng.gen_range(-ARENA..ARENA),
    )
}

pub(super) fn random_rotation_3d(rng: &mut StdRng) -> Rot3 {
    Rot3::from_euler_angles(
        rng.gen_range(-PI..PI),
        rng.gen_range(-PI..PI),
        rng.gen_range(-PI..PI),
    )
}

pub(super) fn random_rectangle(rng: &mut StdRng) -> RectangularObstacle {
    RectangularObstacle::new(
        random_point(rng),
        Vec2::new(rng.gen_range(0.5..3.0), rng.gen_range(0.5..3.0)),
        rng.gen_range(-PI..PI),
    )
}

pub(super) fn random_circle(rng: &mut StdRng) -> CircularObstacle {
    CircularObstacle::new(random_point(rng), rng.gen_range(0.5..3.0))
}

pub(super) fn random_ellipse(rng: &mut StdRng) -> EllipticalObstacle {
    EllipticalObstacle::new(
        random_point(rng),
        rng.gen_range(1.0..3.5),
        rng.gen_range(0.4..1.0),
        rng.gen_range(-PI..PI),
    )
}

/// Convex polygon with vertices near a circle, angles jittered around an
/// even spacing so no edge gets short enough to invert under a small contraction
pub(super) fn random_polygon(rng: &mut StdRng) -> ConvexPolyObstacle {
    let center = random_point(rng);
    let radius = rng.gen_range(1.0..3.0);
    let sides: u32 = rng.gen_range(3..9);
    let step = 2.0 * PI / Real::from(sides);
    let phase = rng.gen_range(0.0..step);
    let points: Vec<Vec2> = (0..sides)
        .map(|i| {
            let angle = phase + step * Real::from(i) + rng.gen_range(-0.2..0.2) * step;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect();
    ConvexPolyObstacle::from_points(points).unwrap()
}

/// Hull of 3 to 6 uniform points, so slivers and acute corners show up
pub(super) fn random_hull_polygon(rng: &mut StdRng) -> ConvexPolyObstacle {
    let center = random_point(rng);
    loop {
        let count = rng.gen_range(3..=6);
        let points: Vec<Vec2> = (0..count)
            .map(|_| center + Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)))
            .collect();
        if let Ok(poly) = ConvexPolyObstacle::hull(&points) {
            return poly;
        }
    }
}

pub(super) fn random_hierarchy(rng: &mut StdRng) -> HierarchicalObstacle {
    let mut h = HierarchicalObstacle::new(random_point(rng), Rot2::new(rng.gen_range(-PI..PI)));
    h.add(RectangularObstacle::new(
        Vec2::new(rng.gen_range(-1.0..1.0), 0.0),
        Vec2::new(rng.gen_range(0.3..1.5), rng.gen_range(0.3..1.5)),
        rng.gen_range(-PI..PI),
    ));
    h.add(CircularObstacle::new(
        Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
        rng.gen_range(0.3..1.2),
    ));
    h
}

/// One planar obstacle of every kind
pub(super) fn random_planar_set(rng: &mut StdRng) -> Vec<Obstacle2D> {
    vec![
        random_rectangle(rng).into(),
        random_circle(rng).into(),
        random_ellipse(rng).into(),
        random_polygon(rng).into(),
        random_hierarchy(rng).into(),
    ]
}

pub(super) fn random_box(rng: &mut StdRng) -> BoxObstacle {
    BoxObstacle::new(
        random_point_3d(rng),
        Vec3::new(rng.gen_range(0.5..3.0), rng.gen_range(0.5..3.0), rng.gen_range(0.5..3.0)),
        random_rotation_3d(rng),
    )
}

pub(super) fn random_sphere(rng: &mut StdRng) -> SphericalObstacle {
    SphericalObstacle::new(random_point_3d(rng), rng.gen_range(0.5..3.0))
}

/// One spatial obstacle of every kind
pub(super) fn random_spatial_set(rng: &mut StdRng) -> Vec<Obstacle3D> {
    vec![
        random_box(rng).into(),
        random_sphere(rng).into(),
        CylindricalObstacle::new(
            random_point_3d(rng),
            random_rotation_3d(rng),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
        )
        .into(),
        EllipsoidObstacle::new(
            random_point_3d(rng),
            random_rotation_3d(rng),
            Vec3::new(rng.gen_range(0.5..3.0), rng.gen_range(0.5..3.0), rng.gen_range(0.5..3.0)),
        )
        .into(),
    ]
}
