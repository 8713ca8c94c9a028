//! Pairwise collision dispatch
//!
//! [`strategy_2d`] and [`strategy_3d`] are the registration tables: each
//! shape pair with a closed-form test is listed once, in the operand order
//! its implementation expects. Every other pair falls through to GJK, so a
//! new shape only has to register the pairs it can do faster.

use crate::obstacles::{Obstacle, Obstacle2D, Obstacle3D, ObstacleKind};
use crate::physics::gjk::Gjk;

/// How a pair of obstacle kinds is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStrategy {
    /// A closed-form test exists; `swapped` means it is owned by the second operand
    Analytic {
        /// Operands must be exchanged before calling the test
        swapped: bool,
    },
    /// One operand is a composite that delegates to its children
    Composite {
        /// The composite is the second operand
        swapped: bool,
    },
    /// No registered test, use the GJK fallback
    Gjk,
}

/// Registration table for planar pairs
pub const fn strategy_2d(a: ObstacleKind, b: ObstacleKind) -> PairStrategy {
    use ObstacleKind::{Circle, ConvexPoly, Hierarchy, Rectangle};

    match (a, b) {
        (Hierarchy, _) => PairStrategy::Composite { swapped: false },
        (_, Hierarchy) => PairStrategy::Composite { swapped: true },

        (Rectangle, Rectangle | Circle)
        | (Circle, Circle)
        | (ConvexPoly, Rectangle | Circle | ConvexPoly) => PairStrategy::Analytic { swapped: false },

        (Circle, Rectangle) | (Rectangle | Circle, ConvexPoly) => PairStrategy::Analytic { swapped: true },

        _ => PairStrategy::Gjk,
    }
}

/// Registration table for spatial pairs
pub const fn strategy_3d(a: ObstacleKind, b: ObstacleKind) -> PairStrategy {
    use ObstacleKind::{Box, Sphere};

    match (a, b) {
        (Box, Box) | (Sphere, Sphere) => PairStrategy::Analytic { swapped: false },
        _ => PairStrategy::Gjk,
    }
}

/// Resolves obstacle–obstacle collision queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatcher {
    /// Fallback used for unregistered pairs
    pub gjk: Gjk,
}

impl Dispatcher {
    /// Dispatcher using a specific GJK configuration
    pub const fn new(gjk: Gjk) -> Self {
        Self { gjk }
    }

    /// True if two planar obstacles overlap
    pub fn collides_2d(&self, a: &Obstacle2D, b: &Obstacle2D) -> bool {
        if !a.bounding_box().intersects(&b.bounding_box()) {
            return false;
        }

        match strategy_2d(a.kind(), b.kind()) {
            PairStrategy::Composite { swapped } => {
                let (outer, other) = if swapped { (b, a) } else { (a, b) };
                match outer {
                    Obstacle2D::Hierarchy(h) => h.collides_with(other, self),
                    _ => self.gjk.collides(a, b),
                }
            }
            PairStrategy::Analytic { swapped } => {
                let (owner, other) = if swapped { (b, a) } else { (a, b) };
                analytic_2d(owner, other).unwrap_or_else(|| {
                    log::warn!("no analytic test for {} vs {}, using GJK", owner.kind(), other.kind());
                    self.gjk.collides(a, b)
                })
            }
            PairStrategy::Gjk => self.gjk.collides(a, b),
        }
    }

    /// True if two spatial obstacles overlap
    pub fn collides_3d(&self, a: &Obstacle3D, b: &Obstacle3D) -> bool {
        if !a.bounding_box().intersects(&b.bounding_box()) {
            return false;
        }

        match strategy_3d(a.kind(), b.kind()) {
            PairStrategy::Analytic { swapped } => {
                let (owner, other) = if swapped { (b, a) } else { (a, b) };
                analytic_3d(owner, other).unwrap_or_else(|| {
                    log::warn!("no analytic test for {} vs {}, using GJK", owner.kind(), other.kind());
                    self.gjk.collides(a, b)
                })
            }
            PairStrategy::Composite { .. } | PairStrategy::Gjk => self.gjk.collides(a, b),
        }
    }
}

/// Run the closed-form test owned by `owner`, if one is implemented
fn analytic_2d(owner: &Obstacle2D, other: &Obstacle2D) -> Option<bool> {
    use Obstacle2D::{Circle, ConvexPoly, Rectangle};

    let hit = match (owner, other) {
        (Rectangle(r), Rectangle(o)) => r.collides_rectangle(o),
        (Rectangle(r), Circle(c)) => r.collides_circle(c),
        (Circle(c), Circle(o)) => c.collides_circle(o),
        (ConvexPoly(p), Rectangle(r)) => p.collides_rectangle(r),
        (ConvexPoly(p), Circle(c)) => p.collides_circle(c),
        (ConvexPoly(p), ConvexPoly(o)) => p.collides_poly(o),
        _ => return None,
    };
    Some(hit)
}

fn analytic_3d(owner: &Obstacle3D, other: &Obstacle3D) -> Option<bool> {
    use Obstacle3D::{Box, Sphere};

    let hit = match (owner, other) {
        (Box(b), Box(o)) => b.collides_box(o),
        (Sphere(s), Sphere(o)) => s.collides_sphere(o),
        _ => return None,
    };
    Some(hit)
}
