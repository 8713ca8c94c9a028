//! Gilbert–Johnson–Keerthi intersection test
//!
//! Works on any pair of convex shapes exposing a support mapping. The
//! Minkowski difference `A - B` is never built explicitly: a simplex of
//! support points is evolved toward the origin until it either encloses it
//! (intersection) or a support point fails to pass it (separation).

use crate::foundation::math::{Real, Vec3, VectorN, EPSILON};
use crate::foundation::math::utils::first_axis;

/// Default cap on simplex refinements
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Shapes representable by a support mapping function
pub trait SupportMap<const D: usize> {
    /// Point of the shape farthest along `direction`
    ///
    /// `direction` does not need to be normalized. Ties are broken
    /// deterministically.
    fn support(&self, direction: &VectorN<D>) -> VectorN<D>;
}

impl<const D: usize, T: SupportMap<D> + ?Sized> SupportMap<D> for &T {
    fn support(&self, direction: &VectorN<D>) -> VectorN<D> {
        (**self).support(direction)
    }
}

/// Outcome of a single GJK run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GjkResult {
    /// A support point failed to pass the origin: the shapes are disjoint
    Separated,
    /// The simplex enclosed the origin: the shapes overlap
    Intersecting,
    /// The iteration cap ran out before either proof was found
    Exhausted,
}

/// GJK collision test with a bounded iteration count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gjk {
    /// Maximum number of support points added after the first
    pub max_iterations: usize,
    /// Emit a debug log line whenever the cap is hit
    pub log_exhaustion: bool,
}

impl Default for Gjk {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            log_exhaustion: true,
        }
    }
}

impl Gjk {
    /// Create a GJK tester with a custom iteration cap
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// True if the shapes overlap
    ///
    /// Running out of iterations is reported as a collision. This is a
    /// conservative heuristic, not a proof.
    pub fn collides<const D: usize, A, B>(&self, a: &A, b: &B) -> bool
    where
        A: SupportMap<D> + ?Sized,
        B: SupportMap<D> + ?Sized,
    {
        match self.query(a, b) {
            GjkResult::Separated => false,
            GjkResult::Intersecting => true,
            GjkResult::Exhausted => {
                if self.log_exhaustion {
                    log::debug!(
                        "GJK: no result after {} iterations, assuming collision",
                        self.max_iterations
                    );
                }
                true
            }
        }
    }

    /// Run GJK and report how it terminated
    pub fn query<const D: usize, A, B>(&self, a: &A, b: &B) -> GjkResult
    where
        A: SupportMap<D> + ?Sized,
        B: SupportMap<D> + ?Sized,
    {
        let mut direction = first_axis::<D>();

        // 2D needs at most a triangle, 3D a tetrahedron
        let mut simplex: Vec<VectorN<D>> = Vec::with_capacity(D + 1);
        simplex.push(minkowski_support(a, b, &direction));
        direction = -simplex[0];

        for _ in 0..self.max_iterations {
            if direction.norm_squared() < EPSILON * EPSILON {
                // origin sits on the current simplex
                return GjkResult::Intersecting;
            }

            let point = minkowski_support(a, b, &direction);
            if point.dot(&direction) < 0.0 {
                return GjkResult::Separated;
            }
            simplex.push(point);

            if process_simplex(&mut simplex, &mut direction) {
                return GjkResult::Intersecting;
            }
        }

        GjkResult::Exhausted
    }
}

/// Support point of the Minkowski difference `A - B`
pub fn minkowski_support<const D: usize, A, B>(a: &A, b: &B, direction: &VectorN<D>) -> VectorN<D>
where
    A: SupportMap<D> + ?Sized,
    B: SupportMap<D> + ?Sized,
{
    a.support(direction) - b.support(&-direction)
}

/// Returns `(a × b) × c = b (a · c) - a (b · c)`
///
/// Only commutative when `a == c`; `a × (b × c)` is `triple_product(b, c, -a)`.
pub fn triple_product<const D: usize>(a: &VectorN<D>, b: &VectorN<D>, c: &VectorN<D>) -> VectorN<D> {
    b * a.dot(c) - a * b.dot(c)
}

/// Cross product for the 3D simplex cases; never called when `D == 2`
fn cross<const D: usize>(a: &VectorN<D>, b: &VectorN<D>) -> VectorN<D> {
    let n = Vec3::new(a[0], a[1], a[2]).cross(&Vec3::new(b[0], b[1], b[2]));
    VectorN::<D>::from_fn(|i, _| n[i])
}

/// Reduce the simplex and choose the next search direction.
/// Returns true once the origin is enclosed.
fn process_simplex<const D: usize>(simplex: &mut Vec<VectorN<D>>, direction: &mut VectorN<D>) -> bool {
    match simplex.len() {
        2 => process_line(simplex, direction),
        3 => process_triangle(simplex, direction),
        4 if D == 3 => process_tetrahedron(simplex, direction),
        n => {
            log::warn!("GJK: unexpected simplex size {} in {}D", n, D);
            false
        }
    }
}

/// Segment case. The newest point is last.
fn process_line<const D: usize>(simplex: &mut Vec<VectorN<D>>, direction: &mut VectorN<D>) -> bool {
    let a = simplex[1];
    let b = simplex[0];
    let ab = b - a;
    let ao = -a;

    if ab.dot(&ao) > 0.0 {
        *direction = triple_product(&ab, &ao, &ab);
    } else {
        simplex.remove(0);
        *direction = ao;
    }
    false
}

/// Triangle case; terminal in 2D
fn process_triangle<const D: usize>(simplex: &mut Vec<VectorN<D>>, direction: &mut VectorN<D>) -> bool {
    let a = simplex[2];
    let b = simplex[1];
    let c = simplex[0];
    let ab = b - a;
    let ac = c - a;
    let ao = -a;

    // perpendicular to ab, away from c
    let ab_perp = triple_product(&ab, &ac, &-ab);
    // perpendicular to ac, away from b
    let ac_perp = triple_product(&ab, &ac, &ac);

    if ac_perp.dot(&ao) > 0.0 {
        if ac.dot(&ao) > 0.0 {
            // keep [c, a]
            simplex.remove(1);
            *direction = triple_product(&ac, &ao, &ac);
            false
        } else {
            // keep [b, a]
            simplex.remove(0);
            process_line(simplex, direction)
        }
    } else if ab_perp.dot(&ao) > 0.0 {
        simplex.remove(0);
        process_line(simplex, direction)
    } else if D == 2 {
        true
    } else {
        // above or below the triangle
        let abc = cross(&ab, &ac);
        if abc.dot(&ao) > 0.0 {
            *direction = abc;
        } else {
            // flip winding so the face normal keeps pointing at the origin
            simplex.swap(0, 1);
            *direction = -abc;
        }
        false
    }
}

/// Tetrahedron case (3D only)
fn process_tetrahedron<const D: usize>(simplex: &mut Vec<VectorN<D>>, direction: &mut VectorN<D>) -> bool {
    let a = simplex[3];
    let b = simplex[2];
    let c = simplex[1];
    let d = simplex[0];

    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let ao = -a;

    let abc = cross(&ab, &ac);
    let acd = cross(&ac, &ad);
    let adb = cross(&ad, &ab);

    if abc.dot(&ao) > 0.0 {
        // [c, b, a]
        simplex.remove(0);
        process_triangle(simplex, direction)
    } else if acd.dot(&ao) > 0.0 {
        // [d, c, a]
        simplex.remove(2);
        process_triangle(simplex, direction)
    } else if adb.dot(&ao) > 0.0 {
        // [b, d, a]
        *simplex = vec![b, d, a];
        process_triangle(simplex, direction)
    } else {
        true
    }
}

/// Convenience wrapper using the default iteration cap
pub fn collides<const D: usize, A, B>(a: &A, b: &B) -> bool
where
    A: SupportMap<D> + ?Sized,
    B: SupportMap<D> + ?Sized,
{
    Gjk::default().collides(a, b)
}

/// Extent of `shape` along `axis`, as `(min, max)` projections
pub fn project<const D: usize, S>(shape: &S, axis: &VectorN<D>) -> (Real, Real)
where
    S: SupportMap<D> + ?Sized,
{
    let max = shape.support(axis).dot(axis);
    let min = shape.support(&-axis).dot(axis);
    (min, max)
}
