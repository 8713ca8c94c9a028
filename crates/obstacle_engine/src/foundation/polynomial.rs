//! Closed-form real roots of low-degree polynomials
//!
//! All solvers take monic coefficients (leading coefficient 1) ordered from
//! the next-highest power down to the constant term, and return only the
//! real roots. Repeated roots may be reported more than once.

use super::math::Real;

/// Relative slack allowed on a discriminant before it is treated as negative.
/// Double roots routinely land a few ulps below zero.
const DISCRIMINANT_SLACK: Real = 1e-10;

const NEWTON_STEPS: usize = 3;

/// Real roots of `x^2 + b x + c`
pub fn solve_quadratic(b: Real, c: Real) -> Vec<Real> {
    let disc = b * b - 4.0 * c;
    let scale = (b * b).max(c.abs()).max(1.0);
    if disc < -DISCRIMINANT_SLACK * scale {
        return Vec::new();
    }
    if disc <= 0.0 {
        return vec![-b / 2.0];
    }
    // avoid cancellation between -b and sqrt(disc)
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        return vec![0.0, 0.0];
    }
    vec![q, c / q]
}

/// Real roots of `x^3 + b x^2 + c x + d` (Cardano / trigonometric form)
pub fn solve_cubic(b: Real, c: Real, d: Real) -> Vec<Real> {
    let shift = b / 3.0;
    // depressed cubic t^3 + p t + q
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let disc = half_q * half_q + third_p * third_p * third_p;

    let roots: Vec<Real> = if p.abs() < 1e-14 {
        vec![(-q).cbrt()]
    } else if disc > 0.0 {
        let s = disc.sqrt();
        vec![(-half_q + s).cbrt() + (-half_q - s).cbrt()]
    } else {
        // three real roots
        let r = (-third_p).sqrt();
        let cos_arg = (-half_q / (r * r * r)).clamp(-1.0, 1.0);
        let phi = cos_arg.acos() / 3.0;
        let tau = 2.0 * std::f64::consts::PI / 3.0;
        (0..3)
            .map(|k| 2.0 * r * (phi - tau * Real::from(k)).cos())
            .collect()
    };

    roots.into_iter().map(|t| t - shift).collect()
}

/// Real roots of `x^4 + a x^3 + b x^2 + c x + d` (Ferrari's method)
pub fn solve_quartic(a: Real, b: Real, c: Real, d: Real) -> Vec<Real> {
    let shift = a / 4.0;
    let a2 = a * a;
    // depressed quartic y^4 + p y^2 + q y + r
    let p = b - 3.0 * a2 / 8.0;
    let q = c - a * b / 2.0 + a2 * a / 8.0;
    let r = d - a * c / 4.0 + a2 * b / 16.0 - 3.0 * a2 * a2 / 256.0;

    let mut roots = Vec::with_capacity(4);
    if q.abs() < 1e-12 {
        // biquadratic: z = y^2
        for z in solve_quadratic(p, r) {
            if z > 0.0 {
                let y = z.sqrt();
                roots.push(y);
                roots.push(-y);
            } else if z > -1e-12 {
                roots.push(0.0);
            }
        }
    } else {
        // resolvent cubic m^3 + p m^2 + (p^2/4 - r) m - q^2/8, need m > 0
        let m = solve_cubic(p, p * p / 4.0 - r, -q * q / 8.0)
            .into_iter()
            .fold(Real::NEG_INFINITY, Real::max);
        if m <= 0.0 || !m.is_finite() {
            log::debug!("solve_quartic: resolvent cubic has no positive root (m = {})", m);
            return Vec::new();
        }
        let s = (2.0 * m).sqrt();
        let half_p_m = p / 2.0 + m;
        let q_term = q / (2.0 * s);
        roots.extend(solve_quadratic(-s, half_p_m + q_term));
        roots.extend(solve_quadratic(s, half_p_m - q_term));
    }

    roots
        .into_iter()
        .map(|y| polish(y - shift, [a, b, c, d]))
        .filter(|x| x.is_finite())
        .collect()
}

/// A few Newton steps on the monic quartic to clean up cancellation error
fn polish(mut x: Real, [a, b, c, d]: [Real; 4]) -> Real {
    for _ in 0..NEWTON_STEPS {
        let f = (((x + a) * x + b) * x + c) * x + d;
        let df = ((4.0 * x + 3.0 * a) * x + 2.0 * b) * x + c;
        if df.abs() < 1e-14 {
            break;
        }
        let next = x - f / df;
        if !next.is_finite() {
            break;
        }
        x = next;
    }
    x
}
