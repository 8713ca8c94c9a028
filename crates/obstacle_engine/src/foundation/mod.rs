//! Foundation utilities shared by every obstacle shape
//!
//! - [`math`] - scalar/vector/rotation aliases and small numeric helpers
//! - [`polynomial`] - closed-form real roots for low-degree polynomials

pub mod math;
pub mod polynomial;
