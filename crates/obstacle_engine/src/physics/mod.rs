//! Collision resolution between obstacles
//!
//! # Module Organization
//!
//! - [`gjk`] - support-mapping intersection test usable by any convex pair
//! - [`dispatch`] - pair registration table choosing analytic tests or GJK

pub mod dispatch;
pub mod gjk;

#[cfg(test)]
mod tests;

pub use dispatch::{strategy_2d, strategy_3d, Dispatcher, PairStrategy};
pub use gjk::{Gjk, GjkResult, SupportMap};
