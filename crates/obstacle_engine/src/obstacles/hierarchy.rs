//! Composite obstacle built from planar children sharing one rigid transform
//!
//! Children are stored in the composite's local frame. Queries are mapped
//! into that frame once (the query point, or a transformed clone of the
//! other obstacle) instead of moving every child.

use std::fmt;
use std::fmt::Write as _;

use crate::foundation::math::utils::rotate_about;
use crate::foundation::math::{Real, Rot2, Vec2};
use crate::obstacles::{GradientError, Obstacle, Obstacle2D, ObstacleKind};
use crate::physics::dispatch::Dispatcher;
use crate::physics::gjk::SupportMap;
use crate::spatial::BoundingBox2D;

/// Planar composite obstacle
///
/// Owns its children exclusively; cloning deep-copies the subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalObstacle {
    name: String,
    components: Vec<Obstacle2D>,
    center: Vec2,
    rotation: Rot2,
    // union of the children's boxes after mapping them into the world frame
    bbox: BoundingBox2D,
}

impl HierarchicalObstacle {
    /// Create an empty composite placed at `center` with `rotation`
    pub fn new(center: Vec2, rotation: Rot2) -> Self {
        Self {
            name: String::from("hierarchy"),
            components: Vec::new(),
            center,
            rotation,
            bbox: BoundingBox2D::empty(),
        }
    }

    /// Set the debug name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a child given in the composite's local frame
    pub fn add(&mut self, component: impl Into<Obstacle2D>) {
        let component = component.into();
        let world = self.world_bounding_box(&component);
        self.bbox.expand(&world);
        self.components.push(component);
    }

    /// Builder form of [`Self::add`]
    #[must_use]
    pub fn with_component(mut self, component: impl Into<Obstacle2D>) -> Self {
        self.add(component);
        self
    }

    /// Remove every child
    pub fn clear(&mut self) {
        self.components.clear();
        self.bbox = BoundingBox2D::empty();
    }

    /// Children, in the local frame
    pub fn components(&self) -> &[Obstacle2D] {
        &self.components
    }

    /// Children of one shape kind
    pub fn components_of(&self, kind: ObstacleKind) -> impl Iterator<Item = &Obstacle2D> {
        self.components.iter().filter(move |c| c.kind() == kind)
    }

    /// Rotation from the local frame to the world frame
    pub const fn orientation(&self) -> Rot2 {
        self.rotation
    }

    /// Replace the composite rotation, keeping the center in place
    pub fn update_rotation(&mut self, rotation: Rot2) {
        self.rotation = rotation;
        self.recalculate_bounding_box();
    }

    /// Multi-line description of the whole subtree
    pub fn describe_components(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, 0);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize) {
        let _ = writeln!(out, "{:indent$}{}", "", self, indent = depth * 2);
        for c in &self.components {
            match c {
                Obstacle2D::Hierarchy(h) => h.describe_into(out, depth + 1),
                other => {
                    let _ = writeln!(out, "{:indent$}{}", "", other, indent = (depth + 1) * 2);
                }
            }
        }
    }

    fn to_local(&self, point: &Vec2) -> Vec2 {
        self.rotation.inverse() * (point - self.center)
    }

    /// World-frame box of a child without touching the stored child
    fn world_bounding_box(&self, component: &Obstacle2D) -> BoundingBox2D {
        let mut moved = component.clone();
        moved.rotate_about(&Vec2::zeros(), &self.rotation);
        let c = moved.center();
        moved.update_position(&(c + self.center));
        moved.bounding_box()
    }

    fn recalculate_bounding_box(&mut self) {
        let mut bbox = BoundingBox2D::empty();
        for c in &self.components {
            bbox.expand(&self.world_bounding_box(c));
        }
        self.bbox = bbox;
    }

    /// Collision test against any other obstacle
    ///
    /// The other obstacle is cloned and mapped into the local frame, then
    /// tested against each child with `dispatcher`.
    pub fn collides_with(&self, other: &Obstacle2D, dispatcher: &Dispatcher) -> bool {
        let mut local = other.clone_owned();
        let c = local.center();
        local.update_position(&(c - self.center));
        local.rotate_about(&Vec2::zeros(), &self.rotation.inverse());

        self.components.iter().any(|child| dispatcher.collides_2d(child, &local))
    }
}

impl SupportMap<2> for HierarchicalObstacle {
    /// Support of the convex hull of the children
    ///
    /// An empty composite has no support and returns its center, which its
    /// empty bounding box does not contain. The dispatcher never asks: an
    /// empty box fails the broad phase against everything.
    fn support(&self, direction: &Vec2) -> Vec2 {
        let local_dir = self.rotation.inverse() * direction;
        self.components
            .iter()
            .map(|c| c.support(&local_dir))
            .max_by(|a, b| a.dot(&local_dir).total_cmp(&b.dot(&local_dir)))
            .map_or(self.center, |p| self.rotation * p + self.center)
    }
}

impl Obstacle<2> for HierarchicalObstacle {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn kind(&self) -> ObstacleKind {
        ObstacleKind::Hierarchy
    }

    fn center(&self) -> Vec2 {
        self.center
    }

    fn bounding_box(&self) -> BoundingBox2D {
        self.bbox
    }

    fn contains_point(&self, point: &Vec2) -> bool {
        if !self.bbox.contains_point(point) {
            return false;
        }
        let local = self.to_local(point);
        self.components.iter().any(|c| c.contains_point(&local))
    }

    /// Shortest child escape vector that doesn't land inside another child
    fn gradient(&self, point: &Vec2) -> Result<Vec2, GradientError> {
        if self.components.is_empty() {
            log::warn!("{}: no components, can't determine gradient", self.name);
            return Err(GradientError::Empty);
        }

        let local = self.to_local(point);
        let mut best: Option<Vec2> = None;
        for (i, child) in self.components.iter().enumerate() {
            let candidate = match child.gradient(&local) {
                Ok(g) => g,
                Err(err) => {
                    log::debug!("{}: skipping component {}: {}", self.name, child.name(), err);
                    continue;
                }
            };
            let target = local + candidate;
            let blocked = self
                .components
                .iter()
                .enumerate()
                .any(|(j, sibling)| j != i && sibling.contains_point(&target));
            if blocked {
                continue;
            }
            if best.map_or(true, |b| candidate.norm_squared() < b.norm_squared()) {
                best = Some(candidate);
            }
        }

        best.map(|g| self.rotation * g).ok_or(GradientError::Empty)
    }

    fn update_position(&mut self, new_center: &Vec2) {
        let diff = new_center - self.center;
        self.center = *new_center;
        self.bbox.translate(&diff);
    }

    fn rotate_about(&mut self, origin: &Vec2, rotation: &Rot2) {
        self.rotation = rotation * self.rotation;
        self.center = rotate_about(&self.center, origin, rotation);
        self.recalculate_bounding_box();
    }

    fn bloat(&mut self, amount: Real) {
        for c in &mut self.components {
            c.bloat(amount);
        }
        self.recalculate_bounding_box();
    }
}

impl fmt::Display for HierarchicalObstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HierarchicalObstacle[{},#components={}]", self.name, self.components.len())
    }
}
