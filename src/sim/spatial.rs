//! Static obstacle queries
//!
//! The arena's asteroids live in an external spatial index (an R-tree in the
//! shipping build). The sim only needs one operation from it - "what might a
//! torpedo at this point be touching" - so it talks to the index through
//! [`ObstacleIndex`] and ships a plain linear-scan implementation for tests
//! and the headless demo.

use glam::Vec2;

/// Axis-aligned query box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square box of half-extent `radius` around `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        let half = Vec2::splat(radius);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let clamped = center.clamp(self.min, self.max);
        (clamped - center).length_squared() <= radius * radius
    }
}

/// A static circular obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.center).length_squared() < self.radius * self.radius
    }
}

/// Range query over static obstacles. Read-only from the sim's perspective.
pub trait ObstacleIndex {
    /// Obstacles whose bounds may overlap `query`. May over-approximate;
    /// callers do the exact circle test themselves.
    fn query(&self, query: Aabb) -> Vec<Obstacle>;
}

/// Linear-scan index over a fixed obstacle list
#[derive(Debug, Clone, Default)]
pub struct StaticObstacles {
    obstacles: Vec<Obstacle>,
}

impl StaticObstacles {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ObstacleIndex for StaticObstacles {
    fn query(&self, query: Aabb) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| query.intersects_circle(o.center, o.radius))
            .copied()
            .collect()
    }
}
