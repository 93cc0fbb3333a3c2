//! Collision detection for axis-aligned entities
//!
//! Every entity is a box centered on its position with fixed half-extents.
//! Two boxes collide when their centers are closer than the summed
//! half-extents on both axes. Touching edges do not count.

use glam::IVec2;

/// An axis-aligned box described by its center and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aabb {
    pub center: IVec2,
    pub half: IVec2,
}

impl Aabb {
    pub fn new(center: IVec2, half: IVec2) -> Self {
        Self { center, half }
    }

    /// Build from a full width/height
    pub fn from_size(center: IVec2, size: IVec2) -> Self {
        Self::new(center, size / 2)
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.x < reach.x && delta.y < reach.y
    }
}

/// Check whether a projectile box hits an enemy box
#[inline]
pub fn projectile_hits_enemy(projectile: &Aabb, enemy: &Aabb) -> bool {
    projectile.overlaps(enemy)
}
