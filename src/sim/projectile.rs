//! Projectile catalog
//!
//! Projectiles are created by type id (or name) so callers never construct
//! them directly. Unknown ids produce an error and no projectile.

use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Standard player shot
    Normal,
    /// Heavier, wider player shot
    Power,
    /// Enemy ordnance (catalogued, never emitted by the game)
    AlienBomb,
}

impl ProjectileKind {
    pub const NORMAL_ID: u8 = 0;
    pub const POWER_ID: u8 = 1;
    pub const ALIEN_BOMB_ID: u8 = 2;

    /// Catalog id for this kind
    pub const fn id(self) -> u8 {
        match self {
            ProjectileKind::Normal => Self::NORMAL_ID,
            ProjectileKind::Power => Self::POWER_ID,
            ProjectileKind::AlienBomb => Self::ALIEN_BOMB_ID,
        }
    }

    /// Full width and height in pixels
    pub const fn size(self) -> IVec2 {
        match self {
            ProjectileKind::Normal => IVec2::new(5, 15),
            ProjectileKind::Power => IVec2::new(8, 20),
            ProjectileKind::AlienBomb => IVec2::new(6, 12),
        }
    }

    pub const fn damage(self) -> u32 {
        match self {
            ProjectileKind::Normal => 1,
            ProjectileKind::Power => 2,
            ProjectileKind::AlienBomb => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileKind::Normal => "normal",
            ProjectileKind::Power => "power",
            ProjectileKind::AlienBomb => "bomb",
        }
    }
}

impl TryFrom<u8> for ProjectileKind {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            Self::NORMAL_ID => Ok(ProjectileKind::Normal),
            Self::POWER_ID => Ok(ProjectileKind::Power),
            Self::ALIEN_BOMB_ID => Ok(ProjectileKind::AlienBomb),
            other => Err(GameError::UnknownProjectileKind(other)),
        }
    }
}

impl FromStr for ProjectileKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(ProjectileKind::Normal),
            "power" => Ok(ProjectileKind::Power),
            "bomb" => Ok(ProjectileKind::AlienBomb),
            _ => Err(GameError::UnknownProjectileName(s.to_string())),
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pos: IVec2,
    /// Cleared on collision or when leaving the playfield
    pub alive: bool,
    pub damage: u32,
}

impl Projectile {
    fn new(kind: ProjectileKind, pos: IVec2) -> Self {
        Self {
            kind,
            pos,
            alive: true,
            damage: kind.damage(),
        }
    }
}

/// Keyed projectile creator
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectileCatalog;

impl ProjectileCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Create a projectile from its catalog id
    pub fn create(&self, kind_id: u8, x: i32, y: i32) -> Result<Projectile> {
        match ProjectileKind::try_from(kind_id) {
            Ok(kind) => Ok(self.spawn(kind, x, y)),
            Err(e) => {
                log::warn!("Catalog refused projectile: {}", e);
                Err(e)
            }
        }
    }

    /// Create a projectile from its name ("normal", "power", "bomb")
    pub fn create_named(&self, name: &str, x: i32, y: i32) -> Result<Projectile> {
        match name.parse::<ProjectileKind>() {
            Ok(kind) => Ok(self.spawn(kind, x, y)),
            Err(e) => {
                log::warn!("Catalog refused projectile: {}", e);
                Err(e)
            }
        }
    }

    /// Create a projectile of a known kind
    pub fn spawn(&self, kind: ProjectileKind, x: i32, y: i32) -> Projectile {
        log::debug!("{:?} shot created at ({}, {})", kind, x, y);
        Projectile::new(kind, IVec2::new(x, y))
    }
}
