//! Read-only render snapshot

use glam::IVec2;
use serde::Serialize;

use super::phase::PhaseId;
use super::projectile::ProjectileKind;
use super::session::GameplaySession;

/// A live projectile as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub pos: IVec2,
    pub size: IVec2,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: PhaseId,
    pub player: IVec2,
    pub shield: bool,
    pub projectiles: Vec<ProjectileView>,
    pub enemies: Vec<IVec2>,
    pub score: u64,
    pub remaining: usize,
    pub status: String,
    /// Effective ship stats for the HUD
    pub speed: i32,
    pub fire_rate_ms: u64,
    pub fire_power: u32,
    /// Score that grants the next modifier
    pub next_unlock: u64,
    pub paused: bool,
}

impl Snapshot {
    pub fn from_session(session: &GameplaySession, phase: PhaseId) -> Self {
        let now = session.time_ms();
        let formation = session.formation();
        Self {
            phase,
            player: session.player_pos(),
            shield: session.chain().has_shield(now),
            projectiles: session
                .projectiles()
                .iter()
                .filter(|p| p.alive)
                .map(|p| ProjectileView {
                    kind: p.kind,
                    pos: p.pos,
                    size: p.kind.size(),
                })
                .collect(),
            enemies: formation
                .active_leaves(session.scene_root())
                .into_iter()
                .map(|id| formation.enemy(id).pos)
                .collect(),
            score: session.score(),
            remaining: session.remaining_enemies(),
            status: session.chain().status_label(now),
            speed: session.chain().effective_speed(now),
            fire_rate_ms: session.chain().effective_fire_rate(now),
            fire_power: session.chain().effective_fire_power(now),
            next_unlock: session.next_unlock(),
            paused: session.is_paused(),
        }
    }

    /// Menu and end screens: no playfield, just the score
    pub fn idle(phase: PhaseId, score: u64) -> Self {
        Self {
            phase,
            player: IVec2::ZERO,
            shield: false,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            score,
            remaining: 0,
            status: String::new(),
            speed: 0,
            fire_rate_ms: 0,
            fire_power: 0,
            next_unlock: 0,
            paused: false,
        }
    }
}
