//! Simulation tick - one fixed step of gameplay

use super::input::TickInput;
use super::session::GameplaySession;

/// What a tick left the session in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still playing
    Running,
    /// Paused; nothing advanced
    Paused,
    /// Every alien destroyed
    Won,
    /// An alien got past the loss line
    Lost,
    /// Session clock already stopped
    Stopped,
}

/// Run a single simulation tick.
///
/// Order: input, modifier expiry, formation, projectiles, collisions and the
/// win check, unlocks, the loss check, then cleanup of destroyed aliens and
/// the clock step.
pub fn tick(session: &mut GameplaySession, input: &TickInput) -> TickOutcome {
    if !session.is_running() {
        return TickOutcome::Stopped;
    }

    if input.pause {
        session.toggle_pause();
    }
    if session.is_paused() {
        return TickOutcome::Paused;
    }

    let input = if input.idle_mode {
        autopilot(session, input)
    } else {
        input.clone()
    };

    if input.move_left {
        session.move_player(-1);
    }
    if input.move_right {
        session.move_player(1);
    }
    if input.fire {
        session.request_fire();
    }

    session.expire_modifiers();
    session.advance_formation();
    session.advance_projectiles();

    if session.resolve_collisions() {
        session.finish_tick();
        return TickOutcome::Won;
    }

    session.check_unlocks();

    if session.enemy_breached() {
        session.finish_tick();
        return TickOutcome::Lost;
    }

    session.finish_tick();
    TickOutcome::Running
}

/// Autopilot: chase the lowest alien, leading it by the shot's flight time,
/// and keep firing
fn autopilot(session: &GameplaySession, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    let player = session.player_pos();
    let formation = session.formation();
    let tuning = session.tuning();

    let target = formation
        .active_leaves(session.scene_root())
        .into_iter()
        .map(|id| formation.enemy(id).pos)
        .max_by_key(|pos| (pos.y, -(pos.x - player.x).abs()));

    if let Some(target) = target {
        let main = formation.group(session.main_formation());
        let flight =
            (player.y - tuning.muzzle_offset - target.y).max(0) / tuning.projectile_speed.max(1);
        let aim = target.x + main.direction * main.speed * flight;

        let dx = aim - player.x;
        let speed = session.chain().effective_speed(session.time_ms());
        input.move_left = dx <= -speed;
        input.move_right = dx >= speed;
    }
    input.fire = true;

    input
}
