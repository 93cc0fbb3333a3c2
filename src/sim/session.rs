//! Gameplay session state
//!
//! Everything a running game owns: the ship and its modifier chain, the
//! enemy scene, live projectiles, score and the session clock. A session is
//! owned exclusively by the `Playing` phase and dropped when that phase
//! exits. The per-tick pipeline that drives it lives in `tick`.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Aabb, projectile_hits_enemy};
use super::events::{GameEvent, SharedSink};
use super::formation::{Component, Formation, FormationBounds, GroupId};
use super::power::{Modifier, ModifierKind, PowerChain, ShipStats};
use super::projectile::{Projectile, ProjectileCatalog};
use crate::error::Result;
use crate::tuning::Tuning;

/// Name of the scene root holding every enemy group
pub const ENEMY_GROUP: &str = "EnemyGroup";
/// Name of the rectangular alien grid
pub const MAIN_FORMATION: &str = "MainFormation";

pub struct GameplaySession {
    tuning: Tuning,
    chain: PowerChain,
    formation: Formation,
    /// Scene root
    scene: GroupId,
    /// The alien grid under the scene root
    main: GroupId,
    projectiles: Vec<Projectile>,
    catalog: ProjectileCatalog,
    score: u64,
    /// Highest score multiple that already granted a modifier
    last_unlock: u64,
    last_shot_ms: Option<u64>,
    /// Session clock, advanced by `tick_ms` per unpaused tick
    time_ms: u64,
    ticks: u64,
    paused: bool,
    running: bool,
    rng: Pcg32,
    sink: SharedSink,
}

impl GameplaySession {
    /// Set up a fresh run: base ship, alien grid attached under the scene
    /// root, empty projectile list.
    pub fn new(tuning: Tuning, seed: u64, sink: SharedSink) -> Self {
        let chain = PowerChain::new(ShipStats::from_tuning(&tuning));

        let mut formation = Formation::new(FormationBounds {
            min_x: tuning.formation_min_x,
            max_x: tuning.formation_max_x,
            drop_step: tuning.formation_drop,
        });
        let scene = formation.spawn_group(ENEMY_GROUP);
        let main = formation.spawn_rectangular(
            MAIN_FORMATION,
            tuning.alien_rows,
            tuning.alien_columns,
            IVec2::new(tuning.alien_start_x, tuning.alien_start_y),
            tuning.alien_spacing,
            tuning.formation_speed,
        );
        formation.add(scene, Component::Group(main));
        sink.emit(&GameEvent::FormationCreated {
            name: MAIN_FORMATION.to_string(),
            rows: tuning.alien_rows,
            cols: tuning.alien_columns,
        });

        log::info!("Session created (seed {})", seed);

        Self {
            tuning,
            chain,
            formation,
            scene,
            main,
            projectiles: Vec::new(),
            catalog: ProjectileCatalog::new(),
            score: 0,
            last_unlock: 0,
            last_shot_ms: None,
            time_ms: 0,
            ticks: 0,
            paused: false,
            running: true,
            rng: Pcg32::seed_from_u64(seed),
            sink,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn chain(&self) -> &PowerChain {
        &self.chain
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn formation_mut(&mut self) -> &mut Formation {
        &mut self.formation
    }

    pub fn scene_root(&self) -> GroupId {
        self.scene
    }

    pub fn main_formation(&self) -> GroupId {
        self.main
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn player_pos(&self) -> IVec2 {
        self.chain.position()
    }

    /// Place the ship, clamped to the horizontal play area
    pub fn set_player_x(&mut self, x: i32) {
        let x = x.clamp(self.tuning.player_min_x, self.tuning.player_max_x);
        let y = self.chain.position().y;
        self.chain.set_position(IVec2::new(x, y));
    }

    /// Score at which the next modifier is granted
    pub fn next_unlock(&self) -> u64 {
        self.last_unlock + self.tuning.powerup_interval
    }

    /// Aliens still alive in the main formation
    pub fn remaining_enemies(&self) -> usize {
        self.formation.count_active_components(self.main)
    }

    /// Stop the session clock for good. Ticks on a stopped session do nothing.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::debug!("Session clock stopped after {} ticks", self.ticks);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.sink.emit(&GameEvent::PauseToggled {
            paused: self.paused,
        });
    }

    /// Move the ship one step at the chain's current speed (-1 left, +1 right)
    pub fn move_player(&mut self, direction: i32) {
        let speed = self.chain.effective_speed(self.time_ms);
        let x = self.player_pos().x + direction.signum() * speed;
        self.set_player_x(x);
    }

    /// Try to fire at the current session time.
    ///
    /// The cooldown and fire power are read from the chain on every request.
    /// Returns the number of projectiles spawned; 0 means the request was
    /// rejected and the cooldown timestamp is untouched.
    pub fn request_fire(&mut self) -> usize {
        let now = self.time_ms;
        let cooldown = self.chain.effective_fire_rate(now);
        if let Some(last) = self.last_shot_ms {
            if now.saturating_sub(last) < cooldown {
                return 0;
            }
        }

        let pos = self.player_pos();
        let y = pos.y - self.tuning.muzzle_offset;
        let spread = self.tuning.triple_shot_spread;
        let xs = if self.chain.effective_fire_power(now) >= 3 {
            vec![pos.x - spread, pos.x, pos.x + spread]
        } else {
            vec![pos.x]
        };

        // One refusal covers the whole volley
        let kind_id = self.tuning.shot_kind;
        let volley: Result<Vec<Projectile>> = xs
            .into_iter()
            .map(|x| self.catalog.create(kind_id, x, y))
            .collect();
        let volley = match volley {
            Ok(volley) => volley,
            Err(_) => {
                self.sink.emit(&GameEvent::UnknownProjectile { kind_id });
                return 0;
            }
        };

        let fired = volley.len();
        self.projectiles.extend(volley);
        self.last_shot_ms = Some(now);
        self.sink.emit(&GameEvent::ShotFired { count: fired });
        fired
    }

    /// Wrap the chain head with a new modifier of the given kind
    pub fn push_modifier(&mut self, kind: ModifierKind) {
        let modifier = Modifier::new(
            kind,
            self.time_ms,
            kind.duration_ms(&self.tuning),
            self.tuning.shield_hits,
        );
        self.chain.push(modifier);
        self.sink.emit(&GameEvent::ModifierApplied {
            kind,
            status: self.chain.status_label(self.time_ms),
        });
    }

    /// Let the newest live shield take a hit
    pub fn absorb_hit(&mut self) -> bool {
        let absorbed = self.chain.absorb_hit(self.time_ms);
        if absorbed {
            self.sink.emit(&GameEvent::ShieldHitAbsorbed);
        }
        absorbed
    }

    /// Report modifiers that ran out since the previous tick
    pub(crate) fn expire_modifiers(&mut self) {
        for kind in self.chain.poll_expired(self.time_ms) {
            self.sink.emit(&GameEvent::ModifierExpired { kind });
        }
    }

    pub(crate) fn advance_formation(&mut self) {
        for group in self.formation.update(self.scene) {
            self.sink.emit(&GameEvent::FormationDropped {
                name: self.formation.group(group).name.clone(),
            });
        }
    }

    /// Move shots upward and evict those past the top edge
    pub(crate) fn advance_projectiles(&mut self) {
        let speed = self.tuning.projectile_speed;
        for projectile in self.projectiles.iter_mut().filter(|p| p.alive) {
            projectile.pos.y -= speed;
            if projectile.pos.y < 0 {
                projectile.alive = false;
            }
        }
        self.projectiles.retain(|p| p.alive);
    }

    /// Test every live shot against every active alien.
    ///
    /// Hit aliens are only flagged here; they leave the scene in
    /// `finish_tick`. Returns true once no aliens remain, cutting the pass
    /// short at the kill that cleared the formation.
    pub(crate) fn resolve_collisions(&mut self) -> bool {
        let alien_size = IVec2::new(self.tuning.alien_width, self.tuning.alien_height);
        let targets = self.formation.active_leaves(self.scene);
        let mut remaining = self.remaining_enemies();

        'shots: for projectile in self.projectiles.iter_mut() {
            if remaining == 0 {
                break;
            }
            if !projectile.alive {
                continue;
            }
            let shot = Aabb::from_size(projectile.pos, projectile.kind.size());
            for &id in &targets {
                let enemy = self.formation.enemy(id);
                let body = Aabb::from_size(enemy.pos, alien_size);
                if !enemy.active || !projectile_hits_enemy(&shot, &body) {
                    continue;
                }
                self.formation.hit(id);
                projectile.alive = false;
                self.score += self.tuning.points_per_alien;
                remaining = self.formation.count_active_components(self.main);
                self.sink.emit(&GameEvent::EnemyHit {
                    score: self.score,
                    remaining,
                });
                if remaining == 0 {
                    break 'shots;
                }
                continue 'shots;
            }
        }

        self.projectiles.retain(|p| p.alive);
        remaining == 0
    }

    /// Grant one random modifier per score multiple passed since the last
    /// grant. Returns how many were granted.
    pub(crate) fn check_unlocks(&mut self) -> usize {
        let interval = self.tuning.powerup_interval;
        if interval == 0 {
            return 0;
        }
        let mut granted = 0;
        while self.score >= self.last_unlock + interval {
            self.last_unlock += interval;
            let kind = ModifierKind::ALL[self.rng.random_range(0..ModifierKind::ALL.len())];
            self.push_modifier(kind);
            granted += 1;
        }
        granted
    }

    /// Whether any active alien is past the loss line
    pub(crate) fn enemy_breached(&self) -> bool {
        self.formation
            .active_leaves(self.scene)
            .iter()
            .any(|id| self.formation.enemy(*id).pos.y > self.tuning.game_over_y)
    }

    /// Evict dead aliens from every group and advance the clock
    pub(crate) fn finish_tick(&mut self) {
        for group in self.formation.groups_under(self.scene) {
            self.formation.cleanup_inactive(group);
        }
        self.time_ms += self.tuning.tick_ms;
        self.ticks += 1;
    }
}
