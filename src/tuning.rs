//! Game balance and layout values
//!
//! Loaded once at startup and treated as immutable for a session. Every
//! field falls back to its `consts` default when absent from the JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};

/// Numeric configuration for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Length of one simulation tick (ms)
    pub tick_ms: u64,

    // === Player ===
    pub player_start_x: i32,
    pub player_start_y: i32,
    pub player_min_x: i32,
    pub player_max_x: i32,
    pub muzzle_offset: i32,
    pub triple_shot_spread: i32,
    pub base_speed: i32,
    pub base_fire_rate_ms: u64,
    pub base_fire_power: u32,

    // === Aliens ===
    pub alien_rows: i32,
    pub alien_columns: i32,
    pub alien_start_x: i32,
    pub alien_start_y: i32,
    pub alien_spacing: i32,
    pub alien_width: i32,
    pub alien_height: i32,
    pub formation_speed: i32,
    pub formation_drop: i32,
    pub formation_min_x: i32,
    pub formation_max_x: i32,
    pub game_over_y: i32,

    // === Projectiles ===
    pub projectile_speed: i32,
    /// Catalog id of the player's shot
    pub shot_kind: u8,

    // === Scoring ===
    pub points_per_alien: u64,
    pub powerup_interval: u64,

    // === Modifiers ===
    pub speed_boost_ms: u64,
    pub triple_shot_ms: u64,
    pub rapid_fire_ms: u64,
    pub shield_ms: u64,
    pub shield_hits: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,

            player_start_x: PLAYER_START_X,
            player_start_y: PLAYER_START_Y,
            player_min_x: PLAYER_MIN_X,
            player_max_x: PLAYER_MAX_X,
            muzzle_offset: MUZZLE_OFFSET,
            triple_shot_spread: TRIPLE_SHOT_SPREAD,
            base_speed: BASE_PLAYER_SPEED,
            base_fire_rate_ms: BASE_FIRE_RATE_MS,
            base_fire_power: BASE_FIRE_POWER,

            alien_rows: ALIEN_ROWS,
            alien_columns: ALIEN_COLUMNS,
            alien_start_x: ALIEN_START_X,
            alien_start_y: ALIEN_START_Y,
            alien_spacing: ALIEN_SPACING,
            alien_width: ALIEN_WIDTH,
            alien_height: ALIEN_HEIGHT,
            formation_speed: FORMATION_SPEED,
            formation_drop: FORMATION_DROP,
            formation_min_x: FORMATION_MIN_X,
            formation_max_x: FORMATION_MAX_X,
            game_over_y: ALIEN_GAME_OVER_Y,

            projectile_speed: PROJECTILE_SPEED,
            shot_kind: PLAYER_SHOT_KIND,

            points_per_alien: POINTS_PER_ALIEN,
            powerup_interval: POWERUP_SCORE_INTERVAL,

            speed_boost_ms: SPEED_BOOST_DURATION_MS,
            triple_shot_ms: TRIPLE_SHOT_DURATION_MS,
            rapid_fire_ms: RAPID_FIRE_DURATION_MS,
            shield_ms: SHIELD_DURATION_MS,
            shield_hits: SHIELD_HITS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(GameError::InvalidTuning("tick_ms must be positive".into()));
        }
        if self.powerup_interval == 0 {
            return Err(GameError::InvalidTuning(
                "powerup_interval must be positive".into(),
            ));
        }
        if self.alien_spacing < 0 || self.formation_speed < 0 || self.formation_drop < 0 {
            return Err(GameError::InvalidTuning(
                "formation spacing, speed and drop cannot be negative".into(),
            ));
        }
        if self.formation_min_x >= self.formation_max_x {
            return Err(GameError::InvalidTuning(format!(
                "formation margins inverted: {} >= {}",
                self.formation_min_x, self.formation_max_x
            )));
        }
        if self.player_min_x > self.player_max_x {
            return Err(GameError::InvalidTuning(format!(
                "player bounds inverted: {} > {}",
                self.player_min_x, self.player_max_x
            )));
        }
        Ok(())
    }

    /// Tick length in seconds, for frame-time accumulation
    pub fn tick_secs(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }
}
