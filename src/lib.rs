//! Space Invaders - fixed-tick arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, power-ups, projectiles, phases)
//! - `game`: Fixed timestep driver feeding queued input into the simulation
//! - `tuning`: Data-driven game balance
//! - `error`: Recoverable error types

pub mod error;
pub mod game;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use game::Game;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (~60 Hz)
    pub const TICK_MS: u64 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time accepted by the driver (seconds)
    pub const MAX_FRAME_SECS: f32 = 0.25;

    /// Player defaults
    pub const PLAYER_START_X: i32 = 400;
    pub const PLAYER_START_Y: i32 = 550;
    pub const PLAYER_MIN_X: i32 = 30;
    pub const PLAYER_MAX_X: i32 = 770;
    /// Projectiles spawn this far above the ship
    pub const MUZZLE_OFFSET: i32 = 20;
    /// Lateral offset of the outer shots of a triple shot
    pub const TRIPLE_SHOT_SPREAD: i32 = 15;

    /// Base ship stats (before any modifier)
    pub const BASE_PLAYER_SPEED: i32 = 8;
    pub const BASE_FIRE_RATE_MS: u64 = 300;
    pub const BASE_FIRE_POWER: u32 = 1;

    /// Alien formation
    pub const ALIEN_ROWS: i32 = 5;
    pub const ALIEN_COLUMNS: i32 = 11;
    pub const ALIEN_START_X: i32 = 150;
    pub const ALIEN_START_Y: i32 = 50;
    pub const ALIEN_SPACING: i32 = 40;
    pub const ALIEN_WIDTH: i32 = 30;
    pub const ALIEN_HEIGHT: i32 = 20;
    pub const FORMATION_SPEED: i32 = 1;
    pub const FORMATION_DROP: i32 = 10;
    pub const FORMATION_MIN_X: i32 = 50;
    pub const FORMATION_MAX_X: i32 = 750;
    /// An active alien below this line ends the run
    pub const ALIEN_GAME_OVER_Y: i32 = 500;

    /// Projectiles (pixels per tick, upward)
    pub const PROJECTILE_SPEED: i32 = 15;
    /// Catalog id fired by the player (normal shot)
    pub const PLAYER_SHOT_KIND: u8 = 0;

    /// Scoring
    pub const POINTS_PER_ALIEN: u64 = 10;
    pub const POWERUP_SCORE_INTERVAL: u64 = 50;

    /// Modifier durations (ms)
    pub const SPEED_BOOST_DURATION_MS: u64 = 5000;
    pub const TRIPLE_SHOT_DURATION_MS: u64 = 8000;
    pub const RAPID_FIRE_DURATION_MS: u64 = 7000;
    pub const SHIELD_DURATION_MS: u64 = 10000;
    /// Hits a shield absorbs before collapsing
    pub const SHIELD_HITS: u32 = 3;
}
