//! Recoverable errors surfaced by the core

/// Errors the simulation reports back to its callers.
///
/// None of these abort a session: the caller decides whether to skip the
/// offending request or fall back to defaults.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Projectile type id not known to the catalog
    #[error("Unknown projectile kind id: {0}")]
    UnknownProjectileKind(u8),

    /// Projectile name not known to the catalog
    #[error("Unknown projectile name: {0}")]
    UnknownProjectileName(String),

    /// Tuning values that would break the simulation
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Bad command line
    #[error("Usage: {0}")]
    Usage(String),

    /// Malformed tuning file
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// IO error while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, GameError>;
