//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, on the session clock
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the formation)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod formation;
pub mod input;
pub mod phase;
pub mod power;
pub mod projectile;
pub mod session;
pub mod snapshot;
pub mod tick;

pub use collision::{Aabb, projectile_hits_enemy};
pub use events::{DiagnosticsSink, GameEvent, LogSink, NullSink, RecordingSink, SharedSink};
pub use formation::{Component, Enemy, EnemyId, Formation, FormationBounds, Group, GroupId};
pub use input::{InputQueue, InputSender, Intent, MenuAction, TickInput};
pub use phase::{PhaseController, PhaseId};
pub use power::{Modifier, ModifierKind, PowerChain, ShipStats};
pub use projectile::{Projectile, ProjectileCatalog, ProjectileKind};
pub use session::GameplaySession;
pub use snapshot::{ProjectileView, Snapshot};
pub use tick::{TickOutcome, tick};
