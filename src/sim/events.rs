//! Diagnostics notifications
//!
//! The simulation reports every meaningful state change to an injected
//! sink. Sinks must never block or fail the caller.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::input::MenuAction;
use super::phase::PhaseId;
use super::power::ModifierKind;

/// State changes worth observing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged {
        from: Option<PhaseId>,
        to: PhaseId,
    },
    /// A menu action that the current phase does not accept
    InvalidTransition {
        phase: PhaseId,
        action: MenuAction,
    },
    FormationCreated {
        name: String,
        rows: i32,
        cols: i32,
    },
    FormationDropped {
        name: String,
    },
    EnemyHit {
        score: u64,
        remaining: usize,
    },
    ShotFired {
        count: usize,
    },
    UnknownProjectile {
        kind_id: u8,
    },
    ModifierApplied {
        kind: ModifierKind,
        status: String,
    },
    ModifierExpired {
        kind: ModifierKind,
    },
    ShieldHitAbsorbed,
    PauseToggled {
        paused: bool,
    },
}

/// Receiver of diagnostics events
pub trait DiagnosticsSink: Send + Sync {
    fn emit(&self, event: &GameEvent);
}

/// Shared handle passed into sessions and the phase controller
pub type SharedSink = Arc<dyn DiagnosticsSink>;

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn emit(&self, _event: &GameEvent) {}
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn emit(&self, event: &GameEvent) {
        match event {
            GameEvent::PhaseChanged { from, to } => match from {
                Some(from) => log::info!("[STATE] Game: {:?} -> {:?}", from, to),
                None => log::info!("[STATE] Game: INIT -> {:?}", to),
            },
            GameEvent::InvalidTransition { phase, action } => {
                log::warn!("[STATE] Ignoring {:?} while in {:?}", action, phase)
            }
            GameEvent::FormationCreated { name, rows, cols } => {
                log::info!("[COMPOSITE] {} created: {}x{}", name, rows, cols)
            }
            GameEvent::FormationDropped { name } => {
                log::debug!("[COMPOSITE] {} dropped one row", name)
            }
            GameEvent::EnemyHit { score, remaining } => {
                log::info!("Hit! Score: {} (Remaining: {})", score, remaining)
            }
            GameEvent::ShotFired { count } => log::debug!("Fired {} projectile(s)", count),
            GameEvent::UnknownProjectile { kind_id } => {
                log::warn!("[FACTORY] Unknown projectile type: {}", kind_id)
            }
            GameEvent::ModifierApplied { kind, status } => {
                log::info!("[DECORATOR] {} applied - {}", kind.as_str(), status)
            }
            GameEvent::ModifierExpired { kind } => {
                log::info!("[DECORATOR] {} expired", kind.as_str())
            }
            GameEvent::ShieldHitAbsorbed => log::info!("[DECORATOR] Shield absorbed hit"),
            GameEvent::PauseToggled { paused } => {
                log::info!("[STATE] Game {}", if *paused { "PAUSED" } else { "RESUMED" })
            }
        }
    }
}

/// Keeps events in memory (tests, replays)
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<GameEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Recorded events matching a predicate
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn emit(&self, event: &GameEvent) {
        // A poisoned recorder just stops recording
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
