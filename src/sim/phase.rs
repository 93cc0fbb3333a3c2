//! Game flow: Menu -> Playing -> Won/Lost -> Menu
//!
//! The controller always owns exactly one phase. A Playing phase owns its
//! session outright, so retiring the phase retires the session with it and
//! no tick can reach a session that lost the active phase.

use serde::{Deserialize, Serialize};

use super::events::{GameEvent, SharedSink};
use super::input::{MenuAction, TickInput};
use super::session::GameplaySession;
use super::snapshot::Snapshot;
use super::tick::{TickOutcome, tick};
use crate::error::Result;
use crate::tuning::Tuning;

/// Identity of a phase, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseId {
    Menu,
    Playing,
    Won,
    Lost,
}

impl PhaseId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseId::Menu => "MENU",
            PhaseId::Playing => "PLAYING",
            PhaseId::Won => "WON",
            PhaseId::Lost => "LOST",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PhaseId::Won | PhaseId::Lost)
    }
}

enum Phase {
    Menu,
    Playing(Box<GameplaySession>),
    /// End screens keep the final score for display
    Won { score: u64 },
    Lost { score: u64 },
}

impl Phase {
    fn id(&self) -> PhaseId {
        match self {
            Phase::Menu => PhaseId::Menu,
            Phase::Playing(_) => PhaseId::Playing,
            Phase::Won { .. } => PhaseId::Won,
            Phase::Lost { .. } => PhaseId::Lost,
        }
    }

    /// Exit hook. A Playing phase stops its session clock here.
    fn on_exit(&mut self) {
        if let Phase::Playing(session) = self {
            session.stop();
        }
        log::debug!("Exiting {}", self.id().as_str());
    }

    /// Enter hook, run once the phase is current
    fn on_enter(&self) {
        match self {
            Phase::Menu => log::info!("Entering MENU"),
            Phase::Playing(session) => log::info!(
                "Entering PLAYING - {} aliens",
                session.remaining_enemies()
            ),
            Phase::Won { score } | Phase::Lost { score } => {
                log::info!("Entering {} - final score {}", self.id().as_str(), score)
            }
        }
    }
}

/// Single authority for phase changes
pub struct PhaseController {
    current: Phase,
    tuning: Tuning,
    /// Base seed; each new session offsets it by the run count
    seed: u64,
    sessions_started: u64,
    sink: SharedSink,
    history: Vec<(PhaseId, PhaseId)>,
}

impl PhaseController {
    /// Start in the menu. Tuning is checked once here, since every
    /// session this controller starts runs on it.
    pub fn new(tuning: Tuning, seed: u64, sink: SharedSink) -> Result<Self> {
        tuning.validate()?;
        sink.emit(&GameEvent::PhaseChanged {
            from: None,
            to: PhaseId::Menu,
        });
        let controller = Self {
            current: Phase::Menu,
            tuning,
            seed,
            sessions_started: 0,
            sink,
            history: Vec::new(),
        };
        controller.current.on_enter();
        Ok(controller)
    }

    pub fn phase(&self) -> PhaseId {
        self.current.id()
    }

    /// Every transition so far, oldest first
    pub fn history(&self) -> &[(PhaseId, PhaseId)] {
        &self.history
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// The live session, if playing
    pub fn session(&self) -> Option<&GameplaySession> {
        match &self.current {
            Phase::Playing(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut GameplaySession> {
        match &mut self.current {
            Phase::Playing(session) => Some(session.as_mut()),
            _ => None,
        }
    }

    /// Score of the running or just-finished session
    pub fn score(&self) -> u64 {
        match &self.current {
            Phase::Menu => 0,
            Phase::Playing(session) => session.score(),
            Phase::Won { score } | Phase::Lost { score } => *score,
        }
    }

    /// Apply a menu action. Actions the current phase does not accept are
    /// ignored and reported; returns whether a transition happened.
    pub fn handle(&mut self, action: MenuAction) -> bool {
        let from = self.phase();
        let to = match (from, action) {
            (PhaseId::Menu, MenuAction::Start)
            | (PhaseId::Won, MenuAction::PlayAgain)
            | (PhaseId::Lost, MenuAction::TryAgain) => PhaseId::Playing,
            (PhaseId::Won | PhaseId::Lost, MenuAction::Return) => PhaseId::Menu,
            _ => {
                log::warn!("Invalid transition: {:?} in {}", action, from.as_str());
                self.sink.emit(&GameEvent::InvalidTransition {
                    phase: from,
                    action,
                });
                return false;
            }
        };
        self.transition(to);
        true
    }

    /// Advance one tick: menu selection first, then the session if playing
    pub fn tick(&mut self, input: &TickInput) -> PhaseId {
        if let Some(action) = input.menu {
            self.handle(action);
        }

        let outcome = match &mut self.current {
            Phase::Playing(session) => tick(session, input),
            _ => return self.phase(),
        };
        match outcome {
            TickOutcome::Won => self.transition(PhaseId::Won),
            TickOutcome::Lost => self.transition(PhaseId::Lost),
            TickOutcome::Running | TickOutcome::Paused | TickOutcome::Stopped => {}
        }
        self.phase()
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        match &self.current {
            Phase::Playing(session) => Snapshot::from_session(session, PhaseId::Playing),
            other => Snapshot::idle(other.id(), self.score()),
        }
    }

    /// Exit the old phase, record the change, then enter the new one
    fn transition(&mut self, to: PhaseId) {
        let from = self.phase();
        let score = self.score();

        self.current.on_exit();

        self.history.push((from, to));
        self.sink.emit(&GameEvent::PhaseChanged {
            from: Some(from),
            to,
        });

        self.enter(to, score);
    }

    /// Build the incoming phase and make it current. The retired phase, and
    /// any session it owned, is dropped here.
    fn enter(&mut self, to: PhaseId, score: u64) {
        let next = match to {
            PhaseId::Menu => Phase::Menu,
            PhaseId::Playing => Phase::Playing(Box::new(self.fresh_session())),
            PhaseId::Won => Phase::Won { score },
            PhaseId::Lost => Phase::Lost { score },
        };
        drop(std::mem::replace(&mut self.current, next));
        self.current.on_enter();
    }

    fn fresh_session(&mut self) -> GameplaySession {
        let seed = self.seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;
        GameplaySession::new(self.tuning.clone(), seed, self.sink.clone())
    }
}
