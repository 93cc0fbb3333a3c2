//! Player intents and their delivery at tick boundaries
//!
//! Intents may be produced from any thread through an [`InputSender`]. The
//! driver drains the queue once per tick into a [`TickInput`], so nothing
//! arriving mid-tick can change what the current tick sees.

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

/// Menu / end-screen choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    /// Menu: begin a run
    Start,
    /// Won/Lost: back to the menu
    Return,
    /// Won: fresh run
    PlayAgain,
    /// Lost: fresh run
    TryAgain,
}

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Fire,
    TogglePause,
    MenuSelect(MenuAction),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Menu selection, applied before the tick runs
    pub menu: Option<MenuAction>,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Fold one intent into this tick's input.
    ///
    /// Repeated movement or fire intents within a tick collapse into one;
    /// two pause toggles cancel out. The last menu selection wins.
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.move_left = true,
            Intent::MoveRight => self.move_right = true,
            Intent::Fire => self.fire = true,
            Intent::TogglePause => self.pause = !self.pause,
            Intent::MenuSelect(action) => self.menu = Some(action),
        }
    }
}

/// Cloneable producer side of the input queue
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<Intent>,
}

impl InputSender {
    /// Queue an intent. Silently dropped once the game is gone.
    pub fn send(&self, intent: Intent) {
        if self.tx.send(intent).is_err() {
            log::debug!("Input dropped, game no longer running: {:?}", intent);
        }
    }
}

/// Consumer side, owned by the driver
#[derive(Debug)]
pub struct InputQueue {
    rx: Receiver<Intent>,
}

impl InputQueue {
    pub fn channel() -> (InputSender, InputQueue) {
        let (tx, rx) = mpsc::channel();
        (InputSender { tx }, InputQueue { rx })
    }

    /// Drain everything queued so far into a single tick input
    pub fn drain(&self) -> TickInput {
        let mut input = TickInput::default();
        for intent in self.rx.try_iter() {
            input.apply(intent);
        }
        input
    }
}
