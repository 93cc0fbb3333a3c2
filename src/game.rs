//! Fixed timestep driver
//!
//! Turns variable frame times into whole simulation ticks and feeds each
//! tick the input queued since the previous one.

use crate::consts::{MAX_FRAME_SECS, MAX_SUBSTEPS};
use crate::error::Result;
use crate::sim::{InputQueue, InputSender, PhaseController, PhaseId, SharedSink, Snapshot};
use crate::tuning::Tuning;

/// Game instance holding the controller and its input queue
pub struct Game {
    controller: PhaseController,
    input: InputQueue,
    accumulator: f32,
    tick_secs: f32,
    /// Autopilot flag stamped onto every tick's input
    idle_mode: bool,
}

impl Game {
    /// Returns the game and a sender for feeding it intents
    pub fn new(tuning: Tuning, seed: u64, sink: SharedSink) -> Result<(Self, InputSender)> {
        let (tx, input) = InputQueue::channel();
        let tick_secs = tuning.tick_secs();
        let game = Self {
            controller: PhaseController::new(tuning, seed, sink)?,
            input,
            accumulator: 0.0,
            tick_secs,
            idle_mode: false,
        };
        Ok((game, tx))
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PhaseController {
        &mut self.controller
    }

    pub fn phase(&self) -> PhaseId {
        self.controller.phase()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.controller.snapshot()
    }

    /// Run exactly one tick with whatever input is queued
    pub fn step(&mut self) -> PhaseId {
        let mut input = self.input.drain();
        input.idle_mode = self.idle_mode;
        self.controller.tick(&input)
    }

    /// Advance by a frame's worth of wall time. Returns the ticks run.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let dt = dt.min(MAX_FRAME_SECS);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.tick_secs && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= self.tick_secs;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.tick_secs);
        }
        substeps
    }
}
