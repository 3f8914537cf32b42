//! Simulation events
//!
//! The physics core never plays sounds or decides what a death means; it
//! queues typed events and the caller drains them once per step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Mode;

/// Something observers may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player overlapped a lethal shape
    DeadlyCollision {
        position: Vec2,
        mode: Mode,
        /// Seconds spent in the current section when the hit happened
        section_elapsed: f32,
        /// Index of the obstacle that won the scan
        obstacle: usize,
    },
    /// A portal swapped the active mode
    ModeSwitched { from: Mode, to: Mode },
    /// The finish line was crossed for the first time this run
    LevelFinished,
    /// A practice checkpoint was stored
    CheckpointCaptured {
        /// Number of checkpoints on the stack after the capture
        depth: usize,
    },
}

impl GameEvent {
    pub fn is_deadly(&self) -> bool {
        matches!(self, GameEvent::DeadlyCollision { .. })
    }
}

/// FIFO of events produced since the last drain
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events in emission order, without consuming them
    pub fn pending(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
