//! Practice-mode checkpoints
//!
//! A checkpoint is a deep copy of everything that changes during a run. The
//! store is a plain stack: capture pushes, undo pops, restore peeks.

use serde::{Deserialize, Serialize};

use super::events::{EventQueue, GameEvent};
use super::state::{Player, RunCounters, TriggerFlags};

/// Snapshot of the mutable run state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub player: Player,
    pub triggers: TriggerFlags,
    pub counters: RunCounters,
}

impl Checkpoint {
    pub fn new(player: &Player, triggers: &TriggerFlags, counters: &RunCounters) -> Self {
        Self {
            player: player.clone(),
            triggers: triggers.clone(),
            counters: counters.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckpointStore {
    stack: Vec<Checkpoint>,
}

impl CheckpointStore {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a snapshot and announce the new depth
    pub fn capture(&mut self, checkpoint: Checkpoint, events: &mut EventQueue) -> usize {
        self.stack.push(checkpoint);
        let depth = self.stack.len();
        events.push(GameEvent::CheckpointCaptured { depth });
        depth
    }

    /// Most recent snapshot
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.stack.last()
    }

    /// Drop the most recent snapshot
    pub fn undo(&mut self) -> Option<Checkpoint> {
        self.stack.pop()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
