//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must stay pure and
//! deterministic:
//! - Per-step scale derived from the frame delta, nothing else
//! - Stable obstacle and portal order (level order)
//! - No rendering, audio or platform dependencies

pub mod checkpoint;
pub mod collision;
pub mod events;
pub mod geometry;
pub mod hitbox;
pub mod kinematics;
pub mod state;
pub mod tick;
pub mod transition;

pub use checkpoint::{Checkpoint, CheckpointStore};
pub use collision::{Resolution, resolve};
pub use events::{EventQueue, GameEvent};
pub use geometry::{
    Rect, aabb_overlap, column_extent, convex_overlap, point_in_convex_quad, point_in_triangle,
    rotate_point,
};
pub use hitbox::{Hitbox, HitboxSource};
pub use kinematics::{Motion, StepContext};
pub use state::{
    Bounds, Gravity, Mode, ModeState, Obstacle, ObstacleKind, Player, Portal, Pose, RunCounters,
    SlopeKind, SpikeDir, TriggerFlags,
};
pub use tick::{PoseView, Simulation, StepError, TickInput};
