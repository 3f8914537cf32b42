//! Portal Dash - multi-mode physics core for a side-scrolling obstacle runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, mode switching, checkpoints)
//! - `level`: Read-only level descriptors and load-time validation
//! - `tuning`: Data-driven physics balance

pub mod level;
pub mod sim;
pub mod tuning;

pub use level::{Level, LevelError};
pub use tuning::{Tuning, TuningError};

/// Engine configuration constants
pub mod consts {
    /// Baseline simulation rate; all per-step tuning values are expressed at this rate
    pub const BASELINE_HZ: f32 = 60.0;
    /// Duration of one baseline step in seconds
    pub const BASELINE_DT: f32 = 1.0 / BASELINE_HZ;
    /// Largest step scale accepted per frame (host stalls are cut down to this)
    pub const MAX_STEP_SCALE: f32 = 2.0;

    /// Hitbox insets (units per side)
    pub const PLAYER_INSET: f32 = 4.0;
    pub const OBSTACLE_INSET: f32 = 3.0;
    pub const PLATFORM_INSET: f32 = 0.0;
    pub const SPIKE_INSET: f32 = 6.0;
    pub const SLOPE_INSET: f32 = 8.0;

    /// Steep slopes put their apex this far across the box
    pub const STEEP_APEX_FRACTION: f32 = 0.7;

    /// Slack for the leading-edge check (absorbs rounding from earlier snaps)
    pub const EDGE_TOLERANCE: f32 = 0.5;

    /// Spider flash below this counts as fully decayed
    pub const SETTLED_FLASH: f32 = 1e-6;

    /// Default level geometry
    pub const LEVEL_HEIGHT: f32 = 600.0;
    pub const GROUND_BAND: f32 = 90.0;
}

/// Convert a frame delta (seconds) into baseline steps.
///
/// Clamped to at most [`consts::MAX_STEP_SCALE`], never clamped from below.
#[inline]
pub fn step_scale(dt: f32) -> f32 {
    (dt / consts::BASELINE_DT).min(consts::MAX_STEP_SCALE)
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}
