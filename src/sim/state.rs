//! Simulation entities and run state
//!
//! Everything a checkpoint must capture lives in `Player`, `TriggerFlags` and
//! `RunCounters`. Obstacles and portals are read-only descriptors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Player movement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cube,
    Ball,
    Ship,
    Wave,
    Spider,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Cube, Mode::Ball, Mode::Ship, Mode::Wave, Mode::Spider];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cube => "cube",
            Mode::Ball => "ball",
            Mode::Ship => "ship",
            Mode::Wave => "wave",
            Mode::Spider => "spider",
        }
    }

    /// Player footprint in this mode
    pub fn size(&self) -> Vec2 {
        match self {
            Mode::Cube => Vec2::new(40.0, 40.0),
            Mode::Ball => Vec2::new(40.0, 40.0),
            Mode::Ship => Vec2::new(50.0, 30.0),
            Mode::Wave => Vec2::new(30.0, 30.0),
            Mode::Spider => Vec2::new(40.0, 36.0),
        }
    }

    /// Flight modes are recentred vertically whenever they are entered
    pub fn is_flight(&self) -> bool {
        matches!(self, Mode::Ship | Mode::Wave)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction gravity pulls the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gravity {
    /// Toward the floor (+1)
    #[default]
    Down,
    /// Toward the ceiling (-1)
    Up,
}

impl Gravity {
    /// +1 for down, -1 for up
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Gravity::Down => 1.0,
            Gravity::Up => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Gravity::Down => Gravity::Up,
            Gravity::Up => Gravity::Down,
        }
    }
}

/// Per-mode dynamic state. Only the active variant exists, so velocities of
/// inactive modes cannot be integrated by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModeState {
    Cube {
        vy: f32,
        /// Baseline steps since the last jump (rate limit)
        since_jump: f32,
    },
    Ball {
        vy: f32,
    },
    Ship {
        vy: f32,
    },
    Wave {
        /// Horizontal component is the wave's own forward speed
        velocity: Vec2,
    },
    Spider {
        /// Visual flip flash, 1.0 right after a flip, decays to 0
        flash: f32,
    },
}

impl ModeState {
    /// Fresh state for a mode being entered
    pub fn enter(mode: Mode) -> Self {
        match mode {
            Mode::Cube => ModeState::Cube {
                vy: 0.0,
                since_jump: f32::MAX,
            },
            Mode::Ball => ModeState::Ball { vy: 0.0 },
            Mode::Ship => ModeState::Ship { vy: 0.0 },
            Mode::Wave => ModeState::Wave {
                velocity: Vec2::ZERO,
            },
            Mode::Spider => ModeState::Spider { flash: 0.0 },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            ModeState::Cube { .. } => Mode::Cube,
            ModeState::Ball { .. } => Mode::Ball,
            ModeState::Ship { .. } => Mode::Ship,
            ModeState::Wave { .. } => Mode::Wave,
            ModeState::Spider { .. } => Mode::Spider,
        }
    }

    /// Vertical velocity of the active mode (spider moves discretely: 0)
    pub fn vertical_velocity(&self) -> f32 {
        match *self {
            ModeState::Cube { vy, .. } | ModeState::Ball { vy } | ModeState::Ship { vy } => vy,
            ModeState::Wave { velocity } => velocity.y,
            ModeState::Spider { .. } => 0.0,
        }
    }

    pub fn set_vertical_velocity(&mut self, value: f32) {
        match self {
            ModeState::Cube { vy, .. } | ModeState::Ball { vy } | ModeState::Ship { vy } => {
                *vy = value
            }
            ModeState::Wave { velocity } => velocity.y = value,
            ModeState::Spider { .. } => {}
        }
    }
}

/// Mode-independent placement of the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Top-left corner
    pub pos: Vec2,
    /// Position at the start of the current step
    pub prev_pos: Vec2,
    pub size: Vec2,
    /// Visual rotation in degrees (never used for collision)
    pub rotation: f32,
}

impl Pose {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn prev_rect(&self) -> Rect {
        Rect {
            pos: self.prev_pos,
            size: self.size,
        }
    }
}

/// The player entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pose: Pose,
    pub state: ModeState,
    pub gravity: Gravity,
    /// Touching the surface gravity points at (set by the resolver each step)
    pub on_surface: bool,
    /// Gravity toggle may fire; cleared by a flip, set again by a fresh contact
    pub gravity_armed: bool,
    /// Combined input from the previous step (edge detection)
    pub input_was_held: bool,
}

impl Player {
    pub fn new(spawn: Vec2, mode: Mode) -> Self {
        Self {
            pose: Pose {
                pos: spawn,
                prev_pos: spawn,
                size: mode.size(),
                rotation: 0.0,
            },
            state: ModeState::enter(mode),
            gravity: Gravity::Down,
            on_surface: false,
            gravity_armed: true,
            input_was_held: false,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// Full (un-inset) body rectangle
    pub fn body(&self) -> Rect {
        self.pose.rect()
    }
}

/// Spike orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpikeDir {
    /// Apex at the top, base on the bottom
    Up,
    /// Apex at the bottom, base on the top
    Down,
}

/// Slope variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeKind {
    ShallowUp,
    ShallowDown,
    SteepUp,
    SteepDown,
}

/// Obstacle shape and behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObstacleKind {
    Spike { dir: SpikeDir },
    Platform,
    BoostPad,
    Slope { kind: SlopeKind },
    Wall,
}

impl ObstacleKind {
    pub fn is_lethal(&self) -> bool {
        matches!(
            self,
            ObstacleKind::Spike { .. } | ObstacleKind::Slope { .. } | ObstacleKind::Wall
        )
    }
}

/// Immutable obstacle descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
    /// Rotation in degrees about the rectangle centre
    #[serde(default)]
    pub rotation: Option<f32>,
    /// Only collides while the player is in this mode
    #[serde(default)]
    pub mode: Option<Mode>,
}

impl Obstacle {
    pub fn new(rect: Rect, kind: ObstacleKind) -> Self {
        Self {
            rect,
            kind,
            rotation: None,
            mode: None,
        }
    }

    #[must_use]
    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    #[must_use]
    pub fn only_in(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Whether this obstacle participates while the player is in `mode`
    pub fn applies_to(&self, mode: Mode) -> bool {
        self.mode.is_none_or(|m| m == mode)
    }
}

/// Mode-transition trigger region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub rect: Rect,
    pub target: Mode,
}

impl Portal {
    pub fn new(rect: Rect, target: Mode) -> Self {
        Self { rect, target }
    }
}

/// One-shot trigger state for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerFlags {
    /// Indexed like the level's portals
    pub portals: Vec<bool>,
    /// Indexed like the level's obstacles (only boost pads are ever set)
    pub boosts: Vec<bool>,
    pub finish: bool,
}

impl TriggerFlags {
    pub fn new(portal_count: usize, obstacle_count: usize) -> Self {
        Self {
            portals: vec![false; portal_count],
            boosts: vec![false; obstacle_count],
            finish: false,
        }
    }
}

/// Vertical playfield limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub ceiling: f32,
    /// Top of the ground band
    pub floor: f32,
}

impl Bounds {
    pub fn new(ceiling: f32, floor: f32) -> Self {
        Self { ceiling, floor }
    }

    /// Top y that centres a body of `height` between ceiling and floor
    pub fn centered_top(&self, height: f32) -> f32 {
        (self.ceiling + self.floor - height) * 0.5
    }

    /// Top y at which a body of `height` rests on the surface `gravity` points at
    pub fn resting_top(&self, height: f32, gravity: Gravity) -> f32 {
        match gravity {
            Gravity::Down => self.floor - height,
            Gravity::Up => self.ceiling,
        }
    }
}

/// Run bookkeeping captured with checkpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunCounters {
    pub steps: u64,
    /// Seconds since the run started
    pub elapsed: f32,
    /// Seconds since the last mode switch (or run start)
    pub section_elapsed: f32,
    pub jumps: u32,
    pub gravity_flips: u32,
}
