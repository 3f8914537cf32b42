//! Per-frame simulation step
//!
//! Orders the subsystems for one frame: integrate the active mode, resolve
//! collisions, then (unless the step was deadly) fire portals and the finish
//! line. Everything that mutates lives on `Simulation`.

use glam::Vec2;
use thiserror::Error;

use super::checkpoint::{Checkpoint, CheckpointStore};
use super::collision;
use super::events::{EventQueue, GameEvent};
use super::kinematics::{self, StepContext};
use super::state::{Gravity, Mode, ModeState, Player, RunCounters, TriggerFlags};
use super::transition;
use crate::level::Level;
use crate::step_scale;
use crate::tuning::Tuning;

/// Input sampled for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump key (space / up arrow)
    pub jump_held: bool,
    /// Mouse button or touch
    pub pointer_held: bool,
}

impl TickInput {
    /// Both sources collapse into a single "held" signal
    #[inline]
    pub fn held(&self) -> bool {
        self.jump_held || self.pointer_held
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error("frame delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),
}

/// What the presentation layer needs to draw the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseView {
    pub pos: Vec2,
    pub size: Vec2,
    pub mode: Mode,
    /// Degrees
    pub rotation: f32,
    pub gravity: Gravity,
    /// Spider flip flash (0 for other modes)
    pub flash: f32,
}

/// A single run through a level
#[derive(Debug, Clone)]
pub struct Simulation {
    level: Level,
    tuning: Tuning,
    player: Player,
    triggers: TriggerFlags,
    counters: RunCounters,
    checkpoints: CheckpointStore,
    events: EventQueue,
}

impl Simulation {
    /// Start a run at the level's spawn point
    pub fn new(level: Level, tuning: Tuning) -> Self {
        let player = Player::new(level.spawn_point(), level.start_mode);
        let triggers = TriggerFlags::new(level.portals.len(), level.obstacles.len());
        log::info!(
            "Starting '{}' in {} mode at {:?}",
            level.name,
            level.start_mode,
            player.pose.pos
        );
        Self {
            level,
            tuning,
            player,
            triggers,
            counters: RunCounters::default(),
            checkpoints: CheckpointStore::new(),
            events: EventQueue::new(),
        }
    }

    /// Advance the run by `dt` seconds
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Result<(), StepError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(StepError::InvalidDelta(dt));
        }

        let ctx = StepContext {
            tuning: &self.tuning,
            bounds: self.level.bounds(),
            scale: step_scale(dt),
        };

        self.player.pose.prev_pos = self.player.pose.pos;
        let motion = kinematics::advance(&mut self.player, input.held(), &ctx);
        if motion.jumped {
            self.counters.jumps += 1;
        }
        if motion.flipped {
            self.counters.gravity_flips += 1;
        }

        self.counters.steps += 1;
        self.counters.elapsed += dt;
        self.counters.section_elapsed += dt;

        let resolution =
            collision::resolve(&mut self.player, &self.level, &mut self.triggers.boosts, &ctx);

        if let Some(obstacle) = resolution.deadly {
            self.events.push(GameEvent::DeadlyCollision {
                position: self.player.pose.pos,
                mode: self.player.mode(),
                section_elapsed: self.counters.section_elapsed,
                obstacle,
            });
        } else {
            transition::apply_portals(
                &mut self.player,
                &self.level,
                &mut self.triggers,
                &mut self.counters,
                &mut self.events,
            );
            transition::check_finish(&self.player, &self.level, &mut self.triggers, &mut self.events);
        }

        kinematics::update_rotation(&mut self.player, &ctx);

        log::trace!(
            "step {}: {} at {:?} vy={} surface={}",
            self.counters.steps,
            self.player.mode(),
            self.player.pose.pos,
            self.player.state.vertical_velocity(),
            self.player.on_surface
        );
        Ok(())
    }

    /// Store the current run state on the checkpoint stack
    pub fn capture_checkpoint(&mut self) -> usize {
        let checkpoint = Checkpoint::new(&self.player, &self.triggers, &self.counters);
        let depth = self.checkpoints.capture(checkpoint, &mut self.events);
        log::info!("Checkpoint {} captured at {:?}", depth, self.player.pose.pos);
        depth
    }

    /// Return to the latest checkpoint; false if there is none
    pub fn restore_checkpoint(&mut self) -> bool {
        let Some(checkpoint) = self.checkpoints.latest() else {
            return false;
        };
        let Checkpoint {
            player,
            triggers,
            counters,
        } = checkpoint.clone();
        self.player = player;
        self.triggers = triggers;
        self.counters = counters;
        log::info!(
            "Restored checkpoint {} at {:?}",
            self.checkpoints.len(),
            self.player.pose.pos
        );
        true
    }

    /// Discard the latest checkpoint
    pub fn undo_checkpoint(&mut self) -> bool {
        let removed = self.checkpoints.undo().is_some();
        if removed {
            log::info!("Checkpoint removed, {} left", self.checkpoints.len());
        }
        removed
    }

    /// Back to the spawn point with fresh triggers and no checkpoints
    pub fn restart(&mut self) {
        self.player = Player::new(self.level.spawn_point(), self.level.start_mode);
        self.triggers = TriggerFlags::new(self.level.portals.len(), self.level.obstacles.len());
        self.counters = RunCounters::default();
        self.checkpoints.clear();
        log::info!("Restarted '{}'", self.level.name);
    }

    pub fn pose(&self) -> PoseView {
        let flash = match self.player.state {
            ModeState::Spider { flash } => flash,
            _ => 0.0,
        };
        PoseView {
            pos: self.player.pose.pos,
            size: self.player.pose.size,
            mode: self.player.mode(),
            rotation: self.player.pose.rotation,
            gravity: self.player.gravity,
            flash,
        }
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        self.events.pending()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn triggers(&self) -> &TriggerFlags {
        &self.triggers
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASELINE_DT;
    use crate::sim::geometry::Rect;
    use crate::sim::state::{Obstacle, ObstacleKind, Portal};

    const HOLD: TickInput = TickInput {
        jump_held: true,
        pointer_held: false,
    };
    const IDLE: TickInput = TickInput {
        jump_held: false,
        pointer_held: false,
    };

    fn sim(level: Level) -> Simulation {
        Simulation::new(level, Tuning::default())
    }

    /// Press for three steps out of every twenty
    fn scripted(step: usize) -> TickInput {
        if step % 20 < 3 { HOLD } else { IDLE }
    }

    fn run(sim: &mut Simulation, steps: usize) {
        for i in 0..steps {
            sim.step(&scripted(i), BASELINE_DT).unwrap();
        }
    }

    fn busy_level() -> Level {
        Level::new(3000.0)
            .with_obstacle(Obstacle::new(
                Rect::new(300.0, 430.0, 200.0, 20.0),
                ObstacleKind::Platform,
            ))
            .with_obstacle(Obstacle::new(
                Rect::new(700.0, 490.0, 40.0, 20.0),
                ObstacleKind::BoostPad,
            ))
            .with_portal(Portal::new(Rect::new(900.0, 0.0, 40.0, 510.0), Mode::Ball))
            .with_portal(Portal::new(Rect::new(1400.0, 0.0, 40.0, 510.0), Mode::Wave))
    }

    #[test]
    fn test_held_combines_sources() {
        assert!(!IDLE.held());
        assert!(HOLD.held());
        let pointer = TickInput {
            pointer_held: true,
            ..Default::default()
        };
        assert!(pointer.held());
    }

    #[test]
    fn test_spawn_rests_on_floor() {
        let mut sim = sim(Level::new(1000.0));
        sim.step(&IDLE, BASELINE_DT).unwrap();
        assert_eq!(sim.player().pose.pos, Vec2::new(6.0, 470.0));
        assert!(sim.player().on_surface);
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_rejects_invalid_delta() {
        let mut sim = sim(Level::new(1000.0));
        let before = sim.player().clone();
        assert_eq!(sim.step(&HOLD, -0.1), Err(StepError::InvalidDelta(-0.1)));
        assert!(matches!(sim.step(&HOLD, f32::NAN), Err(StepError::InvalidDelta(_))));
        assert!(sim.step(&HOLD, f32::INFINITY).is_err());
        assert_eq!(sim.player(), &before);
        assert_eq!(sim.counters().steps, 0);

        // Zero is a legal (empty) frame
        assert!(sim.step(&IDLE, 0.0).is_ok());
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut sim = sim(Level::new(1000.0));
        sim.step(&IDLE, 1.0).unwrap();
        assert_eq!(sim.player().pose.pos.x, 2.0 * sim.tuning().run_speed);
    }

    #[test]
    fn test_identical_inputs_identical_runs() {
        let mut a = sim(busy_level());
        let mut b = sim(busy_level());
        for i in 0..400 {
            a.step(&scripted(i), BASELINE_DT).unwrap();
            b.step(&scripted(i), BASELINE_DT).unwrap();
            assert_eq!(a.player(), b.player());
        }
        assert_eq!(a.triggers(), b.triggers());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_portal_passed_once_switches_once() {
        let level = Level::new(5000.0)
            .with_portal(Portal::new(Rect::new(100.0, 0.0, 40.0, 510.0), Mode::Ship));
        let mut sim = sim(level);
        for _ in 0..40 {
            sim.step(&IDLE, BASELINE_DT).unwrap();
        }
        let switches: Vec<_> = sim
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ModeSwitched { .. }))
            .collect();
        assert_eq!(
            switches,
            vec![GameEvent::ModeSwitched {
                from: Mode::Cube,
                to: Mode::Ship
            }]
        );
        assert_eq!(sim.pose().mode, Mode::Ship);
        assert_eq!(sim.pose().size, Mode::Ship.size());
    }

    #[test]
    fn test_deadly_step_skips_portals() {
        let level = Level::new(5000.0)
            .with_obstacle(Obstacle::new(
                Rect::new(97.0, 430.0, 40.0, 80.0),
                ObstacleKind::Wall,
            ))
            .with_portal(Portal::new(Rect::new(100.0, 0.0, 40.0, 510.0), Mode::Ship));
        let mut sim = sim(level);

        let mut deadly = None;
        for _ in 0..20 {
            sim.step(&IDLE, BASELINE_DT).unwrap();
            let events = sim.drain_events();
            if let Some(event) = events.iter().find(|e| e.is_deadly()) {
                assert_eq!(events.len(), 1);
                deadly = Some(event.clone());
                break;
            }
        }

        let Some(GameEvent::DeadlyCollision {
            mode,
            obstacle,
            section_elapsed,
            ..
        }) = deadly
        else {
            panic!("expected a deadly collision");
        };
        assert_eq!(mode, Mode::Cube);
        assert_eq!(obstacle, 0);
        assert!(section_elapsed > 0.0);
        assert_eq!(sim.triggers().portals, vec![false]);
        assert_eq!(sim.counters().steps, 11);
    }

    #[test]
    fn test_finish_emitted_once() {
        let mut sim = sim(Level::new(30.0));
        for _ in 0..20 {
            sim.step(&IDLE, BASELINE_DT).unwrap();
        }
        let finishes = sim
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::LevelFinished)
            .count();
        assert_eq!(finishes, 1);
        assert!(sim.triggers().finish);
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let mut sim = sim(busy_level());
        assert!(!sim.restore_checkpoint());

        run(&mut sim, 120);
        assert_eq!(sim.capture_checkpoint(), 1);
        let player = sim.player().clone();
        let triggers = sim.triggers().clone();
        let counters = sim.counters().clone();

        run(&mut sim, 300);
        assert_ne!(sim.player(), &player);

        assert!(sim.restore_checkpoint());
        assert_eq!(sim.player(), &player);
        assert_eq!(sim.triggers(), &triggers);
        assert_eq!(sim.counters(), &counters);
        assert!(
            sim.drain_events()
                .contains(&GameEvent::CheckpointCaptured { depth: 1 })
        );

        // Restoring does not consume the checkpoint
        assert!(sim.restore_checkpoint());
        assert!(sim.undo_checkpoint());
        assert!(!sim.restore_checkpoint());
    }

    #[test]
    fn test_restart_resets_run() {
        let mut sim = sim(busy_level());
        run(&mut sim, 200);
        sim.capture_checkpoint();
        sim.restart();

        let fresh = Player::new(sim.level().spawn_point(), Mode::Cube);
        assert_eq!(sim.player(), &fresh);
        assert_eq!(sim.counters(), &RunCounters::default());
        assert!(sim.triggers().portals.iter().all(|used| !used));
        assert!(sim.checkpoints().is_empty());
    }

    #[test]
    fn test_jumps_and_flips_are_counted() {
        let level = Level::new(5000.0)
            .with_portal(Portal::new(Rect::new(200.0, 0.0, 40.0, 510.0), Mode::Ball));
        let mut sim = sim(level);
        // Cube jumps on the first press
        sim.step(&IDLE, BASELINE_DT).unwrap();
        sim.step(&HOLD, BASELINE_DT).unwrap();
        assert_eq!(sim.counters().jumps, 1);

        for _ in 0..60 {
            sim.step(&IDLE, BASELINE_DT).unwrap();
        }
        assert_eq!(sim.pose().mode, Mode::Ball);
        sim.step(&IDLE, BASELINE_DT).unwrap();
        sim.step(&HOLD, BASELINE_DT).unwrap();
        assert_eq!(sim.counters().gravity_flips, 1);
        assert_eq!(sim.pose().gravity, Gravity::Up);
    }
}
