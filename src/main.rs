//! Portal Dash headless runner
//!
//! Loads a level, drives the simulation with a scripted input pattern at the
//! baseline rate and logs the event stream. Useful for checking level layouts
//! without a renderer.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use portal_dash::consts::BASELINE_DT;
    use portal_dash::sim::{GameEvent, Simulation, TickInput};
    use portal_dash::{Level, Tuning};

    /// Capture a practice checkpoint this often (while grounded)
    const CHECKPOINT_EVERY: u64 = 240;
    const MAX_DEATHS: u32 = 10;

    /// Run a level headless with scripted input and log what happens.
    #[derive(Clone, Debug, Parser)]
    #[command(name = "portal-dash", version)]
    struct Args {
        /// Level description (JSON).
        level: PathBuf,

        /// Number of baseline (60 Hz) steps to simulate.
        #[arg(default_value_t = 1200)]
        steps: u64,

        /// Physics tuning file (JSON); missing fields keep their defaults.
        #[arg(long, value_name = "FILE")]
        tuning: Option<PathBuf>,
    }

    /// Tap every half second, hold for a quarter second every four seconds
    fn scripted_input(step: u64) -> TickInput {
        TickInput {
            jump_held: step % 30 < 2,
            pointer_held: step % 240 >= 200 && step % 240 < 215,
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        let level = Level::load(&args.level)
            .with_context(|| format!("failed to load level {}", args.level.display()))?;
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("failed to load tuning {}", path.display()))?,
            None => Tuning::default(),
        };

        let mut sim = Simulation::new(level, tuning);
        let mut deaths = 0;
        let mut finished = false;

        for step in 0..args.steps {
            sim.step(&scripted_input(step), BASELINE_DT)?;
            if step > 0 && step % CHECKPOINT_EVERY == 0 && sim.player().on_surface {
                sim.capture_checkpoint();
            }

            for event in sim.drain_events() {
                match event {
                    GameEvent::DeadlyCollision {
                        position,
                        mode,
                        section_elapsed,
                        obstacle,
                    } => {
                        deaths += 1;
                        log::warn!(
                            "Died on obstacle {} as {} at {:?} ({:.2}s into section)",
                            obstacle,
                            mode,
                            position,
                            section_elapsed
                        );
                        if !sim.restore_checkpoint() {
                            sim.restart();
                        }
                    }
                    GameEvent::ModeSwitched { from, to } => {
                        log::info!("Mode {} -> {}", from, to);
                    }
                    GameEvent::LevelFinished => finished = true,
                    GameEvent::CheckpointCaptured { depth } => {
                        log::debug!("Checkpoint depth {}", depth);
                    }
                }
            }

            if finished || deaths >= MAX_DEATHS {
                break;
            }
        }

        let pose = sim.pose();
        let counters = sim.counters();
        println!(
            "{}: {} after {} steps ({:.2}s), x={:.1}, mode={}, jumps={}, flips={}, deaths={}",
            sim.level().name,
            if finished { "finished" } else { "stopped" },
            counters.steps,
            counters.elapsed,
            pose.pos.x,
            pose.mode,
            counters.jumps,
            counters.gravity_flips,
            deaths
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Portal Dash (headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Simulation` directly; nothing to run here
}
