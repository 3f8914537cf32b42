//! Per-mode integrators
//!
//! Each mode owns its motion law. Integrators only move the player; they never
//! change the active mode (portals do that) and never look at obstacles (the
//! resolver does that afterwards).

use super::state::{Bounds, Gravity, ModeState, Player};
use crate::consts::SETTLED_FLASH;
use crate::normalize_degrees;
use crate::tuning::Tuning;

/// Everything an integrator needs besides the player
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub tuning: &'a Tuning,
    pub bounds: Bounds,
    /// Frame length in baseline steps
    pub scale: f32,
}

/// Discrete things that happened while integrating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    pub jumped: bool,
    pub flipped: bool,
}

/// Advance the active mode by one step
pub fn advance(player: &mut Player, held: bool, ctx: &StepContext<'_>) -> Motion {
    let tuning = ctx.tuning;
    let scale = ctx.scale;
    let pressed = held && !player.input_was_held;
    let mut motion = Motion::default();
    let mut forward = tuning.run_speed;

    match &mut player.state {
        ModeState::Cube { vy, since_jump } => {
            *since_jump += scale;
            let sign = player.gravity.sign();
            motion.jumped = cube_jump(vy, since_jump, player.on_surface, pressed, sign, tuning);
            fall(vy, tuning.gravity * sign, sign, ctx);
            player.pose.pos.y += *vy * scale;
        }
        ModeState::Ball { vy } => {
            if held && player.gravity_armed && player.on_surface {
                player.gravity = player.gravity.flipped();
                player.gravity_armed = false;
                player.on_surface = false;
                motion.flipped = true;
            }
            let sign = player.gravity.sign();
            fall(vy, tuning.gravity * tuning.ball_gravity_scale * sign, sign, ctx);
            player.pose.pos.y += *vy * scale;
        }
        ModeState::Ship { vy } => {
            let sign = player.gravity.sign();
            let max = tuning.ship_max_speed;
            *vy = if held {
                *vy - tuning.ship_lift * sign * scale
            } else {
                *vy + tuning.ship_fall * sign * scale
            }
            .clamp(-max, max);
            player.pose.pos.y += *vy * scale;
        }
        ModeState::Wave { velocity } => {
            let sign = player.gravity.sign();
            velocity.x = tuning.wave_speed;
            velocity.y = if held {
                -tuning.wave_speed * sign
            } else {
                tuning.wave_speed * sign
            };
            forward = velocity.x;
            player.pose.pos.y += velocity.y * scale;
        }
        ModeState::Spider { flash } => {
            *flash -= tuning.spider_flash_decay * scale;
            if *flash < SETTLED_FLASH {
                *flash = 0.0;
            }
            if held && player.gravity_armed {
                player.gravity = player.gravity.flipped();
                player.gravity_armed = false;
                *flash = 1.0;
                motion.flipped = true;
            }
            player.pose.pos.y = ctx.bounds.resting_top(player.pose.size.y, player.gravity);
        }
    }

    player.pose.pos.x += forward * scale;
    player.input_was_held = held;
    motion
}

/// Cube jump: grounded, fresh press, and the re-jump interval has elapsed.
///
/// Sets the impulse before gravity is integrated for the step.
pub fn cube_jump(
    vy: &mut f32,
    since_jump: &mut f32,
    on_surface: bool,
    pressed: bool,
    sign: f32,
    tuning: &Tuning,
) -> bool {
    if on_surface && pressed && *since_jump >= tuning.jump_interval {
        *vy = -tuning.jump_power * sign;
        *since_jump = 0.0;
        true
    } else {
        false
    }
}

/// Integrate gravity, limiting speed only in the direction gravity pulls
fn fall(vy: &mut f32, accel: f32, sign: f32, ctx: &StepContext<'_>) {
    *vy += accel * ctx.scale;
    let terminal = ctx.tuning.terminal_velocity;
    if *vy * sign > terminal {
        *vy = terminal * sign;
    }
}

/// Update the visual rotation once the step's contacts are known
pub fn update_rotation(player: &mut Player, ctx: &StepContext<'_>) {
    let sign = player.gravity.sign();
    let pose = &mut player.pose;
    pose.rotation = match player.state {
        ModeState::Cube { .. } => {
            if player.on_surface {
                normalize_degrees((pose.rotation / 90.0).round() * 90.0)
            } else {
                normalize_degrees(pose.rotation + ctx.tuning.cube_spin * sign * ctx.scale)
            }
        }
        ModeState::Ball { .. } => {
            let radius = (pose.size.x * 0.5).max(1.0);
            let roll = (ctx.tuning.run_speed / radius).to_degrees();
            normalize_degrees(pose.rotation + roll * sign * ctx.scale)
        }
        ModeState::Ship { vy } => (vy * 3.0).clamp(-45.0, 45.0),
        ModeState::Wave { velocity } => {
            if velocity.y < 0.0 {
                -45.0
            } else if velocity.y > 0.0 {
                45.0
            } else {
                0.0
            }
        }
        ModeState::Spider { .. } => match player.gravity {
            Gravity::Down => 0.0,
            Gravity::Up => 180.0,
        },
    };
}
