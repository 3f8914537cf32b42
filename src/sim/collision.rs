//! Collision resolution
//!
//! Runs after the integrators. Clamps the player to the playfield, lands it
//! on platforms, fires boost pads and classifies lethal overlaps. Obstacles
//! are scanned in level order and the first lethal hit ends the scan, which
//! keeps outcomes reproducible.

use super::geometry::Rect;
use super::hitbox::{Hitbox, HitboxSource, player_hit_rect};
use super::kinematics::StepContext;
use super::state::{Bounds, Gravity, ModeState, Obstacle, ObstacleKind, Player};
use crate::consts::EDGE_TOLERANCE;
use crate::level::Level;

/// Outcome of one resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Index of the first lethal obstacle hit, if any
    pub deadly: Option<usize>,
    pub landed: bool,
    pub boosted: bool,
}

/// Which face of a surface the player met
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Top,
    Bottom,
}

impl Face {
    /// The face a falling player lands on
    fn toward(gravity: Gravity) -> Self {
        match gravity {
            Gravity::Down => Face::Top,
            Gravity::Up => Face::Bottom,
        }
    }
}

/// Resolve the player against the playfield and every applicable obstacle
pub fn resolve(
    player: &mut Player,
    level: &Level,
    boosts_used: &mut [bool],
    ctx: &StepContext<'_>,
) -> Resolution {
    let mut result = Resolution::default();
    player.on_surface = false;

    result.landed |= clamp_to_bounds(player, ctx.bounds);

    let mode = player.mode();
    for (index, obstacle) in level.obstacles.iter().enumerate() {
        if !obstacle.applies_to(mode) || !near(obstacle, &player.body()) {
            continue;
        }
        match obstacle.kind {
            ObstacleKind::Platform => {
                result.landed |= resolve_platform(player, &obstacle.hitbox());
            }
            ObstacleKind::BoostPad => {
                if boosts_used.get(index).copied().unwrap_or(true) {
                    continue;
                }
                if try_boost(player, &obstacle.hitbox(), ctx) {
                    boosts_used[index] = true;
                    result.boosted = true;
                    log::debug!("Boost pad {} fired in {} mode", index, mode);
                }
            }
            ObstacleKind::Spike { .. } | ObstacleKind::Slope { .. } | ObstacleKind::Wall => {
                if obstacle.hitbox().hits(&player_hit_rect(player)) {
                    log::debug!(
                        "Deadly collision with obstacle {} ({:?}) at {:?}",
                        index,
                        obstacle.kind,
                        player.pose.pos
                    );
                    result.deadly = Some(index);
                    return result;
                }
            }
        }
    }

    result
}

/// Cheap horizontal reject; rotated shapes stay inside their half-diagonal
fn near(obstacle: &Obstacle, body: &Rect) -> bool {
    let reach = obstacle.rect.size.length() * 0.5 + body.size.x * 0.5;
    (obstacle.rect.center().x - body.center().x).abs() <= reach
}

/// Mark a contact with the surface gravity points at
fn land(player: &mut Player) {
    player.on_surface = true;
    // A spider's contact only counts once its flip flash has settled
    let settling = matches!(player.state, ModeState::Spider { flash } if flash > 0.0);
    if !settling {
        player.gravity_armed = true;
    }
}

/// Keep the player between ceiling and floor.
///
/// Returns true if the player landed on a boundary.
pub fn clamp_to_bounds(player: &mut Player, bounds: Bounds) -> bool {
    let floor_top = bounds.floor - player.pose.size.y;
    let vy = player.state.vertical_velocity();
    let mut face = None;

    if player.pose.pos.y >= floor_top {
        player.pose.pos.y = floor_top;
        if vy > 0.0 {
            player.state.set_vertical_velocity(0.0);
        }
        face = Some(Face::Top);
    } else if player.pose.pos.y <= bounds.ceiling {
        player.pose.pos.y = bounds.ceiling;
        if vy < 0.0 {
            player.state.set_vertical_velocity(0.0);
        }
        face = Some(Face::Bottom);
    }

    if face == Some(Face::toward(player.gravity)) {
        land(player);
        true
    } else {
        false
    }
}

/// Which face the player came through, judged from the true previous position.
///
/// The surface is sampled along the columns the player covered last step (or
/// the current ones if it was still beside the shape), so slanted edges of
/// rotated shapes count where they actually are.
fn leading_face(player: &Player, hitbox: &Hitbox) -> Option<Face> {
    let prev = player.pose.prev_rect();
    let body = player.body();
    let (top, bottom) = hitbox
        .column_extent(prev.left(), prev.right())
        .or_else(|| hitbox.column_extent(body.left(), body.right()))?;
    let vy = player.state.vertical_velocity();
    if vy >= 0.0 && prev.bottom() <= top + EDGE_TOLERANCE {
        Some(Face::Top)
    } else if vy <= 0.0 && prev.top() >= bottom - EDGE_TOLERANCE {
        Some(Face::Bottom)
    } else {
        None
    }
}

/// Snap onto (or under) a solid platform approached from above (or below).
///
/// The snap follows the shape's edge under the player's current columns.
/// Returns true if this counted as landing. Overlap without a confirmed
/// approach direction is ignored.
pub fn resolve_platform(player: &mut Player, hitbox: &Hitbox) -> bool {
    let body = player.body();
    if !hitbox.hits(&body) {
        return false;
    }
    let Some(face) = leading_face(player, hitbox) else {
        return false;
    };
    let Some((top, bottom)) = hitbox.column_extent(body.left(), body.right()) else {
        return false;
    };

    player.pose.pos.y = match face {
        Face::Top => top - player.pose.size.y,
        Face::Bottom => bottom,
    };
    player.state.set_vertical_velocity(0.0);

    if face == Face::toward(player.gravity) {
        land(player);
        true
    } else {
        false
    }
}

/// Launch the player if it meets the pad on the face gravity points at.
///
/// Returns true if the pad fired (and should be marked used).
pub fn try_boost(player: &mut Player, hitbox: &Hitbox, ctx: &StepContext<'_>) -> bool {
    if !hitbox.hits(&player.body()) {
        return false;
    }
    if leading_face(player, hitbox) != Some(Face::toward(player.gravity)) {
        return false;
    }

    let tuning = ctx.tuning;
    let sign = player.gravity.sign();
    match &mut player.state {
        ModeState::Cube { vy, .. } => *vy = -tuning.boost_cube * sign,
        ModeState::Ball { vy } => *vy = -tuning.boost_ball * sign,
        ModeState::Ship { vy } => *vy = -tuning.boost_ship * sign,
        ModeState::Spider { flash } => {
            *flash = 1.0;
            player.gravity = player.gravity.flipped();
            player.gravity_armed = false;
        }
        // Wave velocity is dictated by input every step
        ModeState::Wave { .. } => return false,
    }
    player.on_surface = false;
    true
}
