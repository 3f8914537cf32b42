//! Mode transitions
//!
//! Portals are the only way the active mode changes. Each portal fires once per
//! run; the finish line is a one-shot trigger of the same kind.

use super::events::{EventQueue, GameEvent};
use super::geometry::aabb_overlap;
use super::hitbox::player_hit_rect;
use super::state::{Bounds, Gravity, Mode, ModeState, Player, RunCounters, TriggerFlags};
use crate::level::Level;

/// Swap the player into `to`, resetting everything mode-specific.
///
/// The body keeps its bottom edge unless the new mode flies, in which case it
/// is recentred between ceiling and floor.
pub fn switch_mode(player: &mut Player, to: Mode, bounds: Bounds) {
    let size = to.size();
    let bottom = player.pose.pos.y + player.pose.size.y;

    player.state = ModeState::enter(to);
    player.gravity = Gravity::Down;
    player.gravity_armed = true;
    player.on_surface = false;
    player.pose.size = size;
    player.pose.pos.y = if to.is_flight() {
        bounds.centered_top(size.y)
    } else {
        bottom - size.y
    };
    player.pose.rotation = 0.0;
}

/// Fire every unused portal the player overlaps, in level order.
///
/// Returns the number of portals fired.
pub fn apply_portals(
    player: &mut Player,
    level: &Level,
    flags: &mut TriggerFlags,
    counters: &mut RunCounters,
    events: &mut EventQueue,
) -> usize {
    let bounds = level.bounds();
    let mut fired = 0;

    for (index, portal) in level.portals.iter().enumerate() {
        let Some(used) = flags.portals.get_mut(index) else {
            break;
        };
        if *used || !aabb_overlap(&player_hit_rect(player), &portal.rect) {
            continue;
        }
        *used = true;

        let from = player.mode();
        switch_mode(player, portal.target, bounds);
        counters.section_elapsed = 0.0;
        events.push(GameEvent::ModeSwitched {
            from,
            to: portal.target,
        });
        log::debug!("Portal {} switched mode {} -> {}", index, from, portal.target);
        fired += 1;
    }

    fired
}

/// Emit `LevelFinished` the first time the player reaches the finish line
pub fn check_finish(
    player: &Player,
    level: &Level,
    flags: &mut TriggerFlags,
    events: &mut EventQueue,
) -> bool {
    if flags.finish || player.pose.pos.x < level.finish_x {
        return false;
    }
    flags.finish = true;
    events.push(GameEvent::LevelFinished);
    log::info!("Level '{}' finished at x={}", level.name, player.pose.pos.x);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use crate::sim::state::Portal;
    use glam::Vec2;

    fn level_with_portals(portals: &[(f32, Mode)]) -> Level {
        portals.iter().fold(Level::new(5000.0), |level, (x, mode)| {
            level.with_portal(Portal::new(Rect::new(*x, 0.0, 40.0, 510.0), *mode))
        })
    }

    fn run(level: &Level) -> (TriggerFlags, RunCounters, EventQueue) {
        (
            TriggerFlags::new(level.portals.len(), level.obstacles.len()),
            RunCounters::default(),
            EventQueue::new(),
        )
    }

    #[test]
    fn test_same_portal_fires_once() {
        let level = level_with_portals(&[(100.0, Mode::Ship)]);
        let (mut flags, mut counters, mut events) = run(&level);
        let mut player = Player::new(Vec2::new(90.0, 470.0), Mode::Cube);

        assert_eq!(apply_portals(&mut player, &level, &mut flags, &mut counters, &mut events), 1);
        assert_eq!(apply_portals(&mut player, &level, &mut flags, &mut counters, &mut events), 0);
        assert_eq!(
            events.drain(),
            vec![GameEvent::ModeSwitched {
                from: Mode::Cube,
                to: Mode::Ship
            }]
        );
        assert_eq!(flags.portals, vec![true]);
    }

    #[test]
    fn test_switch_resets_mode_state() {
        let bounds = Bounds::new(0.0, 510.0);
        let mut player = Player::new(Vec2::new(0.0, 200.0), Mode::Ball);
        player.state = ModeState::Ball { vy: 9.0 };
        player.gravity = Gravity::Up;
        player.gravity_armed = false;

        switch_mode(&mut player, Mode::Ball, bounds);
        assert_eq!(player.state, ModeState::Ball { vy: 0.0 });
        assert_eq!(player.gravity, Gravity::Down);
        assert!(player.gravity_armed);
        assert_eq!(player.pose.pos.y, 200.0);
    }

    #[test]
    fn test_flight_modes_are_recentred() {
        let bounds = Bounds::new(0.0, 510.0);
        let mut player = Player::new(Vec2::new(0.0, 470.0), Mode::Cube);
        switch_mode(&mut player, Mode::Ship, bounds);
        assert_eq!(player.pose.size, Mode::Ship.size());
        assert_eq!(player.pose.pos.y, (510.0 - 30.0) * 0.5);

        // Ground modes keep the bottom edge
        let bottom = player.pose.pos.y + player.pose.size.y;
        switch_mode(&mut player, Mode::Spider, bounds);
        assert_eq!(player.pose.pos.y + player.pose.size.y, bottom);
    }

    #[test]
    fn test_same_mode_portal_still_emits() {
        let level = level_with_portals(&[(100.0, Mode::Cube)]);
        let (mut flags, mut counters, mut events) = run(&level);
        counters.section_elapsed = 3.0;
        let mut player = Player::new(Vec2::new(90.0, 470.0), Mode::Cube);
        apply_portals(&mut player, &level, &mut flags, &mut counters, &mut events);
        assert_eq!(
            events.pending(),
            &[GameEvent::ModeSwitched {
                from: Mode::Cube,
                to: Mode::Cube
            }]
        );
        assert_eq!(counters.section_elapsed, 0.0);
    }

    #[test]
    fn test_overlapping_portals_fire_in_order() {
        let level = level_with_portals(&[(100.0, Mode::Wave), (110.0, Mode::Ball)]);
        let (mut flags, mut counters, mut events) = run(&level);
        let mut player = Player::new(Vec2::new(95.0, 470.0), Mode::Cube);
        assert_eq!(apply_portals(&mut player, &level, &mut flags, &mut counters, &mut events), 2);
        assert_eq!(player.mode(), Mode::Ball);
        let switches: Vec<_> = events.drain();
        assert_eq!(
            switches[1],
            GameEvent::ModeSwitched {
                from: Mode::Wave,
                to: Mode::Ball
            }
        );
    }

    #[test]
    fn test_portal_needs_inset_overlap() {
        let level = level_with_portals(&[(100.0, Mode::Ship)]);
        let (mut flags, mut counters, mut events) = run(&level);
        // Full body touches the portal, inset body does not
        let mut player = Player::new(Vec2::new(62.0, 470.0), Mode::Cube);
        assert_eq!(apply_portals(&mut player, &level, &mut flags, &mut counters, &mut events), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_finish_fires_once() {
        let level = Level::new(1000.0);
        let mut flags = TriggerFlags::new(0, 0);
        let mut events = EventQueue::new();
        let mut player = Player::new(Vec2::new(990.0, 470.0), Mode::Cube);
        assert!(!check_finish(&player, &level, &mut flags, &mut events));
        player.pose.pos.x = 1000.0;
        assert!(check_finish(&player, &level, &mut flags, &mut events));
        player.pose.pos.x = 1010.0;
        assert!(!check_finish(&player, &level, &mut flags, &mut events));
        assert_eq!(events.drain(), vec![GameEvent::LevelFinished]);
    }
}
