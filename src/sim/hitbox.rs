//! Hitbox derivation
//!
//! Maps obstacle and player descriptors to the shape actually used for
//! collision, applying each class's forgiving inset and any rotation.

use glam::Vec2;

use super::geometry::{
    Rect, aabb_overlap, column_extent, convex_overlap, point_in_triangle, rotate_point,
};
use super::state::{Obstacle, ObstacleKind, Player, SlopeKind, SpikeDir};
use crate::consts::*;

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hitbox {
    /// Axis-aligned box, tested with strict overlap
    Aabb(Rect),
    /// Rotated box corners in winding order
    Quad([Vec2; 4]),
    Triangle([Vec2; 3]),
    /// Collapsed by its inset; never collides
    Empty,
}

/// Anything that can produce a collision shape
pub trait HitboxSource {
    fn hitbox(&self) -> Hitbox;
}

impl HitboxSource for Obstacle {
    fn hitbox(&self) -> Hitbox {
        let rotation = effective_rotation(self.rotation);
        match self.kind {
            ObstacleKind::Platform => rect_hitbox(&self.rect, PLATFORM_INSET, rotation),
            ObstacleKind::BoostPad | ObstacleKind::Wall => {
                rect_hitbox(&self.rect, OBSTACLE_INSET, rotation)
            }
            ObstacleKind::Spike { dir } => spike_hitbox(&self.rect, dir, rotation),
            ObstacleKind::Slope { kind } => slope_hitbox(&self.rect, kind, rotation),
        }
    }
}

impl HitboxSource for Player {
    /// The forgiving hitbox used for lethal and portal tests
    fn hitbox(&self) -> Hitbox {
        Hitbox::Aabb(self.body().inset(PLAYER_INSET))
    }
}

/// Player's inset rectangle (the mover in every lethal test)
pub fn player_hit_rect(player: &Player) -> Rect {
    player.body().inset(PLAYER_INSET)
}

/// Rotation that actually changes the shape, in degrees
fn effective_rotation(rotation: Option<f32>) -> Option<f32> {
    rotation.filter(|deg| crate::normalize_degrees(*deg) != 0.0)
}

/// Rectangle family: inset, then rotate the corners about the box centre
pub fn rect_hitbox(rect: &Rect, inset: f32, rotation: Option<f32>) -> Hitbox {
    let boxed = rect.inset(inset);
    if boxed.is_degenerate() {
        return Hitbox::Empty;
    }
    match rotation {
        Some(deg) => {
            let center = rect.center();
            Hitbox::Quad(boxed.corners().map(|c| rotate_point(c, center, deg)))
        }
        None => Hitbox::Aabb(boxed),
    }
}

fn triangle(rect: &Rect, vertices: [Vec2; 3], rotation: Option<f32>) -> Hitbox {
    match rotation {
        Some(deg) => {
            let center = rect.center();
            Hitbox::Triangle(vertices.map(|v| rotate_point(v, center, deg)))
        }
        None => Hitbox::Triangle(vertices),
    }
}

/// Spikes: triangle inscribed in the 6-unit inset box
pub fn spike_hitbox(rect: &Rect, dir: SpikeDir, rotation: Option<f32>) -> Hitbox {
    let b = rect.inset(SPIKE_INSET);
    if b.is_degenerate() {
        return Hitbox::Empty;
    }
    let mid = b.center().x;
    let vertices = match dir {
        SpikeDir::Up => [
            Vec2::new(mid, b.top()),
            Vec2::new(b.right(), b.bottom()),
            Vec2::new(b.left(), b.bottom()),
        ],
        SpikeDir::Down => [
            Vec2::new(mid, b.bottom()),
            Vec2::new(b.left(), b.top()),
            Vec2::new(b.right(), b.top()),
        ],
    };
    triangle(rect, vertices, rotation)
}

/// Slopes: right triangles (shallow) or off-centre apex triangles (steep)
pub fn slope_hitbox(rect: &Rect, kind: SlopeKind, rotation: Option<f32>) -> Hitbox {
    let b = rect.inset(SLOPE_INSET);
    if b.is_degenerate() {
        return Hitbox::Empty;
    }
    let bottom_left = Vec2::new(b.left(), b.bottom());
    let bottom_right = Vec2::new(b.right(), b.bottom());
    let vertices = match kind {
        SlopeKind::ShallowUp => [bottom_left, bottom_right, Vec2::new(b.right(), b.top())],
        SlopeKind::ShallowDown => [Vec2::new(b.left(), b.top()), bottom_left, bottom_right],
        SlopeKind::SteepUp => [
            Vec2::new(b.left() + b.size.x * STEEP_APEX_FRACTION, b.top()),
            bottom_left,
            bottom_right,
        ],
        SlopeKind::SteepDown => [
            Vec2::new(b.right() - b.size.x * STEEP_APEX_FRACTION, b.top()),
            bottom_left,
            bottom_right,
        ],
    };
    triangle(rect, vertices, rotation)
}

impl Hitbox {
    /// Test an axis-aligned mover against this shape.
    ///
    /// Boxes and quads need interior overlap (touching edges do not count) and
    /// catch containment both ways round. Triangles only test the mover's
    /// corners, boundary included.
    pub fn hits(&self, mover: &Rect) -> bool {
        match self {
            Hitbox::Aabb(target) => aabb_overlap(mover, target),
            Hitbox::Quad(quad) => quad_hits_rect(quad, mover),
            Hitbox::Triangle([v0, v1, v2]) => mover
                .corners()
                .iter()
                .any(|c| point_in_triangle(*c, *v0, *v1, *v2)),
            Hitbox::Empty => false,
        }
    }

    /// Axis-aligned bounds of the shape
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Hitbox::Aabb(r) => Some(*r),
            Hitbox::Quad(q) => Some(Rect::bounding(q)),
            Hitbox::Triangle(t) => Some(Rect::bounding(t)),
            Hitbox::Empty => None,
        }
    }

    /// Highest top and lowest bottom of the shape over the columns
    /// `left..=right`; `None` if the shape lies beside them
    pub fn column_extent(&self, left: f32, right: f32) -> Option<(f32, f32)> {
        match self {
            Hitbox::Aabb(r) => column_extent(&r.corners(), left, right),
            Hitbox::Quad(q) => column_extent(q, left, right),
            Hitbox::Triangle(t) => column_extent(t, left, right),
            Hitbox::Empty => None,
        }
    }
}

/// Symmetric rectangle-family test for a rotated target.
///
/// Agrees with [`aabb_overlap`] whenever the quad is axis-aligned.
pub fn quad_hits_rect(quad: &[Vec2; 4], mover: &Rect) -> bool {
    convex_overlap(quad, &mover.corners())
}
