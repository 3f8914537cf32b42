//! Geometry kernel
//!
//! Pure, stateless helpers shared by hitbox derivation and collision
//! resolution. Coordinates are screen-style: x grows to the right, y grows
//! downward, so a rectangle's `top` is its smallest y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Corners in winding order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.right(), self.bottom()),
            Vec2::new(self.left(), self.bottom()),
        ]
    }

    /// Shrink every side by `amount`.
    ///
    /// A dimension that would go negative collapses to zero around the centre
    /// instead of inverting.
    pub fn inset(&self, amount: f32) -> Rect {
        let size = (self.size - Vec2::splat(2.0 * amount)).max(Vec2::ZERO);
        Rect {
            pos: self.pos + (self.size - size) * 0.5,
            size,
        }
    }

    /// True if either dimension has collapsed
    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Boundary-inclusive point containment
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Smallest rectangle enclosing all the given points
    pub fn bounding(points: &[Vec2]) -> Rect {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        if points.is_empty() {
            return Rect::new(0.0, 0.0, 0.0, 0.0);
        }
        Rect { pos: min, size: max - min }
    }
}

/// Rotate `p` about `center` by `angle_deg` degrees
#[inline]
pub fn rotate_point(p: Vec2, center: Vec2, angle_deg: f32) -> Vec2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let d = p - center;
    center + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Barycentric point-in-triangle test, boundary-inclusive.
///
/// Zero-area triangles contain nothing.
pub fn point_in_triangle(p: Vec2, v0: Vec2, v1: Vec2, v2: Vec2) -> bool {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);
    if denom == 0.0 {
        return false;
    }
    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;
    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
}

/// Twice the signed area of triangle (a, b, p); zero when collinear
#[inline]
fn cross(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)
}

#[inline]
fn on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    cross(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Winding-number point-in-quad test, boundary-inclusive.
///
/// Corners may be given in either winding direction.
pub fn point_in_convex_quad(p: Vec2, corners: &[Vec2; 4]) -> bool {
    let mut winding = 0i32;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        if on_segment(p, a, b) {
            return true;
        }
        if a.y <= p.y {
            if b.y > p.y && cross(a, b, p) > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && cross(a, b, p) < 0.0 {
            winding -= 1;
        }
    }
    winding != 0
}

/// Strict open-interval rectangle overlap; touching edges do not count
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Edge normals of a closed polygon (unnormalised, zero-length edges skipped)
fn edge_normals(points: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = points.len();
    (0..n)
        .map(move |i| {
            let edge = points[(i + 1) % n] - points[i];
            Vec2::new(-edge.y, edge.x)
        })
        .filter(|normal| *normal != Vec2::ZERO)
}

/// Interval covered by `points` along `axis`
fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            let d = p.dot(axis);
            (lo.min(d), hi.max(d))
        })
}

/// Separating-axis test for two convex polygons.
///
/// Overlap is strict on every axis, so shapes that only share an edge or a
/// corner do not collide. For two axis-aligned boxes this is exactly
/// [`aabb_overlap`].
pub fn convex_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    // The coordinate axes keep degenerate (zero-area) shapes well defined
    let mut axes = edge_normals(a)
        .chain(edge_normals(b))
        .chain([Vec2::X, Vec2::Y]);
    axes.all(|axis| {
        let (a_lo, a_hi) = project(a, axis);
        let (b_lo, b_hi) = project(b, axis);
        a_lo < b_hi && b_lo < a_hi
    })
}

/// Top and bottom of a convex polygon along the vertical line at `x`
fn column_at(points: &[Vec2], x: f32) -> Option<(f32, f32)> {
    let n = points.len();
    let mut extent: Option<(f32, f32)> = None;
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        if x < a.x.min(b.x) || x > a.x.max(b.x) {
            continue;
        }
        let ys = if a.x == b.x {
            [a.y, b.y]
        } else {
            let y = a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x);
            [y, y]
        };
        for y in ys {
            extent = Some(match extent {
                Some((top, bottom)) => (top.min(y), bottom.max(y)),
                None => (y, y),
            });
        }
    }
    extent
}

/// Highest top and lowest bottom of a convex polygon over the columns
/// `left..=right`, or `None` if the polygon lies entirely beside them.
pub fn column_extent(points: &[Vec2], left: f32, right: f32) -> Option<(f32, f32)> {
    let span = Rect::bounding(points);
    let (l, r) = (left.max(span.left()), right.min(span.right()));
    if points.is_empty() || l > r {
        return None;
    }
    // The top edge of a convex shape is piecewise linear and convex, so its
    // extremes over an interval sit at the interval ends or at a vertex
    [l, r]
        .into_iter()
        .chain(points.iter().map(|p| p.x).filter(|x| *x > l && *x < r))
        .filter_map(|x| column_at(points, x))
        .reduce(|(t0, b0), (t1, b1)| (t0.min(t1), b0.max(b1)))
}
