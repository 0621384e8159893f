//! Axis-aligned bounding box collision
//!
//! Every collision test in the game is a rectangle overlap. Resolution decides
//! which face of an obstacle was crossed by looking at where the mover was on
//! the *previous* tick, then snaps the mover flush against that face.

use glam::Vec2;

/// Slack for "was fully above/below/beside last tick" comparisons
const FACE_EPSILON: f32 = 1e-3;

/// An axis-aligned rectangle in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height (both positive)
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Same size, different top-left corner
    #[inline]
    pub fn at(&self, pos: Vec2) -> Self {
        Self {
            pos,
            size: self.size,
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
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Half-open overlap test on both axes. Touching edges do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }

    /// True if the horizontal spans intersect (half-open)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

/// True iff the rectangles intersect on both axes (half-open intervals)
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// Which face of the obstacle the mover ended up against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Landed on the obstacle
    Top,
    /// Bumped the obstacle from below
    Bottom,
    /// Pushed against the obstacle's left side
    Left,
    /// Pushed against the obstacle's right side
    Right,
}

/// Outcome of resolving one mover against one obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Corrected top-left corner
    pub pos: Vec2,
    /// Velocity with the component into `face` zeroed
    pub vel: Vec2,
    pub face: Face,
}

/// Resolve a mover that now overlaps `obstacle`.
///
/// `prev` is the mover's top-left corner on the previous tick, `next` its
/// proposed box this tick. Returns `None` when the boxes do not overlap.
///
/// Priority:
/// 1. Landing on top (was above last tick, moving down).
/// 2. Head bump (was below last tick, moving up).
/// 3. Side contact, only when the mover's vertical extent sits deeper than
///    `side_tolerance` inside the obstacle's top and bottom edges, so walking
///    across a platform seam never side-blocks.
/// 4. Feet within `side_tolerance` of the top: step up onto it.
/// 5. Fallback: push out along the face with the smallest penetration
///    (ties favour Top, then Bottom, Left, Right).
pub fn resolve_axis_aligned(
    prev: Vec2,
    next: &Rect,
    vel: Vec2,
    obstacle: &Rect,
    side_tolerance: f32,
) -> Option<Resolution> {
    if !overlaps(next, obstacle) {
        return None;
    }

    let before = next.at(prev);
    let delta = next.pos - prev;

    if delta.y > 0.0 && before.bottom() <= obstacle.top() + FACE_EPSILON {
        return Some(snap(next, vel, obstacle, Face::Top));
    }
    if delta.y < 0.0 && before.top() >= obstacle.bottom() - FACE_EPSILON {
        return Some(snap(next, vel, obstacle, Face::Bottom));
    }

    let in_side_band = next.bottom() > obstacle.top() + side_tolerance
        && next.top() < obstacle.bottom() - side_tolerance;
    if in_side_band {
        if delta.x > 0.0 && before.right() <= obstacle.left() + FACE_EPSILON {
            return Some(snap(next, vel, obstacle, Face::Left));
        }
        if delta.x < 0.0 && before.left() >= obstacle.right() - FACE_EPSILON {
            return Some(snap(next, vel, obstacle, Face::Right));
        }
    } else if next.bottom() - obstacle.top() <= side_tolerance {
        // Feet only just inside the top edge: step up onto it
        return Some(snap(next, vel, obstacle, Face::Top));
    }

    let penetrations = [
        (next.bottom() - obstacle.top(), Face::Top),
        (obstacle.bottom() - next.top(), Face::Bottom),
        (next.right() - obstacle.left(), Face::Left),
        (obstacle.right() - next.left(), Face::Right),
    ];
    let mut best = penetrations[0];
    for candidate in &penetrations[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    Some(snap(next, vel, obstacle, best.1))
}

/// Place the mover flush against `face` and zero the velocity into it
fn snap(next: &Rect, vel: Vec2, obstacle: &Rect, face: Face) -> Resolution {
    let mut pos = next.pos;
    let mut vel = vel;
    match face {
        Face::Top => {
            pos.y = obstacle.top() - next.height();
            vel.y = vel.y.min(0.0);
        }
        Face::Bottom => {
            pos.y = obstacle.bottom();
            vel.y = vel.y.max(0.0);
        }
        Face::Left => {
            pos.x = obstacle.left() - next.width();
            vel.x = vel.x.min(0.0);
        }
        Face::Right => {
            pos.x = obstacle.right();
            vel.x = vel.x.max(0.0);
        }
    }
    Resolution { pos, vel, face }
}
