//! Swept collision detection and response for the ball against bricks
//!
//! The tricky part of the game: a fast ball can cross a whole brick in one
//! frame, so instead of testing overlap at the end position we sweep the
//! ball's centre along its displacement against every brick grown by the
//! ball radius (slab test) and keep the earliest entry.

use glam::Vec2;

use super::rect::Rect;
use crate::consts::VELOCITY_EPSILON;

/// Earliest impact found along a displacement segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Fraction of the displacement travelled before contact, in [0, 1]
    pub time: f32,
    /// Ball centre at contact
    pub position: Vec2,
    /// Axis-aligned surface normal, opposing the motion on the entry axis
    pub normal: Vec2,
    /// Index of the struck brick
    pub brick: usize,
}

/// Entry/exit interval of one axis of the segment against one slab
#[derive(Debug, Clone, Copy)]
struct SlabSpan {
    enter: f32,
    exit: f32,
}

/// Intersect the 1D motion `start + delta * t` with the slab `[lo, hi]`.
///
/// Near-zero motion never divides: the start must already lie inside the
/// slab, in which case the span is unbounded.
fn slab_span(start: f32, delta: f32, lo: f32, hi: f32) -> Option<SlabSpan> {
    if delta.abs() > VELOCITY_EPSILON {
        let inv = 1.0 / delta;
        let t0 = (lo - start) * inv;
        let t1 = (hi - start) * inv;
        Some(SlabSpan {
            enter: t0.min(t1),
            exit: t0.max(t1),
        })
    } else if start < lo || start > hi {
        None
    } else {
        Some(SlabSpan {
            enter: f32::NEG_INFINITY,
            exit: f32::INFINITY,
        })
    }
}

/// Sweep a circle against a single rectangle.
///
/// Returns the contact time and normal, or `None` on a miss. A ball that
/// already overlaps the grown rectangle reports time 0, but only while it is
/// still heading into the brick; one that is leaving is let go.
pub fn sweep_circle_rect(
    pos: Vec2,
    radius: f32,
    displacement: Vec2,
    rect: &Rect,
) -> Option<(f32, Vec2)> {
    let grown = rect.expanded(radius);

    let x = slab_span(pos.x, displacement.x, grown.left(), grown.right())?;
    let y = slab_span(pos.y, displacement.y, grown.bottom(), grown.top())?;

    let t_min = x.enter.max(y.enter);
    let t_max = x.exit.min(y.exit);

    if t_min > t_max || t_max < 0.0 || t_min > 1.0 {
        return None;
    }

    let normal = if x.enter > y.enter {
        Vec2::new(-displacement.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, -displacement.y.signum())
    };

    if t_min < 0.0 {
        let heading_in = (rect.center() - pos).dot(displacement) > 0.0;
        if !heading_in {
            return None;
        }
        return Some((0.0, normal));
    }

    Some((t_min, normal))
}

/// Find the earliest impact of a moving ball against a set of bricks.
///
/// `bricks` yields `(index, rect)` for active bricks only. Equal contact
/// times keep the first brick seen, so iterating in index order makes the
/// lowest index win. Nothing is mutated; the caller decides what to apply.
pub fn scan<I>(pos: Vec2, radius: f32, displacement: Vec2, bricks: I) -> Option<Impact>
where
    I: IntoIterator<Item = (usize, Rect)>,
{
    let mut best: Option<Impact> = None;

    for (index, rect) in bricks {
        let Some((time, normal)) = sweep_circle_rect(pos, radius, displacement, &rect) else {
            continue;
        };
        if best.is_some_and(|b| time >= b.time) {
            continue;
        }
        best = Some(Impact {
            time,
            position: pos + displacement * time,
            normal,
            brick: index,
        });
    }

    best
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
