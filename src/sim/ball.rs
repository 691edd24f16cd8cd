//! Ball kinematics: integration, pending brick impacts, wall and paddle bounces

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Impact, reflect_velocity};
use super::paddle::Paddle;
use crate::ViewportContext;
use crate::consts::*;

/// Horizontal extent the ball bounces between (the grid's side edges)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub min_x: f32,
    pub max_x: f32,
}

/// A brick impact detected ahead of the ball but not yet reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingCollision {
    /// Ball centre at contact
    pub position: Vec2,
    pub normal: Vec2,
    pub brick: usize,
}

impl From<Impact> for PendingCollision {
    fn from(impact: Impact) -> Self {
        Self {
            position: impact.position,
            normal: impact.normal,
            brick: impact.brick,
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Impact computed for the current trajectory, applied once reached
    pub pending: Option<PendingCollision>,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::ZERO)
    }
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            pending: None,
        }
    }

    /// Put the ball somewhere new and forget any pending impact
    pub fn reset(&mut self, pos: Vec2, vel: Vec2) {
        self.pos = pos;
        self.vel = vel;
        self.pending = None;
    }

    pub fn stop(&mut self) {
        self.vel = Vec2::ZERO;
    }

    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Ball's bottom edge has left the field through the floor
    pub fn is_below_floor(&self) -> bool {
        self.pos.y - self.radius < 0.0
    }

    /// Record the next brick impact on the current trajectory
    pub fn set_pending(&mut self, impact: Impact) {
        self.pending = Some(impact.into());
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Advance one step.
    ///
    /// Moves the ball, resolves a pending brick impact once the ball reaches
    /// (or overshoots) it, then bounces off the ceiling and the playfield's
    /// side edges. Any wall bounce drops the pending impact, since it was
    /// computed for the pre-bounce trajectory. The floor is left to the
    /// caller (`is_below_floor`).
    ///
    /// Returns the index of the brick struck this step.
    pub fn update(
        &mut self,
        dt: f32,
        viewport: &ViewportContext,
        playfield: Playfield,
    ) -> Option<usize> {
        let old_pos = self.pos;
        self.pos += self.vel * dt;

        let mut hit = None;
        if let Some(pending) = self.pending {
            if self.pending_reached(old_pos, &pending) {
                self.pos = pending.position;
                self.vel = reflect_velocity(self.vel, pending.normal);
                self.pos += pending.normal * SAFETY_OFFSET;
                self.pending = None;
                hit = Some(pending.brick);
            }
        }

        if self.pos.y + self.radius > viewport.height {
            self.pos.y = viewport.height - self.radius;
            if self.vel.y > 0.0 {
                self.vel.y = -self.vel.y;
                self.pending = None;
            }
        }

        if self.pos.x - self.radius < playfield.min_x {
            self.pos.x = playfield.min_x + self.radius;
            if self.vel.x < 0.0 {
                self.vel.x = -self.vel.x;
                self.pending = None;
            }
        } else if self.pos.x + self.radius > playfield.max_x {
            self.pos.x = playfield.max_x - self.radius;
            if self.vel.x > 0.0 {
                self.vel.x = -self.vel.x;
                self.pending = None;
            }
        }

        hit
    }

    /// Whether the move from `old_pos` to the current position reached the
    /// pending contact point: either far enough along, or already past the
    /// contact plane.
    fn pending_reached(&self, old_pos: Vec2, pending: &PendingCollision) -> bool {
        let eps_sq = PENDING_EPSILON * PENDING_EPSILON;
        let travel_sq = (self.pos - old_pos).length_squared();
        let target_sq = (pending.position - old_pos).length_squared();

        // Already sitting on the contact point
        if target_sq <= eps_sq {
            return true;
        }

        let reached_distance = travel_sq >= target_sq - eps_sq;
        let passed_plane = (pending.position - self.pos).dot(self.vel) <= 0.0;
        reached_distance || passed_plane
    }

    /// Bounce off the paddle if the ball meets its top face this step.
    ///
    /// Must run before `update`. The ball has to be falling and overlap the
    /// paddle horizontally; contact is either its bottom edge crossing the
    /// paddle top during this step, or the bottom edge already inside the
    /// paddle with the top edge still above it.
    ///
    /// The outgoing direction depends on where the paddle was struck:
    /// centre sends the ball straight up, the edges at up to the maximum
    /// bounce angle. Speed is kept, but never below a quarter of the
    /// viewport width per second.
    pub fn check_paddle_collision(
        &mut self,
        paddle: &Paddle,
        dt: f32,
        viewport: &ViewportContext,
    ) -> bool {
        let rect = &paddle.rect;
        let paddle_top = rect.top();
        let paddle_bottom = rect.bottom();

        let ball_bottom = self.pos.y - self.radius;
        let ball_top = self.pos.y + self.radius;
        let next_bottom = self.pos.y + self.vel.y * dt - self.radius;

        let moving_down = self.vel.y < 0.0;
        let horizontal_overlap =
            self.pos.x + self.radius > rect.left() && self.pos.x - self.radius < rect.right();

        if !moving_down || !horizontal_overlap {
            return false;
        }

        let crossing = ball_bottom >= paddle_top && next_bottom < paddle_top;
        let embedded =
            ball_bottom < paddle_top && ball_bottom >= paddle_bottom && ball_top > paddle_top;
        if !crossing && !embedded {
            return false;
        }

        self.pos.y = paddle_top + self.radius;

        let half_width = rect.size.x / 2.0;
        let offset = ((self.pos.x - paddle.center_x()) / half_width).clamp(-1.0, 1.0);
        let min_speed = viewport.width * BALL_MIN_SPEED_FRACTION;
        let speed = self.speed().max(min_speed);
        let angle = offset * PADDLE_MAX_BOUNCE_ANGLE_DEG.to_radians();

        self.vel = Vec2::new(speed * angle.sin(), (speed * angle.cos()).abs());
        self.pending = None;
        true
    }
}
