//! Per-frame physics pipeline
//!
//! The three collision stages must run in a fixed order each step, so they
//! are wrapped in one function instead of being left to call sites.

use glam::Vec2;

use super::ball::Ball;
use super::paddle::Paddle;
use crate::ViewportContext;
use crate::level::Level;

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in viewport space (paddle follows its x)
    pub pointer: Option<Vec2>,
    /// Launch the ball (edge-triggered click)
    pub launch: bool,
}

/// What happened to the ball during one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Brick struck this step, not yet processed by the level
    pub hit_brick: Option<usize>,
    pub paddle_hit: bool,
    /// Ball dropped through the floor
    pub out_of_bounds: bool,
}

/// Advance the ball by one step against the level and paddle.
///
/// Order:
/// 1. Scan the bricks along the ball's current path (sets the pending impact).
/// 2. Check the paddle; a bounce here wins over the pending impact.
/// 3. Move the ball, resolving the pending impact and the walls.
///
/// The caller applies the returned brick hit via `Level::process_brick_hit`.
pub fn step_physics(
    level: &Level,
    ball: &mut Ball,
    paddle: &Paddle,
    viewport: &ViewportContext,
    dt: f32,
) -> StepOutcome {
    level.check_collisions(ball);
    let paddle_hit = ball.check_paddle_collision(paddle, dt, viewport);
    let hit_brick = ball.update(dt, viewport, level.playfield());

    StepOutcome {
        hit_brick,
        paddle_hit,
        out_of_bounds: ball.is_below_floor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::level::{CellCoord, GridCell, GridStore, Tier};

    fn viewport() -> ViewportContext {
        ViewportContext::new(1200.0, 800.0)
    }

    fn single_brick_level(cell: CellCoord) -> Level {
        let mut grid = GridStore::empty();
        grid.set(cell, GridCell::Brick(Tier::Green));
        let mut level = Level::new(grid);
        level.setup_bricks(&viewport());
        level
    }

    #[test]
    fn test_brick_hit_reported_and_reflected() {
        let cell = CellCoord::new(GRID_ROWS - 1, 5);
        let mut level = single_brick_level(cell);
        let rect = level.grid().geometry().cell_rect(cell);
        let paddle = Paddle::new(&viewport());

        let start = Vec2::new(rect.center().x, rect.bottom() - 20.0);
        let mut ball = Ball::new(start, Vec2::new(0.0, 400.0));

        let mut hit = None;
        for _ in 0..10 {
            let out = step_physics(&level, &mut ball, &paddle, &viewport(), 1.0 / 60.0);
            if out.hit_brick.is_some() {
                hit = out.hit_brick;
                break;
            }
        }

        let index = hit.expect("ball should reach the brick");
        assert_eq!(index, (GRID_ROWS - 1) * GRID_COLS + 5);
        assert_eq!(ball.vel, Vec2::new(0.0, -400.0));
        assert_eq!(level.process_brick_hit(index), 3);
        assert!(level.all_bricks_cleared());
    }

    #[test]
    fn test_fast_ball_does_not_tunnel() {
        let cell = CellCoord::new(GRID_ROWS - 1, 5);
        let level = single_brick_level(cell);
        let rect = level.grid().geometry().cell_rect(cell);
        let paddle = Paddle::new(&viewport());

        // One step moves the ball from below the brick to well above it
        let start = Vec2::new(rect.center().x, rect.bottom() - 15.0);
        let mut ball = Ball::new(start, Vec2::new(0.0, 6000.0));
        let out = step_physics(&level, &mut ball, &paddle, &viewport(), 1.0 / 60.0);

        assert!(out.hit_brick.is_some());
        assert!(ball.pos.y < rect.bottom());
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_paddle_bounce_in_pipeline() {
        let level = single_brick_level(CellCoord::new(0, 0));
        let paddle = Paddle::new(&viewport());
        let mut ball = Ball::new(
            Vec2::new(paddle.center_x(), paddle.top() + BALL_RADIUS + 2.0),
            Vec2::new(0.0, -300.0),
        );

        let out = step_physics(&level, &mut ball, &paddle, &viewport(), 1.0 / 60.0);
        assert!(out.paddle_hit);
        assert!(out.hit_brick.is_none());
        assert!(ball.vel.y > 0.0);
        assert!(!out.out_of_bounds);
    }

    #[test]
    fn test_miss_falls_out() {
        let level = single_brick_level(CellCoord::new(0, 0));
        let paddle = Paddle::new(&viewport());
        let mut ball = Ball::new(Vec2::new(600.0, 5.0), Vec2::new(0.0, -300.0));

        let out = step_physics(&level, &mut ball, &paddle, &viewport(), 1.0 / 60.0);
        assert!(out.out_of_bounds);
        assert!(!out.paddle_hit);
    }
}
