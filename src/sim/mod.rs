//! Simulation module
//!
//! All gameplay physics lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by brick index)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod paddle;
pub mod rect;
pub mod session;
pub mod tick;

pub use ball::{Ball, PendingCollision, Playfield};
pub use collision::{Impact, reflect_velocity, scan, sweep_circle_rect};
pub use paddle::Paddle;
pub use rect::Rect;
pub use session::{GameSession, SessionPhase};
pub use tick::{StepOutcome, TickInput, step_physics};
