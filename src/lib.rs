//! Brickbreak - ball-and-paddle brick breaker with a level editor
//!
//! Core modules:
//! - `sim`: Physics (swept collision, ball kinematics, paddle) and the game session
//! - `level`: Level grid, brick instances and the editor mutator
//! - `persistence`: Line-oriented level file format
//! - `app`: Menu/Game/Editor state machine
//! - `config`: Data-driven game settings

pub mod app;
pub mod config;
pub mod level;
pub mod persistence;
pub mod sim;

pub use app::{App, AppEvent, AppState, FrameInput, Screen};
pub use config::GameConfig;
pub use level::{Editor, GridCell, GridStore, Level, Tier};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Level grid dimensions (logical rows x columns)
    pub const GRID_ROWS: usize = 8;
    pub const GRID_COLS: usize = 14;

    /// Brick cell size and gap between cells
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_SPACING: f32 = 3.0;

    /// Grid top sits at this fraction of the viewport height...
    pub const GRID_TOP_FRACTION: f32 = 0.90;
    /// ...but its bottom never drops below this fraction (room for paddle travel)
    pub const GRID_MIN_BOTTOM_FRACTION: f32 = 0.25;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 130.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Paddle bottom edge as a fraction of viewport height
    pub const PADDLE_Y_FRACTION: f32 = 0.1;
    pub const PADDLE_MAX_BOUNCE_ANGLE_DEG: f32 = 75.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Minimum speed after a paddle bounce, as a fraction of viewport width
    pub const BALL_MIN_SPEED_FRACTION: f32 = 0.25;

    /// Velocity components below this are treated as zero by the slab test
    pub const VELOCITY_EPSILON: f32 = 0.0001;
    /// Distance tolerance when deciding a pending impact has been reached
    pub const PENDING_EPSILON: f32 = 0.01;
    /// Push-out along the surface normal after a brick bounce
    pub const SAFETY_OFFSET: f32 = 0.01;
    /// Seconds of travel covered by one collision scan
    pub const SCAN_HORIZON: f32 = 1.0;

    /// Largest frame delta fed to the simulation (prevents spiral of death)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Viewport size, passed explicitly to everything that depends on it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportContext {
    pub width: f32,
    pub height: f32,
}

impl ViewportContext {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero or negative sizes come from minimized windows and are ignored
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl Default for ViewportContext {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}
