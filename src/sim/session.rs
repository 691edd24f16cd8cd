//! Game session: lives, score, serving and speed boosts around the physics
//!
//! The session is the only owner of the RNG, so a run is fully reproducible
//! from the config seed and the sequence of inputs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::Ball;
use super::paddle::Paddle;
use super::tick::{StepOutcome, TickInput, step_physics};
use crate::ViewportContext;
use crate::config::GameConfig;
use crate::consts::MAX_FRAME_DT;
use crate::level::{GridCell, Level, Tier};

/// Gap between paddle and ball while the ball rides the paddle
const SERVE_GAP: f32 = 1.0;
/// Gap used when the ball is first put back on the paddle
const RESET_GAP: f32 = 5.0;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ball rides the paddle waiting for a launch
    Serve,
    Playing,
    Won,
    GameOver,
}

impl SessionPhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionPhase::Won | SessionPhase::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Serve => "Serve",
            SessionPhase::Playing => "Playing",
            SessionPhase::Won => "Won",
            SessionPhase::GameOver => "GameOver",
        }
    }
}

/// One-off speed boosts, each applied at most once per session
#[derive(Debug, Clone, Copy, Default)]
struct SpeedBoosts {
    first_orange: bool,
    first_red: bool,
    fourth_hit: bool,
    twelfth_hit: bool,
}

/// A running game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub level: Level,
    pub ball: Ball,
    pub paddle: Paddle,
    pub score: u32,
    pub lives: u32,
    phase: SessionPhase,
    config: GameConfig,
    rng: Pcg32,
    boosts: SpeedBoosts,
    /// Bricks that awarded points this session
    bricks_hit: u32,
    /// Velocity given to the ball at the next launch
    serve_velocity: Vec2,
}

impl GameSession {
    /// Load the level named by the config and start serving
    pub fn start(config: &GameConfig, viewport: &ViewportContext) -> Self {
        let mut level = Level::default();
        let outcome = level.load(&config.level_path);
        if !outcome.is_success() {
            log::warn!(
                "Level file issues during game init ({outcome:?}); check {}",
                config.level_path.display()
            );
        }
        Self::new(level, config, viewport)
    }

    /// Start a session on an already loaded level
    pub fn new(mut level: Level, config: &GameConfig, viewport: &ViewportContext) -> Self {
        level.setup_bricks(viewport);

        let mut session = Self {
            level,
            ball: Ball::default(),
            paddle: Paddle::new(viewport),
            score: 0,
            lives: config.starting_lives,
            phase: SessionPhase::Serve,
            config: config.clone(),
            rng: Pcg32::seed_from_u64(config.seed),
            boosts: SpeedBoosts::default(),
            bricks_hit: 0,
            serve_velocity: Vec2::ZERO,
        };
        session.serve_velocity = session.default_launch_velocity(viewport);
        session.reset_ball();

        if session.level.all_bricks_cleared() {
            log::info!("Level has no destructible bricks; nothing to play");
            session.phase = SessionPhase::Won;
        } else {
            log::info!("Session started with {} lives", session.lives);
        }
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn bricks_hit(&self) -> u32 {
        self.bricks_hit
    }

    /// Velocity the next launch will use
    pub fn serve_velocity(&self) -> Vec2 {
        self.serve_velocity
    }

    /// HUD line for the current phase
    pub fn status(&self) -> String {
        match self.phase {
            SessionPhase::Serve => "Click to launch ball".to_string(),
            SessionPhase::Playing => String::new(),
            SessionPhase::Won => format!("You Win! Score: {}", self.score),
            SessionPhase::GameOver => format!("Game Over! Score: {}", self.score),
        }
    }

    /// Advance one frame. `dt` is capped at `MAX_FRAME_DT`.
    pub fn tick(&mut self, input: &TickInput, dt: f32, viewport: &ViewportContext) -> StepOutcome {
        if self.phase.is_finished() {
            return StepOutcome::default();
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        if let Some(pointer) = input.pointer {
            self.paddle.track(pointer.x, viewport);
        }

        if self.phase == SessionPhase::Serve {
            if !input.launch {
                self.seat_ball();
                return StepOutcome::default();
            }
            self.ball.vel = self.serve_velocity;
            self.phase = SessionPhase::Playing;
            log::debug!("Ball launched at {:?}", self.ball.vel);
        }

        let outcome = step_physics(&self.level, &mut self.ball, &self.paddle, viewport, dt);

        if let Some(index) = outcome.hit_brick {
            self.apply_hit(index);
        }

        if outcome.out_of_bounds {
            self.lose_life(viewport);
        } else if self.level.all_bricks_cleared() {
            log::info!("Level cleared! Score: {}", self.score);
            self.phase = SessionPhase::Won;
            self.ball.stop();
        }

        outcome
    }

    /// Follow a viewport change: paddle back to rest, bricks moved with the
    /// grid, and a waiting ball re-seated on the paddle.
    pub fn resize(&mut self, viewport: &ViewportContext) {
        self.paddle.init(viewport);
        self.level.relayout(viewport);
        if self.phase == SessionPhase::Serve {
            self.seat_ball();
        }
    }

    /// Score the brick and apply any speed boost it triggers
    fn apply_hit(&mut self, index: usize) {
        // Breaking the brick empties it, so read the tier first
        let tier = match self.level.bricks().get(index).map(|b| b.kind()) {
            Some(GridCell::Brick(tier)) => Some(tier),
            _ => None,
        };

        let score = self.level.process_brick_hit(index);
        if score == 0 {
            return;
        }
        self.score += score;
        self.bricks_hit += 1;

        let boost = self.config.speed_boost;
        let mut multiplier = 1.0;
        if tier == Some(Tier::Orange) && !self.boosts.first_orange {
            multiplier *= boost;
            self.boosts.first_orange = true;
        }
        if tier == Some(Tier::Red) && !self.boosts.first_red {
            multiplier *= boost;
            self.boosts.first_red = true;
        }
        if self.bricks_hit == 4 && !self.boosts.fourth_hit {
            multiplier *= boost;
            self.boosts.fourth_hit = true;
        }
        if self.bricks_hit == 12 && !self.boosts.twelfth_hit {
            multiplier *= boost;
            self.boosts.twelfth_hit = true;
        }

        if multiplier > 1.0 {
            self.ball.vel *= multiplier;
            log::debug!("Speed boost x{multiplier:.3}, speed now {:.1}", self.ball.speed());
        }
    }

    fn lose_life(&mut self, viewport: &ViewportContext) {
        self.lives = self.lives.saturating_sub(1);
        log::info!("Life lost! Lives remaining: {}. Score: {}", self.lives, self.score);

        if self.lives == 0 {
            log::info!("Game over. Score: {}", self.score);
            self.phase = SessionPhase::GameOver;
            self.ball.stop();
            self.ball.clear_pending();
            return;
        }

        let last_speed = self.ball.speed();
        self.serve_velocity = if last_speed > self.config.preserve_speed_threshold(viewport) {
            let angle = self.rng.random_range(30..=150u32) as f32;
            log::debug!("Preserving speed {last_speed:.1} at {angle} degrees");
            Vec2::from_angle(angle.to_radians()) * last_speed
        } else {
            self.default_launch_velocity(viewport)
        };

        self.paddle.recenter(viewport);
        self.reset_ball();
        self.phase = SessionPhase::Serve;
    }

    fn default_launch_velocity(&mut self, viewport: &ViewportContext) -> Vec2 {
        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.config.launch_velocity(viewport, direction)
    }

    /// Stopped ball just above the paddle centre
    fn reset_ball(&mut self) {
        let y = self.paddle.top() + self.ball.radius + RESET_GAP;
        let pos = Vec2::new(self.paddle.center_x(), y);
        self.ball.reset(pos, Vec2::ZERO);
    }

    fn seat_ball(&mut self) {
        let y = self.paddle.top() + self.ball.radius + SERVE_GAP;
        self.ball.pos = Vec2::new(self.paddle.center_x(), y);
    }
}
