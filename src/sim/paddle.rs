//! The player's paddle

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::ViewportContext;
use crate::consts::*;

/// The player's paddle, a rectangle sliding along the bottom of the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, PADDLE_WIDTH, PADDLE_HEIGHT),
        }
    }
}

impl Paddle {
    /// Paddle centred horizontally at its resting height
    pub fn new(viewport: &ViewportContext) -> Self {
        let mut paddle = Self::default();
        paddle.init(viewport);
        paddle
    }

    /// Place the paddle at its resting height and centre it
    pub fn init(&mut self, viewport: &ViewportContext) {
        self.rect.min.y = viewport.height * PADDLE_Y_FRACTION;
        self.recenter(viewport);
    }

    /// Centre horizontally, keeping the current height
    pub fn recenter(&mut self, viewport: &ViewportContext) {
        self.rect.min.x = (viewport.width - self.rect.size.x) / 2.0;
    }

    /// Follow the pointer, keeping the paddle fully inside the viewport
    pub fn track(&mut self, pointer_x: f32, viewport: &ViewportContext) {
        let max_x = (viewport.width - self.rect.size.x).max(0.0);
        self.rect.min.x = (pointer_x - self.rect.size.x / 2.0).clamp(0.0, max_x);
    }

    pub fn center_x(&self) -> f32 {
        self.rect.center().x
    }

    /// Y of the paddle's upper face
    pub fn top(&self) -> f32 {
        self.rect.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_centres_at_rest_height() {
        let vp = ViewportContext::new(800.0, 600.0);
        let paddle = Paddle::new(&vp);
        assert!((paddle.center_x() - 400.0).abs() < 1e-4);
        assert!((paddle.rect.bottom() - 60.0).abs() < 1e-4);
        assert!((paddle.top() - 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_track_clamps_to_viewport() {
        let vp = ViewportContext::new(800.0, 600.0);
        let mut paddle = Paddle::new(&vp);

        paddle.track(300.0, &vp);
        assert!((paddle.center_x() - 300.0).abs() < 1e-4);

        paddle.track(-50.0, &vp);
        assert_eq!(paddle.rect.left(), 0.0);

        paddle.track(5000.0, &vp);
        assert!((paddle.rect.right() - 800.0).abs() < 1e-4);
    }

    #[test]
    fn test_recenter_after_resize() {
        let mut paddle = Paddle::new(&ViewportContext::new(800.0, 600.0));
        paddle.track(100.0, &ViewportContext::new(800.0, 600.0));
        paddle.recenter(&ViewportContext::new(1200.0, 600.0));
        assert!((paddle.center_x() - 600.0).abs() < 1e-4);
    }
}
