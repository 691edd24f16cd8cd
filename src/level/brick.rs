//! Runtime brick instances built from the grid for one play session

use serde::{Deserialize, Serialize};

use super::grid::{CellCoord, GridCell};
use crate::sim::Rect;

/// A brick on screen during play.
///
/// The grid cell it came from never changes during play; this instance
/// carries the per-session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickInstance {
    pub rect: Rect,
    /// Logical cell this brick was built from
    pub cell: CellCoord,
    kind: GridCell,
    active: bool,
}

impl BrickInstance {
    /// An empty cell produces an inactive instance
    pub fn new(rect: Rect, cell: CellCoord, kind: GridCell) -> Self {
        Self {
            rect,
            cell,
            kind,
            active: !kind.is_empty(),
        }
    }

    pub fn kind(&self) -> GridCell {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_indestructible(&self) -> bool {
        self.kind == GridCell::Indestructible
    }

    /// Active and breakable; these are what the clear counter tracks
    pub fn counts_for_clear(&self) -> bool {
        self.active && self.kind.is_destructible()
    }

    /// Score value mirrored from the grid (0 empty, -1 indestructible)
    pub fn score_value(&self) -> i32 {
        self.kind.code()
    }

    /// Strike the brick and return the score it awards.
    ///
    /// Indestructible and already-broken bricks award nothing and do not
    /// change. A live destructible brick awards its tier score and is gone.
    pub fn hit(&mut self) -> u32 {
        if !self.active {
            return 0;
        }
        match self.kind {
            GridCell::Brick(tier) => {
                self.active = false;
                self.kind = GridCell::Empty;
                tier.score()
            }
            GridCell::Indestructible | GridCell::Empty => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::grid::Tier;

    fn brick(kind: GridCell) -> BrickInstance {
        BrickInstance::new(Rect::new(0.0, 0.0, 75.0, 25.0), CellCoord::new(0, 0), kind)
    }

    #[test]
    fn test_empty_cell_is_inactive() {
        let b = brick(GridCell::Empty);
        assert!(!b.is_active());
        assert_eq!(b.score_value(), 0);
    }

    #[test]
    fn test_hit_destructible_once() {
        let mut b = brick(GridCell::Brick(Tier::Orange));
        assert!(b.counts_for_clear());
        assert_eq!(b.hit(), 5);
        assert!(!b.is_active());
        assert_eq!(b.score_value(), 0);
        assert_eq!(b.hit(), 0);
        assert!(!b.counts_for_clear());
    }

    #[test]
    fn test_indestructible_survives() {
        let mut b = brick(GridCell::Indestructible);
        for _ in 0..5 {
            assert_eq!(b.hit(), 0);
        }
        assert!(b.is_active());
        assert!(b.is_indestructible());
        assert!(!b.counts_for_clear());
    }
}
