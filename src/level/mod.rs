//! Level: the grid design, its brick instances during play, and the editor
//!
//! The grid is the authoritative design and is what gets saved. Bricks are
//! rebuilt from it at the start of every session and carry the per-game
//! state (which bricks are broken), so play never alters the design.

pub mod brick;
pub mod editor;
pub mod grid;

pub use brick::BrickInstance;
pub use editor::Editor;
pub use grid::{CellCoord, GridCell, GridError, GridGeometry, GridStore, Tier};

use std::path::Path;

use crate::ViewportContext;
use crate::consts::SCAN_HORIZON;
use crate::persistence::{self, LevelError};
use crate::sim::collision::scan;
use crate::sim::{Ball, Playfield};

/// What `Level::load` ended up doing. The grid is complete in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File read cleanly
    Loaded,
    /// File read, but some cells were malformed and are now empty
    Partial { invalid_cells: usize },
    /// No file yet: default layout generated and written out
    CreatedDefault,
    /// File exists but could not be read: default layout in memory only
    Unreadable,
}

impl LoadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoadOutcome::Loaded | LoadOutcome::CreatedDefault)
    }
}

/// The level grid plus the bricks of the running session
#[derive(Debug, Clone, Default)]
pub struct Level {
    grid: GridStore,
    bricks: Vec<BrickInstance>,
    /// Destructible bricks still standing
    active_count: usize,
}

impl Level {
    pub fn new(grid: GridStore) -> Self {
        Self {
            grid,
            bricks: Vec::new(),
            active_count: 0,
        }
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn into_grid(self) -> GridStore {
        self.grid
    }

    pub fn bricks(&self) -> &[BrickInstance] {
        &self.bricks
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Replace the grid from a level file. A missing file is a first run:
    /// the default layout is generated and saved. Session bricks are
    /// dropped; call `setup_bricks` next.
    pub fn load(&mut self, path: &Path) -> LoadOutcome {
        self.bricks.clear();
        self.active_count = 0;

        match persistence::read_grid(path) {
            Ok((cells, 0)) => {
                log::info!("Loaded level from {}", path.display());
                self.grid.replace_cells(cells);
                LoadOutcome::Loaded
            }
            Ok((cells, invalid_cells)) => {
                log::warn!(
                    "Loaded level from {} with {invalid_cells} invalid cells set to empty",
                    path.display()
                );
                self.grid.replace_cells(cells);
                LoadOutcome::Partial { invalid_cells }
            }
            Err(e) if e.is_not_found() => {
                log::warn!("No level file at {}; creating default layout", path.display());
                self.grid.replace_cells(*GridStore::default_layout().cells());
                if let Err(e) = self.save(path) {
                    log::warn!("{e}");
                }
                LoadOutcome::CreatedDefault
            }
            Err(e) => {
                log::warn!("{e}; using default layout");
                self.grid.replace_cells(*GridStore::default_layout().cells());
                LoadOutcome::Unreadable
            }
        }
    }

    /// Write the grid design (never the session state) to a level file
    pub fn save(&self, path: &Path) -> Result<(), LevelError> {
        persistence::write_grid(path, self.grid.cells())?;
        log::info!("Saved level to {}", path.display());
        Ok(())
    }

    /// Lay out the grid for `viewport` and build one brick per cell
    pub fn setup_bricks(&mut self, viewport: &ViewportContext) {
        self.grid.layout(viewport);
        let geometry = *self.grid.geometry();

        self.bricks = self
            .grid
            .iter()
            .map(|(cell, kind)| BrickInstance::new(geometry.cell_rect(cell), cell, kind))
            .collect();
        self.active_count = self.bricks.iter().filter(|b| b.counts_for_clear()).count();

        log::info!(
            "Level setup complete. Active destructible bricks: {}",
            self.active_count
        );
    }

    /// Follow a viewport resize mid-session: move the grid and every brick,
    /// keeping which bricks are broken.
    pub fn relayout(&mut self, viewport: &ViewportContext) {
        self.grid.layout(viewport);
        let geometry = *self.grid.geometry();
        for brick in &mut self.bricks {
            brick.rect = geometry.cell_rect(brick.cell);
        }
    }

    /// Side walls of the play area: the grid's left and right edges
    pub fn playfield(&self) -> Playfield {
        let bounds = self.grid.geometry().bounds();
        Playfield {
            min_x: bounds.left(),
            max_x: bounds.right(),
        }
    }

    /// Scan the ball's upcoming path and record the first brick it will
    /// meet as its pending impact. A stale pending impact is replaced, or
    /// dropped when the path is now clear.
    pub fn check_collisions(&self, ball: &mut Ball) {
        ball.clear_pending();

        let active = self
            .bricks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_active())
            .map(|(i, b)| (i, b.rect));

        if let Some(impact) = scan(ball.pos, ball.radius, ball.vel * SCAN_HORIZON, active) {
            ball.set_pending(impact);
        }
    }

    /// Apply a confirmed hit. Returns the score awarded; the clear counter
    /// drops exactly when a destructible brick breaks.
    pub fn process_brick_hit(&mut self, index: usize) -> u32 {
        let Some(brick) = self.bricks.get_mut(index) else {
            return 0;
        };

        let was_counted = brick.counts_for_clear();
        let score = brick.hit();
        if was_counted && !brick.is_active() {
            self.active_count = self.active_count.saturating_sub(1);
            log::debug!(
                "Brick {index} at [{},{}] broken for {score}; {} left",
                brick.cell.row,
                brick.cell.col,
                self.active_count
            );
        }
        score
    }

    pub fn all_bricks_cleared(&self) -> bool {
        self.active_count == 0
    }
}
