//! Level grid: brick type codes plus the layout geometry derived from the viewport

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ViewportContext;
use crate::consts::*;
use crate::sim::Rect;

/// Score tier of a destructible brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Yellow,
    Green,
    Orange,
    Red,
}

impl Tier {
    pub fn score(&self) -> u32 {
        match self {
            Tier::Yellow => 1,
            Tier::Green => 3,
            Tier::Orange => 5,
            Tier::Red => 7,
        }
    }

    /// Default tier for a logical row: two rows per tier, Red on top
    pub fn for_row(logical_row: usize) -> Self {
        match logical_row {
            0 | 1 => Tier::Red,
            2 | 3 => Tier::Orange,
            4 | 5 => Tier::Green,
            _ => Tier::Yellow,
        }
    }
}

/// One cell of the level design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridCell {
    #[default]
    Empty,
    Brick(Tier),
    Indestructible,
}

impl GridCell {
    /// Integer code used by the level file format
    pub fn code(&self) -> i32 {
        match self {
            GridCell::Empty => 0,
            GridCell::Brick(tier) => tier.score() as i32,
            GridCell::Indestructible => -1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(GridCell::Empty),
            1 => Some(GridCell::Brick(Tier::Yellow)),
            3 => Some(GridCell::Brick(Tier::Green)),
            5 => Some(GridCell::Brick(Tier::Orange)),
            7 => Some(GridCell::Brick(Tier::Red)),
            -1 => Some(GridCell::Indestructible),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == GridCell::Empty
    }

    pub fn is_destructible(&self) -> bool {
        matches!(self, GridCell::Brick(_))
    }
}

/// Logical cell coordinate; row 0 is the top scoring tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Rejected grid mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid cell code {code} at [{row},{col}]")]
    InvalidCode { row: usize, col: usize, code: i32 },
    #[error("cell [{row},{col}] is outside the grid")]
    OutOfBounds { row: usize, col: usize },
}

/// Layout of the grid in viewport space, recomputed on every resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Bottom-left corner of the grid's bounding box
    pub origin: Vec2,
    /// Total extent including the gaps between cells
    pub size: Vec2,
    pub cell_size: Vec2,
    pub spacing: f32,
}

impl GridGeometry {
    /// Centre the grid horizontally; hang it from 90% of the height, but
    /// keep its bottom at or above 25% so the paddle has room to play.
    pub fn compute(viewport: &ViewportContext) -> Self {
        let cell_size = Vec2::new(BRICK_WIDTH, BRICK_HEIGHT);
        let spacing = BRICK_SPACING;
        let size = Vec2::new(
            GRID_COLS as f32 * (cell_size.x + spacing) - spacing,
            GRID_ROWS as f32 * (cell_size.y + spacing) - spacing,
        );

        let x = (viewport.width - size.x) / 2.0;
        let y = (viewport.height * GRID_TOP_FRACTION - size.y)
            .max(viewport.height * GRID_MIN_BOTTOM_FRACTION);

        Self {
            origin: Vec2::new(x, y),
            size,
            cell_size,
            spacing,
        }
    }

    /// Distance from one cell to the next
    pub fn pitch(&self) -> Vec2 {
        self.cell_size + Vec2::splat(self.spacing)
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            min: self.origin,
            size: self.size,
        }
    }

    /// Logical row to on-screen row; logical row 0 is drawn at the top.
    /// The mapping is its own inverse.
    #[inline]
    pub fn flip_row(row: usize) -> usize {
        GRID_ROWS - 1 - row
    }

    /// Screen rectangle of a logical cell. Every cell-to-screen conversion
    /// goes through here.
    pub fn cell_rect(&self, cell: CellCoord) -> Rect {
        let visual_row = Self::flip_row(cell.row);
        let pitch = self.pitch();
        Rect {
            min: self.origin + Vec2::new(cell.col as f32 * pitch.x, visual_row as f32 * pitch.y),
            size: self.cell_size,
        }
    }

    /// Logical cell whose bounding box is hit by `p`.
    ///
    /// `None` outside the grid, and also in the gap between two cells.
    pub fn cell_at(&self, p: Vec2) -> Option<CellCoord> {
        if !self.bounds().contains(p) {
            return None;
        }

        let local = (p - self.origin) / self.pitch();
        let col = (local.x as usize).min(GRID_COLS - 1);
        let visual_row = (local.y as usize).min(GRID_ROWS - 1);
        let cell = CellCoord::new(Self::flip_row(visual_row), col);

        self.cell_rect(cell).contains(p).then_some(cell)
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::compute(&ViewportContext::default())
    }
}

/// The authoritative level design: a fixed matrix of cells plus its layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridStore {
    cells: [[GridCell; GRID_COLS]; GRID_ROWS],
    geometry: GridGeometry,
}

impl Default for GridStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl GridStore {
    pub fn empty() -> Self {
        Self {
            cells: [[GridCell::Empty; GRID_COLS]; GRID_ROWS],
            geometry: GridGeometry::default(),
        }
    }

    /// Two rows per tier, Red on top down to Yellow
    pub fn default_layout() -> Self {
        let mut grid = Self::empty();
        for (row, cells) in grid.cells.iter_mut().enumerate() {
            cells.fill(GridCell::Brick(Tier::for_row(row)));
        }
        grid
    }

    pub fn cells(&self) -> &[[GridCell; GRID_COLS]; GRID_ROWS] {
        &self.cells
    }

    /// Replace every cell at once, keeping the geometry
    pub fn replace_cells(&mut self, cells: [[GridCell; GRID_COLS]; GRID_ROWS]) {
        self.cells = cells;
    }

    pub fn get(&self, cell: CellCoord) -> Option<GridCell> {
        self.cells.get(cell.row).and_then(|r| r.get(cell.col)).copied()
    }

    /// Write a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, cell: CellCoord, value: GridCell) {
        if let Some(slot) = self.cells.get_mut(cell.row).and_then(|r| r.get_mut(cell.col)) {
            *slot = value;
        }
    }

    /// Write a raw file code. Unknown codes and coordinates are rejected
    /// and leave the grid untouched.
    pub fn set_code(&mut self, row: usize, col: usize, code: i32) -> Result<(), GridError> {
        if row >= GRID_ROWS || col >= GRID_COLS {
            log::warn!("Rejected write to out-of-range cell [{row},{col}]");
            return Err(GridError::OutOfBounds { row, col });
        }
        let Some(value) = GridCell::from_code(code) else {
            log::warn!("Rejected invalid cell code {code} at [{row},{col}]");
            return Err(GridError::InvalidCode { row, col, code });
        };
        self.cells[row][col] = value;
        Ok(())
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Recompute layout for a new viewport size
    pub fn layout(&mut self, viewport: &ViewportContext) {
        self.geometry = GridGeometry::compute(viewport);
    }

    /// All cells in row-major order with their logical coordinate
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, GridCell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &cell)| (CellCoord::new(row, col), cell))
        })
    }

    pub fn destructible_count(&self) -> usize {
        self.iter().filter(|(_, c)| c.is_destructible()).count()
    }
}
