//! Level editor: pointer selection and cell mutation on the grid
//!
//! The editor works on the grid design only; it never sees brick instances
//! or the clear counter since it runs outside a play session.

use std::path::Path;

use glam::Vec2;

use super::grid::{CellCoord, GridCell, GridStore, Tier};
use crate::ViewportContext;
use crate::persistence::{self, LevelError};

/// Help line shown while nothing is selected
pub const EDITOR_HELP: &str =
    "L-Click: Select | R-Click: Place (Shift+R-C: Indestructible) | Del: Clear";

/// Editor state: the grid being edited plus the current selection
#[derive(Debug, Clone)]
pub struct Editor {
    pub grid: GridStore,
    selection: Option<CellCoord>,
    /// Status line for the UI
    pub status: String,
    /// The level file could not be read, so saving would destroy it
    protected: bool,
}

impl Editor {
    /// Start editing a grid laid out for `viewport`
    pub fn new(mut grid: GridStore, viewport: &ViewportContext) -> Self {
        grid.layout(viewport);
        Self {
            grid,
            selection: None,
            status: EDITOR_HELP.to_string(),
            protected: false,
        }
    }

    /// Refuse to save over the level file. Used when the file exists but
    /// could not be read.
    pub fn protect_file(&mut self) {
        self.protected = true;
        self.status = "ERROR: Level file unreadable, saving disabled".to_string();
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    pub fn selection(&self) -> Option<CellCoord> {
        self.selection
    }

    /// Re-lay the grid; must happen before pointer mapping after a resize
    pub fn resize(&mut self, viewport: &ViewportContext) {
        self.grid.layout(viewport);
    }

    /// Select the cell under the pointer. Outside any cell the selection is
    /// cleared. Returns whether the selection changed.
    pub fn select_at(&mut self, pointer: Vec2) -> bool {
        let next = self.grid.geometry().cell_at(pointer);
        let changed = next != self.selection;
        self.selection = next;
        if changed {
            self.refresh_status();
        }
        changed
    }

    /// Place a brick at the selection: indestructible, or the tier that
    /// belongs to the selected row. Returns false with nothing selected.
    pub fn place_at_selection(&mut self, indestructible: bool) -> bool {
        let Some(cell) = self.selection else {
            return false;
        };
        let value = if indestructible {
            GridCell::Indestructible
        } else {
            GridCell::Brick(Tier::for_row(cell.row))
        };
        self.grid.set(cell, value);
        self.refresh_status();
        true
    }

    /// Empty the selected cell, if any. Returns whether a cell was cleared.
    pub fn clear_selection(&mut self) -> bool {
        let Some(cell) = self.selection else {
            return false;
        };
        self.grid.set(cell, GridCell::Empty);
        self.refresh_status();
        true
    }

    /// Cell value under the selection
    pub fn selected_cell(&self) -> Option<GridCell> {
        self.selection.and_then(|c| self.grid.get(c))
    }

    /// Write the grid out and report the result in the status line
    pub fn save(&mut self, path: &Path) -> Result<(), LevelError> {
        let result = if self.protected {
            Err(LevelError::Protected {
                path: path.to_path_buf(),
            })
        } else {
            persistence::write_grid(path, self.grid.cells())
        };
        match result {
            Ok(()) => {
                log::info!("Saved level to {}", path.display());
                self.status = "Level saved successfully!".to_string();
                Ok(())
            }
            Err(e) => {
                log::warn!("{e}");
                self.status = "ERROR: Could not save level!".to_string();
                Err(e)
            }
        }
    }

    fn refresh_status(&mut self) {
        self.status = match (self.selection, self.selected_cell()) {
            (Some(c), Some(value)) => {
                let kind = match value {
                    GridCell::Empty => "Empty".to_string(),
                    GridCell::Indestructible => "Indestructible".to_string(),
                    GridCell::Brick(tier) => format!("{}pts", tier.score()),
                };
                format!("Selected [{},{}] Type: {kind}", c.row, c.col)
            }
            _ => EDITOR_HELP.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRID_ROWS;

    fn editor() -> Editor {
        Editor::new(GridStore::empty(), &ViewportContext::new(1200.0, 800.0))
    }

    fn centre_of(ed: &Editor, row: usize, col: usize) -> Vec2 {
        ed.grid.geometry().cell_rect(CellCoord::new(row, col)).center()
    }

    #[test]
    fn test_select_reports_changes() {
        let mut ed = editor();
        let p = centre_of(&ed, 2, 5);
        assert!(ed.select_at(p));
        assert_eq!(ed.selection(), Some(CellCoord::new(2, 5)));
        assert!(!ed.select_at(p));
        assert!(ed.status.starts_with("Selected [2,5]"));
    }

    #[test]
    fn test_select_outside_clears() {
        let mut ed = editor();
        ed.select_at(centre_of(&ed, 0, 0));
        assert!(ed.select_at(Vec2::new(-10.0, -10.0)));
        assert_eq!(ed.selection(), None);
        assert!(!ed.select_at(Vec2::new(-10.0, -10.0)));
        assert_eq!(ed.status, EDITOR_HELP);
    }

    #[test]
    fn test_place_uses_row_tier() {
        let mut ed = editor();
        assert!(!ed.place_at_selection(false));

        ed.select_at(centre_of(&ed, 0, 3));
        assert!(ed.place_at_selection(false));
        assert_eq!(ed.selected_cell(), Some(GridCell::Brick(Tier::Red)));

        ed.select_at(centre_of(&ed, GRID_ROWS - 1, 3));
        assert!(ed.place_at_selection(false));
        assert_eq!(ed.selected_cell(), Some(GridCell::Brick(Tier::Yellow)));
        assert!(ed.status.contains("1pts"));

        assert!(ed.place_at_selection(true));
        assert_eq!(ed.selected_cell(), Some(GridCell::Indestructible));
        assert!(ed.status.contains("Indestructible"));
    }

    #[test]
    fn test_protected_editor_never_writes() {
        let path = std::env::temp_dir().join(format!(
            "brickbreak-editor-protected-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "keep me").unwrap();

        let mut ed = editor();
        ed.protect_file();
        ed.select_at(centre_of(&ed, 1, 1));
        ed.place_at_selection(false);

        let err = ed.save(&path).unwrap_err();
        assert!(matches!(err, LevelError::Protected { .. }));
        assert_eq!(ed.status, "ERROR: Could not save level!");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_clear_selection() {
        let mut ed = Editor::new(GridStore::default_layout(), &ViewportContext::new(1200.0, 800.0));
        assert!(!ed.clear_selection());

        ed.select_at(centre_of(&ed, 4, 4));
        assert!(ed.clear_selection());
        assert_eq!(ed.grid.get(CellCoord::new(4, 4)), Some(GridCell::Empty));
        assert_eq!(ed.grid.destructible_count(), GRID_ROWS * crate::consts::GRID_COLS - 1);
    }
}
