//! Level file format
//!
//! `GRID_ROWS` lines, top tier first, each holding `GRID_COLS` integers
//! separated by single spaces and terminated by `\n`. Valid codes are
//! `-1 0 1 3 5 7`.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{GRID_COLS, GRID_ROWS};
use crate::level::GridCell;

pub type Cells = [[GridCell; GRID_COLS]; GRID_ROWS];

/// Level file I/O failures
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write level file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to overwrite unreadable level file {path}")]
    Protected { path: PathBuf },
}

impl LevelError {
    /// The file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        match self {
            LevelError::Read { source, .. } => source.kind() == io::ErrorKind::NotFound,
            LevelError::Write { .. } | LevelError::Protected { .. } => false,
        }
    }
}

/// Render cells in the file format
pub fn format_grid(cells: &Cells) -> String {
    let mut out = String::with_capacity(GRID_ROWS * GRID_COLS * 3);
    for row in cells {
        for (col, cell) in row.iter().enumerate() {
            if col > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}", cell.code());
        }
        out.push('\n');
    }
    out
}

/// Parse file text into a complete grid.
///
/// Missing, non-numeric or unknown values become `Empty`; the second value
/// is how many cells had to be coerced. Extra tokens and lines are ignored.
pub fn parse_grid(text: &str) -> (Cells, usize) {
    let mut cells = [[GridCell::Empty; GRID_COLS]; GRID_ROWS];
    let mut invalid = 0;
    let mut lines = text.lines();

    for (r, row) in cells.iter_mut().enumerate() {
        let mut tokens = lines.next().unwrap_or("").split_whitespace();
        for (c, cell) in row.iter_mut().enumerate() {
            let parsed = tokens.next().map(|t| (t, t.parse::<i32>()));
            *cell = match parsed {
                Some((_, Ok(code))) => match GridCell::from_code(code) {
                    Some(value) => value,
                    None => {
                        log::warn!("Invalid cell code {code} at r{r}, c{c}; using empty");
                        invalid += 1;
                        GridCell::Empty
                    }
                },
                Some((token, Err(_))) => {
                    log::warn!("Unreadable cell {token:?} at r{r}, c{c}; using empty");
                    invalid += 1;
                    GridCell::Empty
                }
                None => {
                    log::warn!("Missing cell at r{r}, c{c}; using empty");
                    invalid += 1;
                    GridCell::Empty
                }
            };
        }
    }

    (cells, invalid)
}

/// Read and parse a level file.
///
/// Bytes that are not UTF-8 end up in unreadable tokens, so they only
/// empty the cells they sit in.
pub fn read_grid(path: &Path) -> Result<(Cells, usize), LevelError> {
    let bytes = fs::read(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_grid(&String::from_utf8_lossy(&bytes)))
}

/// Write a level file, replacing whatever was there
pub fn write_grid(path: &Path, cells: &Cells) -> Result<(), LevelError> {
    fs::write(path, format_grid(cells)).map_err(|source| LevelError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{GridStore, Tier};

    #[test]
    fn test_format_default_layout() {
        let text = format_grid(GridStore::default_layout().cells());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), GRID_ROWS);
        assert_eq!(lines[0], vec!["7"; GRID_COLS].join(" "));
        assert_eq!(lines[3], vec!["5"; GRID_COLS].join(" "));
        assert_eq!(lines[7], vec!["1"; GRID_COLS].join(" "));
        assert!(text.ends_with("1\n"));
    }

    #[test]
    fn test_parse_well_formed() {
        let mut cells = *GridStore::default_layout().cells();
        cells[2][4] = GridCell::Indestructible;
        cells[6][13] = GridCell::Empty;

        let (parsed, invalid) = parse_grid(&format_grid(&cells));
        assert_eq!(invalid, 0);
        assert_eq!(parsed, cells);
    }

    #[test]
    fn test_parse_coerces_bad_values() {
        let mut text = format_grid(GridStore::default_layout().cells());
        // Corrupt the first two cells of row 0
        text.replace_range(0..3, "9 x");

        let (parsed, invalid) = parse_grid(&text);
        assert_eq!(invalid, 2);
        assert_eq!(parsed[0][0], GridCell::Empty);
        assert_eq!(parsed[0][1], GridCell::Empty);
        assert_eq!(parsed[0][2], GridCell::Brick(Tier::Red));
    }

    #[test]
    fn test_parse_short_file_fills_empty() {
        let (parsed, invalid) = parse_grid("7 7\n");
        assert_eq!(parsed[0][0], GridCell::Brick(Tier::Red));
        assert_eq!(parsed[0][1], GridCell::Brick(Tier::Red));
        assert!(parsed[1].iter().all(|c| c.is_empty()));
        assert_eq!(invalid, GRID_ROWS * GRID_COLS - 2);
    }

    #[test]
    fn test_invalid_utf8_only_empties_its_cell() {
        let path = std::env::temp_dir().join(format!(
            "brickbreak-level-file-utf8-{}.txt",
            std::process::id()
        ));
        let mut bytes = format_grid(GridStore::default_layout().cells()).into_bytes();
        // Last cell of row 0 ("7") becomes 0xFF
        let last = bytes.iter().position(|&b| b == b'\n').unwrap() - 1;
        bytes[last] = 0xFF;
        fs::write(&path, &bytes).unwrap();

        let (parsed, invalid) = read_grid(&path).unwrap();
        assert_eq!(invalid, 1);
        assert_eq!(parsed[0][GRID_COLS - 1], GridCell::Empty);
        assert_eq!(parsed[0][0], GridCell::Brick(Tier::Red));
        assert_eq!(parsed[1][GRID_COLS - 1], GridCell::Brick(Tier::Red));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let path = std::env::temp_dir().join("brickbreak-level-file-does-not-exist.txt");
        let err = read_grid(&path).unwrap_err();
        assert!(err.is_not_found());
    }
}
