//! Level persistence
//!
//! Features:
//! - Plain-text grid format, one line per logical row
//! - Malformed cells coerced to empty instead of failing the load
//! - Default layout written out on first run

pub mod level_file;

pub use level_file::{LevelError, format_grid, parse_grid, read_grid, write_grid};
