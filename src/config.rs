//! Game configuration
//!
//! Stored as JSON next to the level file. Every field has a default, so a
//! partial file only overrides what it names.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ViewportContext;

/// Config file failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Level file shared by the game and the editor
    pub level_path: PathBuf,
    pub starting_lives: u32,

    // === Launch ===
    /// Horizontal launch speed as a fraction of viewport width
    pub launch_speed_x_factor: f32,
    /// Vertical launch speed as a fraction of viewport height
    pub launch_speed_y_factor: f32,
    /// Speed multiplier for each one-off boost
    pub speed_boost: f32,

    /// Seed for launch directions
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level_path: PathBuf::from("level.txt"),
            starting_lives: 3,

            launch_speed_x_factor: 0.25,
            launch_speed_y_factor: 0.25,
            speed_boost: 1.19,

            seed: 0x5EED,
        }
    }
}

impl GameConfig {
    /// Load from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Default serve velocity; `direction` picks the horizontal sign
    pub fn launch_velocity(&self, viewport: &ViewportContext, direction: f32) -> Vec2 {
        Vec2::new(
            viewport.width * self.launch_speed_x_factor * direction.signum(),
            (viewport.height * self.launch_speed_y_factor).abs(),
        )
    }

    /// Below this speed a lost ball does not carry its speed to the next serve
    pub fn preserve_speed_threshold(&self, viewport: &ViewportContext) -> f32 {
        viewport.width * self.launch_speed_x_factor * 0.8
    }
}
