//! Application configuration persistence
//!
//! Stores user preferences in `~/.config/cellchain/config.yaml`. Every field
//! has a default, so a partial or missing file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::panel::{
    DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_PANEL_COLS, DEFAULT_PANEL_ROWS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Cell width in pixels for new panels
    pub cell_width: i32,
    /// Cell height in pixels for new panels
    pub cell_height: i32,
    /// Grid size of panels created from the context menu
    pub default_cols: usize,
    pub default_rows: usize,
    /// Canvas manifest used by save/load (relative to the working directory)
    pub state_file: PathBuf,
    /// TrueType/OpenType font; system locations are searched when unset
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    /// Maximum gap between clicks of a double click
    pub double_click_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            default_cols: DEFAULT_PANEL_COLS,
            default_rows: DEFAULT_PANEL_ROWS,
            state_file: PathBuf::from("state.yml"),
            font_path: None,
            font_size: 14.0,
            double_click_ms: 400,
        }
    }
}

impl AppConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from an explicit path, falling back to defaults on any
    /// problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<AppConfig>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating the directory if it doesn't exist
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// Clamp values that would break panel geometry
    fn sanitized(mut self) -> Self {
        self.cell_width = self.cell_width.max(1);
        self.cell_height = self.cell_height.max(1);
        self.default_cols = self.default_cols.max(1);
        self.default_rows = self.default_rows.max(1);
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            self.font_size = Self::default().font_size;
        }
        self
    }
}
