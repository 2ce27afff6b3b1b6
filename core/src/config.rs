//! Application settings
//!
//! Persisted as TOML through confy under `screen-overlay/config`. The picker's
//! binary session record lives in a separate file (see [`crate::state`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ConfigError;

const APP_NAME: &str = "screen-overlay";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

fn default_fifo_path() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("screen-overlay.fifo")
}

fn default_state_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_NAME)
        .join("picker.state")
}

fn default_background_color() -> [u8; 3] {
    [0xc0, 0xc0, 0xc0]
}

fn default_cursor_color() -> [u8; 3] {
    [0x50, 0x50, 0x50]
}

fn default_crosshair_color() -> [u8; 3] {
    [0x00, 0x00, 0x00]
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Named pipe carrying colors from the picker to the overlay
    #[serde(default = "default_fifo_path")]
    pub fifo_path: PathBuf,

    /// Where the picker remembers its last color and cursor positions
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Picker window background
    #[serde(default = "default_background_color")]
    pub background_color: [u8; 3],

    /// Value/opacity markers and labels
    #[serde(default = "default_cursor_color")]
    pub cursor_color: [u8; 3],

    /// Spectrum crosshair
    #[serde(default = "default_crosshair_color")]
    pub crosshair_color: [u8; 3],

    /// Open a picker immediately on startup
    #[serde(default = "default_true")]
    pub show_startup_picker: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fifo_path: default_fifo_path(),
            state_file: default_state_file(),
            background_color: default_background_color(),
            cursor_color: default_cursor_color(),
            crosshair_color: default_crosshair_color(),
            show_startup_picker: true,
        }
    }
}

impl AppConfig {
    /// Load from the user config directory; writes defaults on first run
    pub fn load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    /// Like [`AppConfig::load`] but falls back to defaults on error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load configuration, using defaults");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(confy::load_path(path)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    /// Colors used to paint the picker window
    pub fn palette(&self) -> Palette {
        Palette {
            background: self.background_color.into(),
            cursor: self.cursor_color.into(),
            crosshair: self.crosshair_color.into(),
        }
    }
}

/// Resolved picker colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub cursor: Rgb,
    pub crosshair: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        AppConfig::default().palette()
    }
}
