//=========================================================================
// Game Configuration
//=========================================================================
//
// Startup settings and their optional JSON overrides.
//
// Document shape (every field optional):
// ```json
// {
//   "name": "My Game",
//   "window": { "size": { "width": 1280, "height": 720 }, "fullscreen": false },
//   "editor": { "visible": true }
// }
// ```
//
// Missing fields leave the corresponding setting untouched, including a
// lone `width` or `height`. A size with a zero dimension is skipped with a
// warning. A missing or malformed file is a fatal startup error.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::paths;

//=== WindowSize ==========================================================

/// Window client area size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are non-zero.
    pub const fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

//=== GameSettings ========================================================

/// Runtime settings of a game.
///
/// Changed at startup by the builder and the config file, and at run time
/// through [`crate::GameHandle`] commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// Used as the window title.
    pub name: String,
    pub window_size: WindowSize,
    pub full_screen: bool,
    pub editor_visible: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            name: "Game".to_string(),
            window_size: WindowSize::new(640, 480),
            full_screen: false,
            editor_visible: false,
        }
    }
}

//=== ConfigError =========================================================

/// Failure to obtain a config document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

//=== GameConfig ==========================================================

/// Parsed config document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub window: Option<WindowConfig>,

    #[serde(default)]
    pub editor: Option<EditorConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WindowConfig {
    #[serde(default)]
    pub size: Option<WindowSizeConfig>,

    #[serde(default)]
    pub fullscreen: Option<bool>,
}

/// Size override; each dimension is optional on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct WindowSizeConfig {
    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,
}

impl WindowSizeConfig {
    /// Fills the dimensions this override leaves out from `base`.
    pub fn merged_with(&self, base: WindowSize) -> WindowSize {
        WindowSize::new(self.width.unwrap_or(base.width), self.height.unwrap_or(base.height))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub visible: Option<bool>,
}

impl GameConfig {
    /// Parses a config document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads and parses `<dir>/<name>.json`.
    pub fn load(dir: &Path, name: &str) -> Result<Self, ConfigError> {
        let path = paths::json_path(dir, name);
        debug!(target: "config", "Loading config from {}", path.display());

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config =
            Self::from_json(&text).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

        info!(target: "config", "Loaded config {}", path.display());
        Ok(config)
    }

    /// Overwrites the settings this document specifies.
    pub fn apply(&self, settings: &mut GameSettings) {
        if let Some(name) = &self.name {
            settings.name = name.clone();
        }

        if let Some(window) = &self.window {
            if let Some(size) = window.size {
                let merged = size.merged_with(settings.window_size);
                if merged.is_positive() {
                    settings.window_size = merged;
                } else {
                    warn!(
                        target: "config",
                        "Ignoring window size {}x{}, both dimensions must be positive",
                        merged.width,
                        merged.height
                    );
                }
            }
            if let Some(fullscreen) = window.fullscreen {
                settings.full_screen = fullscreen;
            }
        }

        if let Some(visible) = self.editor.as_ref().and_then(|editor| editor.visible) {
            settings.editor_visible = visible;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
