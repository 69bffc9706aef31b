//! Viewer configuration (window plus starfield tuning). Loaded from starfield.ron at startup.

use serde::{Deserialize, Serialize};
use starfield::StarfieldConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "starfield.ron";

/// Persistent viewer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Frames between saved PNGs in headless mode.
    #[serde(default = "default_snapshot_every")]
    pub snapshot_every: u32,
    #[serde(default)]
    pub starfield: StarfieldConfig,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_snapshot_every() -> u32 {
    30
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            snapshot_every: default_snapshot_every(),
            starfield: StarfieldConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load config from `path`, or `starfield.ron` in the current directory.
    /// A missing or invalid file yields the default config.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
        match std::fs::read_to_string(&path) {
            Ok(data) => match Self::parse(&data) {
                Ok(c) => {
                    log::info!("Loaded config from {:?}", path);
                    return c;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {:?}, using defaults", path);
            }
            Err(e) => log::warn!("Could not read config at {:?}: {}, using defaults", path, e),
        }
        Self::default()
    }

    /// Parse a RON document and check the nested starfield settings.
    pub fn parse(data: &str) -> Result<Self, String> {
        let config: Self = ron::from_str(data).map_err(|e| e.to_string())?;
        config.starfield.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    /// Save current config to `path`. Logs on error.
    pub fn save(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(DEFAULT_CONFIG_FILE)
}
