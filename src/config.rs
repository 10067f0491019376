use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Playback delay numerator in milliseconds.
///
/// The per-frame delay is `round(DELAY_NUMERATOR_MS / fps)`. This is an
/// empirical tuning value, deliberately not 1000.
pub const DELAY_NUMERATOR_MS: f64 = 454.0;

/// Main configuration for chroma-overlay
///
/// Every default reproduces the overlay's stock behavior, so running without a
/// configuration file plays `video.mp4` in a 500x600 window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input settings
    pub video: VideoConfig,

    /// Overlay window settings
    pub window: WindowConfig,

    /// Playback timing
    pub playback: PlaybackConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        self.window.validate()?;
        self.playback.validate()?;
        Ok(())
    }
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Video (or still image) to play
    pub path: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("video.mp4"),
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "video.path".to_string(),
                value: String::new(),
            }.into());
        }

        Ok(())
    }
}

/// Overlay window configuration
///
/// `width` and `height` are both the window's inner size and the bounding box
/// the video is fitted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title (shown by task switchers only; the window has no decorations)
    pub title: String,

    /// Inner width in physical pixels
    pub width: u32,

    /// Inner height in physical pixels
    pub height: u32,

    /// Keep the overlay above other windows
    pub always_on_top: bool,

    /// Key color painted behind keyed pixels when the window system cannot
    /// blend window alpha; with alpha blending the background is fully transparent
    pub transparent_color: [u8; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Video Player".to_string(),
            width: 500,
            height: 600,
            always_on_top: true,
            transparent_color: [0, 0, 0],
        }
    }
}

impl WindowConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "window.size".to_string(),
                value: format!("{}x{}", self.width, self.height)
            }.into());
        }

        Ok(())
    }
}

/// Playback timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Numerator of the per-frame delay, in milliseconds
    pub delay_numerator_ms: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            delay_numerator_ms: DELAY_NUMERATOR_MS,
        }
    }
}

impl PlaybackConfig {
    fn validate(&self) -> Result<()> {
        if !self.delay_numerator_ms.is_finite() || self.delay_numerator_ms <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "playback.delay_numerator_ms".to_string(),
                value: self.delay_numerator_ms.to_string()
            }.into());
        }

        Ok(())
    }
}
