//! Player configuration with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[playback]` keeps the default layout and logging settings.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "algotty.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playback: PlaybackConfig,
    pub layout: LayoutConfig,
    pub logging: LoggingConfig,
}

/// Timing of automatic advances and transient cues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between automatic advances at speed 1.0
    pub base_delay_ms: u64,
    pub default_speed: f64,
    /// Increment used by the speed up/down keys
    pub speed_step: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub swap_highlight_ms: u64,
    pub compare_highlight_ms: u64,
    pub variable_cue_ms: u64,
    pub narration_cue_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            base_delay_ms: 1000,
            default_speed: 1.0,
            speed_step: 0.25,
            min_speed: 0.25,
            max_speed: 4.0,
            swap_highlight_ms: 300,
            compare_highlight_ms: 500,
            variable_cue_ms: 800,
            narration_cue_ms: 500,
        }
    }
}

impl PlaybackConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Clamp a requested speed into the configured range
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        let low = self.min_speed.min(self.max_speed);
        let high = self.min_speed.max(self.max_speed);
        speed.max(low).min(high)
    }

    /// Replace speed settings a config file got wrong: unusable bounds fall
    /// back to the defaults, swapped bounds are put in order
    fn sanitize(&mut self) {
        let defaults = PlaybackConfig::default();
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !usable(self.min_speed) {
            log::warn!("invalid min_speed {}; using {}", self.min_speed, defaults.min_speed);
            self.min_speed = defaults.min_speed;
        }
        if !usable(self.max_speed) {
            log::warn!("invalid max_speed {}; using {}", self.max_speed, defaults.max_speed);
            self.max_speed = defaults.max_speed;
        }
        if self.min_speed > self.max_speed {
            log::warn!(
                "min_speed {} is above max_speed {}; swapping them",
                self.min_speed,
                self.max_speed
            );
            std::mem::swap(&mut self.min_speed, &mut self.max_speed);
        }
        if !usable(self.speed_step) {
            self.speed_step = defaults.speed_step;
        }
        if !usable(self.default_speed) {
            self.default_speed = defaults.default_speed;
        }
        self.default_speed = self.clamp_speed(self.default_speed);
    }
}

/// Layout units used by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub surface_width: f32,
    pub surface_height: f32,
    /// Horizontal offset of the root's children; shrinks by 0.6 per level
    pub tree_spacing: f32,
    pub tree_row_height: f32,
    pub tree_root_y: f32,
    pub graph_node_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            surface_width: 400.0,
            surface_height: 300.0,
            tree_spacing: 100.0,
            tree_row_height: 60.0,
            tree_root_y: 50.0,
            graph_node_radius: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
    /// Log destination; the terminal is in raw mode, so logs need a file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let mut config: Config = toml::from_str(&content).map_err(|e| LoadError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.playback.sanitize();
        Ok(config)
    }

    /// Load the explicit file if given, else `algotty.toml` if it exists, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self, LoadError> {
        match explicit {
            Some(path) => Config::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Config::load(fallback)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }
}
