use std::path::Path;

use serde::Deserialize;

use crate::error::{non_negative, positive, ConfigError, ConfigResult};
use crate::solver::SolverParams;
use crate::state::check_grid_size;

pub const CONFIG_FILE: &str = "convecta.yaml";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub physics: SolverParams,
    pub clock: ClockConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Interior side length N.
    pub size: usize,
    /// Seed for the cooling jitter.
    pub seed: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Simulated seconds per wall-clock second.
    pub time_scale: f64,
    /// Ticks per simulated second.
    pub tick_rate: f64,
    /// Longest frame gap (seconds) fed to the accumulator.
    pub max_frame_delta: f64,
    pub max_ticks_per_frame: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: 64, seed: 42 }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_scale: 2.5,
            tick_rate: 60.0,
            max_frame_delta: 0.1,
            max_ticks_per_frame: 8,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            target_fps: 60,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        non_negative("time_scale", self.time_scale)?;
        positive("tick_rate", self.tick_rate)?;
        positive("max_frame_delta", self.max_frame_delta)?;
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::ZeroCount { name: "max_ticks_per_frame" });
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> ConfigResult<()> {
        check_grid_size(self.grid.size)?;
        self.physics.validate()?;
        self.clock.validate()?;
        if self.display.width == 0 {
            return Err(ConfigError::ZeroCount { name: "width" });
        }
        if self.display.height == 0 {
            return Err(ConfigError::ZeroCount { name: "height" });
        }
        if self.display.target_fps == 0 {
            return Err(ConfigError::ZeroCount { name: "target_fps" });
        }
        Ok(())
    }
}

/// Load `convecta.yaml` from the working directory, falling back to defaults.
pub fn load() -> Config {
    load_from(Path::new(CONFIG_FILE))
}

pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str(&contents) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("failed to parse {}: {e}; using defaults", path.display());
                Config::default()
            }
        },
        Err(e) => {
            log::warn!("failed to read {}: {e}; using defaults", path.display());
            Config::default()
        }
    }
}
