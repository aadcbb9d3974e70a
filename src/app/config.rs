use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::app::items::DEFAULT_ITEMS;
use crate::wheel::frame_period;

/// Highest frame rate accepted from config or the command line
pub const MAX_FPS: u32 = 240;

/// Main configuration struct for the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animation frames per second
    pub fps: u32,
    /// Start with sound effects off
    pub muted: bool,
    /// Items placed on the wheel at startup
    pub items: Vec<String>,
    /// Fixed seed for the spin velocity, for reproducible spins
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            muted: false,
            items: DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect(),
            seed: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Applies command-line overrides on top of this configuration
    pub fn with_overrides(
        mut self,
        items: Vec<String>,
        fps: Option<u32>,
        mute: bool,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if !items.is_empty() {
            self.items = items;
        }
        if let Some(fps) = fps {
            self.fps = fps;
        }
        if mute {
            self.muted = true;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self.validate()?;
        Ok(self)
    }

    /// Time between animation frames
    pub fn frame_period(&self) -> Duration {
        frame_period(self.fps)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::Invalid(format!(
                "fps must be between 1 and {}, got {}",
                MAX_FPS, self.fps
            )));
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
