//! Configuration files
//!
//! Settings are plain serde structs loaded from TOML or RON, chosen by the
//! file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::physics::dispatch::Dispatcher;
use crate::physics::gjk::{Gjk, DEFAULT_MAX_ITERATIONS};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Collision query settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Iteration cap for the GJK fallback
    pub gjk_max_iterations: usize,
    /// Emit a debug log line when GJK gives up
    pub log_gjk_exhaustion: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            gjk_max_iterations: DEFAULT_MAX_ITERATIONS,
            log_gjk_exhaustion: true,
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Dispatcher honoring these settings
    pub fn dispatcher(&self) -> Dispatcher {
        if self.gjk_max_iterations == 0 {
            log::warn!("gjk_max_iterations is 0, every unregistered pair will report a collision");
        }
        Dispatcher::new(Gjk {
            max_iterations: self.gjk_max_iterations,
            log_exhaustion: self.log_gjk_exhaustion,
        })
    }
}

impl Dispatcher {
    /// Dispatcher built from a collision configuration
    pub fn from_config(config: &CollisionConfig) -> Self {
        config.dispatcher()
    }
}
