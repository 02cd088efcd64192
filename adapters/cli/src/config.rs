//! TOML configuration for the command-line host.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tilemerge_core::{GridSize, DEFAULT_GRID_SIZE};
use tilemerge_world::Config as WorldConfig;

const MIN_GRID_SIZE: u32 = 2;
const MAX_GRID_SIZE: u32 = 16;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Game settings, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Number of rows and columns of the board.
    pub(crate) grid_size: u32,
    /// Seed for tile spawning and autoplay.
    pub(crate) seed: u64,
    /// Probability that a spawned tile carries a four.
    pub(crate) four_probability: f64,
    /// Number of tiles placed when the game starts.
    pub(crate) initial_tiles: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE.get(),
            seed: 0x2048,
            four_probability: 0.1,
            initial_tiles: 2,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub(crate) fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration values.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::Validation(format!(
                "grid_size must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}"
            )));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(ConfigError::Validation(
                "four_probability must be in [0, 1]".into(),
            ));
        }
        let cells = GridSize::new(self.grid_size).cell_count();
        if self.initial_tiles == 0 || self.initial_tiles > cells {
            return Err(ConfigError::Validation(format!(
                "initial_tiles must be between 1 and {cells}"
            )));
        }
        Ok(())
    }

    /// Builds the world configuration these settings describe.
    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig::new(GridSize::new(self.grid_size), self.seed)
            .with_four_probability(self.four_probability)
            .with_opening_tiles(self.initial_tiles)
    }
}
