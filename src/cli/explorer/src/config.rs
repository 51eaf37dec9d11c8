use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};

use node_aggregator::config::AggregatorConfig;

/// Configuration for the explorer CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Endpoints and timeouts for the aggregation sources
    pub aggregator: AggregatorConfig,
    /// Rows shown by the leaderboard command when --limit is not given
    pub default_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aggregator: AggregatorConfig::default(),
            default_limit: 20,
        }
    }
}

impl Config {
    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_default()
            .join("stakeboard")
            .join("config.toml")
    }

    /// Load configuration from file
    pub fn load() -> Result<Self, io::Error> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let config_str = fs::read_to_string(&config_path)?;
        let config = toml::from_str::<Config>(&config_str)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), io::Error> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(&config_path, toml)?;

        Ok(())
    }
}
