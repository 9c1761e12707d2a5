use std::path::Path;

use crate::checkpoint::CheckpointManagerConfig;
use crate::error::ConfigError;
use crate::training::TrainerConfig;

/// Network architecture section of the configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden_layer_sizes: Vec<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            hidden_layer_sizes: vec![128],
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub training: TrainerConfig,
    pub checkpoint: CheckpointManagerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            eprintln!(
                "Warning: config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.hidden_layer_sizes.is_empty() {
            return Err(ConfigError::Validation(
                "network.hidden_layer_sizes must name at least one layer".into(),
            ));
        }
        if self.network.hidden_layer_sizes.iter().any(|&s| s == 0) {
            return Err(ConfigError::Validation(
                "network.hidden_layer_sizes entries must be > 0".into(),
            ));
        }
        if self.training.num_iterations == 0 {
            return Err(ConfigError::Validation(
                "training.num_iterations must be > 0".into(),
            ));
        }
        if self.training.games_per_iteration == 0 {
            return Err(ConfigError::Validation(
                "training.games_per_iteration must be > 0".into(),
            ));
        }
        if self.training.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(
                "training.learning_rate must be > 0".into(),
            ));
        }
        if self.training.discount_rate <= 0.0 || self.training.discount_rate >= 1.0 {
            return Err(ConfigError::Validation(
                "training.discount_rate must be in (0, 1)".into(),
            ));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
