//! Settings provider trait

use async_trait::async_trait;

use super::settings::Settings;

/// Settings provider abstraction
///
/// Implementations:
/// - `MemorySettingsProvider`: In-memory for testing
/// - `EnvSettingsProvider`: Reads `LLM_*` environment variables
/// - `FileSettingsProvider`: Reads/writes a YAML file (~/.config/flowai/config.yaml)
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Get the current settings
    async fn settings(&self) -> ConfigResult<Settings>;

    /// Persist new settings
    async fn save(&self, settings: &Settings) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported API flavor: {0}")]
    UnsupportedFlavor(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Settings source is read-only: {0}")]
    ReadOnly(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
