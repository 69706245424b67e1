//! Environment variable settings provider

use std::collections::HashMap;
use std::env;

use async_trait::async_trait;

use super::settings::Settings;
use super::traits::{ConfigError, ConfigResult, SettingsProvider};

pub const ENV_BASE_URL: &str = "LLM_BASE_URL";
pub const ENV_PORT: &str = "LLM_PORT";
pub const ENV_API_FLAVOR: &str = "LLM_API_FLAVOR";
pub const ENV_DEFAULT_MODEL: &str = "LLM_DEFAULT_MODEL";
pub const ENV_API_KEY: &str = "LLM_API_KEY";
pub const ENV_MCP_BASE_URL: &str = "MCP_BASE_URL";
pub const ENV_TEMPERATURE: &str = "LLM_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "LLM_MAX_TOKENS";

/// Settings read from `LLM_*` / `MCP_*` environment variables
///
/// Unset or empty variables keep their default. This source is read-only;
/// persist settings through a `FileSettingsProvider` instead.
#[derive(Debug, Default)]
pub struct EnvSettingsProvider {
    /// Fixed variable set used instead of the process environment
    overrides: Option<HashMap<String, String>>,
}

impl EnvSettingsProvider {
    /// Read from the process environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from a fixed variable set instead of the process environment
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self {
            overrides: Some(vars),
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(vars) => vars.get(key).cloned(),
            None => env::var(key).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.var(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::invalid(key, raw)),
            None => Ok(None),
        }
    }

    fn load(&self) -> ConfigResult<Settings> {
        let mut settings = Settings::default();

        if let Some(base_url) = self.var(ENV_BASE_URL) {
            settings.base_url = base_url;
        }
        if let Some(port) = self.parsed(ENV_PORT)? {
            settings.port = port;
        }
        if let Some(flavor) = self.var(ENV_API_FLAVOR) {
            settings.api_flavor = flavor.parse()?;
        }
        if let Some(model) = self.var(ENV_DEFAULT_MODEL) {
            settings.default_model = model;
        }
        settings.api_key = self.var(ENV_API_KEY);
        if let Some(url) = self.var(ENV_MCP_BASE_URL) {
            settings.mcp_base_url = url;
        }
        if let Some(temperature) = self.parsed(ENV_TEMPERATURE)? {
            settings.temperature = temperature;
        }
        if let Some(max_tokens) = self.parsed(ENV_MAX_TOKENS)? {
            settings.max_tokens = max_tokens;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[async_trait]
impl SettingsProvider for EnvSettingsProvider {
    async fn settings(&self) -> ConfigResult<Settings> {
        self.load()
    }

    async fn save(&self, _settings: &Settings) -> ConfigResult<()> {
        Err(ConfigError::ReadOnly("environment".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiFlavor;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_reads_variables() {
        let provider = EnvSettingsProvider::from_vars(vars(&[
            (ENV_BASE_URL, "http://192.168.1.23"),
            (ENV_PORT, "11434"),
            (ENV_API_FLAVOR, "ollama"),
            (ENV_DEFAULT_MODEL, "mistral"),
            (ENV_MCP_BASE_URL, "http://tools:8000"),
        ]));

        let settings = provider.settings().await.unwrap();
        assert_eq!(settings.llm_endpoint(), "http://192.168.1.23:11434");
        assert_eq!(settings.api_flavor, ApiFlavor::Ollama);
        assert_eq!(settings.default_model, "mistral");
        assert_eq!(settings.mcp_base_url, "http://tools:8000");
        assert_eq!(settings.api_key, None);
    }

    #[tokio::test]
    async fn test_empty_variables_keep_defaults() {
        let provider = EnvSettingsProvider::from_vars(vars(&[(ENV_PORT, " "), (ENV_DEFAULT_MODEL, "")]));
        assert_eq!(provider.settings().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_invalid_values_are_reported() {
        let provider = EnvSettingsProvider::from_vars(vars(&[(ENV_PORT, "eighty")]));
        assert!(matches!(
            provider.settings().await,
            Err(ConfigError::InvalidValue { .. })
        ));

        let provider = EnvSettingsProvider::from_vars(vars(&[(ENV_API_FLAVOR, "bedrock")]));
        assert!(matches!(
            provider.settings().await,
            Err(ConfigError::UnsupportedFlavor(_))
        ));
    }

    #[tokio::test]
    async fn test_is_read_only() {
        let provider = EnvSettingsProvider::from_vars(HashMap::new());
        assert!(matches!(
            provider.save(&Settings::default()).await,
            Err(ConfigError::ReadOnly(_))
        ));
    }
}
