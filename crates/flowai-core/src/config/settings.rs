//! Connection and model settings

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult};
use crate::types::CompletionOptions;

/// Which wire dialect the LLM endpoint speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiFlavor {
    #[default]
    #[serde(rename = "openai-compatible")]
    OpenAiCompatible,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "lmstudio")]
    LmStudio,
}

impl ApiFlavor {
    pub const ALL: [ApiFlavor; 3] = [ApiFlavor::OpenAiCompatible, ApiFlavor::Ollama, ApiFlavor::LmStudio];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFlavor::OpenAiCompatible => "openai-compatible",
            ApiFlavor::Ollama => "ollama",
            ApiFlavor::LmStudio => "lmstudio",
        }
    }
}

impl std::fmt::Display for ApiFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiFlavor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai-compatible" | "openai" => Ok(ApiFlavor::OpenAiCompatible),
            "ollama" => Ok(ApiFlavor::Ollama),
            "lmstudio" | "lm-studio" => Ok(ApiFlavor::LmStudio),
            other => Err(ConfigError::UnsupportedFlavor(other.to_string())),
        }
    }
}

/// Settings for the LLM endpoint and the tool server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scheme and host of the LLM endpoint, e.g. `http://192.168.1.23`
    pub base_url: String,
    pub port: u16,
    pub api_flavor: ApiFlavor,
    pub default_model: String,
    /// Bearer key for OpenAI-compatible endpoints (falls back to the secret store)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the JSON-RPC tool server
    pub mcp_base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            port: 1234,
            api_flavor: ApiFlavor::OpenAiCompatible,
            default_model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            mcp_base_url: "http://localhost:8000".to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

impl Settings {
    /// `base_url:port` of the LLM endpoint
    pub fn llm_endpoint(&self) -> String {
        format!("{}:{}", self.base_url.trim_end_matches('/'), self.port)
    }

    /// Completion options for the configured default model
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions::new(self.default_model.clone())
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }

    /// Reject values no endpoint can work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("base_url", &self.base_url));
        }
        if self.port == 0 {
            return Err(ConfigError::invalid("port", self.port.to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid("temperature", self.temperature.to_string()));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("max_tokens", "0"));
        }
        if self.mcp_base_url.trim().is_empty() {
            return Err(ConfigError::invalid("mcp_base_url", &self.mcp_base_url));
        }
        Ok(())
    }
}
