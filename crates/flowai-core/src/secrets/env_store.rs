//! Environment variable secret store

use std::collections::HashMap;
use std::env;

use once_cell::sync::Lazy;

use super::traits::SecretStore;

/// Mapping from endpoint flavors to environment variable names
static ENV_VAR_MAP: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("openai", vec!["OPENAI_API_KEY", "LLM_API_KEY"]);
    m.insert("openai-compatible", vec!["OPENAI_API_KEY", "LLM_API_KEY"]);
    // Local servers don't need a key
    m.insert("ollama", vec![]);
    m.insert("lmstudio", vec![]);
    m
});

/// Credentials from the process environment
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    _private: (),
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Get the environment variable names for a flavor
    pub fn env_vars_for(flavor: &str) -> Option<&'static [&'static str]> {
        ENV_VAR_MAP.get(flavor.to_lowercase().as_str()).map(|v| v.as_slice())
    }

    fn read(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = Self::read(key) {
            return Some(value);
        }

        Self::env_vars_for(key)?
            .iter()
            .find_map(|var| Self::read(var))
    }
}
