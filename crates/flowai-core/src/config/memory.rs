//! In-memory settings provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::Settings;
use super::traits::{ConfigResult, SettingsProvider};

/// In-memory settings provider for testing
#[derive(Debug, Default)]
pub struct MemorySettingsProvider {
    settings: RwLock<Settings>,
}

impl MemorySettingsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsProvider for MemorySettingsProvider {
    async fn settings(&self) -> ConfigResult<Settings> {
        Ok(self.settings.read().clone())
    }

    async fn save(&self, settings: &Settings) -> ConfigResult<()> {
        settings.validate()?;
        *self.settings.write() = settings.clone();
        Ok(())
    }
}
