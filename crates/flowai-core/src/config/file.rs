//! File-based settings provider (YAML)
//!
//! User-level settings live in `~/.config/flowai/config.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::Settings;
use super::traits::{ConfigResult, SettingsProvider};

/// File-based settings provider
///
/// A missing file yields the default settings. The parsed file is cached
/// after the first read and refreshed on every save.
///
/// # Example
///
/// ```no_run
/// use flowai_core::config::FileSettingsProvider;
///
/// let user_settings = FileSettingsProvider::user();
/// let explicit = FileSettingsProvider::new("/etc/flowai/config.yaml");
/// ```
pub struct FileSettingsProvider {
    path: PathBuf,
    cache: RwLock<Option<Settings>>,
}

impl FileSettingsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// User-level settings (~/.config/flowai/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("flowai").join("config.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }
}

#[async_trait]
impl SettingsProvider for FileSettingsProvider {
    async fn settings(&self) -> ConfigResult<Settings> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }

        let settings = self.load()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> ConfigResult<()> {
        settings.validate()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(settings)?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(settings.clone());
        Ok(())
    }
}
