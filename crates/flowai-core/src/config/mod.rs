//! Settings provider abstractions
//!
//! Supports multiple configuration sources:
//! - `MemorySettingsProvider`: In-memory for testing
//! - `EnvSettingsProvider`: `LLM_*` / `MCP_*` environment variables (read-only)
//! - `FileSettingsProvider`: YAML file (user level or explicit path)

mod settings;
mod traits;
mod memory;
mod env;
mod file;

pub use settings::{ApiFlavor, Settings};
pub use traits::{ConfigError, ConfigResult, SettingsProvider};
pub use memory::MemorySettingsProvider;
pub use env::EnvSettingsProvider;
pub use file::FileSettingsProvider;
