//! Console logger
//!
//! Info lines go to stdout, all other levels to stderr.

use super::level::LogLevel;
use super::traits::Logger;

/// Prints `[prefix] LEVEL: message` lines
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            prefix: "[FlowAI]".to_string(),
            min_level: LogLevel::Info,
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new()
        }
    }

    /// Drop messages below `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        if level == LogLevel::Info {
            println!("{} {}: {}", self.prefix, level.as_str(), message);
        } else {
            eprintln!("{} {}: {}", self.prefix, level.as_str(), message);
        }
    }
}
