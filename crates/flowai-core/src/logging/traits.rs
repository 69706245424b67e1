//! Leveled text sink

use std::sync::Arc;

use super::level::LogLevel;

/// Sink for leveled log lines
///
/// Sinks implement `log`; the per-level helpers forward to it.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Logger handle passed to every component at construction
pub type SharedLogger = Arc<dyn Logger>;
