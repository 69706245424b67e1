//! Logging abstractions for runtime-agnostic logging
//!
//! Components hold an `Arc<dyn Logger>` handed to them at construction; core
//! code never reaches for a process-wide logger.

mod traits;
mod level;
mod noop;
mod console;
mod file;
mod fanout;
mod recording;

pub use traits::{Logger, SharedLogger};
pub use level::LogLevel;
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use file::{FileLogger, DEFAULT_LOG_FILE};
pub use fanout::FanoutLogger;
pub use recording::RecordingLogger;
