//! File-based logger
//!
//! Appends one line per message to a log file. Useful when stdout isn't
//! visible, and paired with the console logger through `FanoutLogger`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;

use super::level::LogLevel;
use super::traits::Logger;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "data/logs/app.log";

/// Logger appending `[time] [LEVEL] [target] message` lines to a file
pub struct FileLogger {
    path: PathBuf,
    target: String,
    min_level: LogLevel,
    file: Mutex<File>,
}

impl FileLogger {
    /// Open (or create) the log file at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>, target: impl Into<String>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            target: target.into(),
            min_level: LogLevel::Info,
            file: Mutex::new(file),
        })
    }

    /// Drop messages below `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Get the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }

        let mut file = self.file.lock();
        // A failing log write must never take the caller down
        let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp(), level, self.target, message);
        let _ = file.flush();
    }
}

fn timestamp() -> String {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs();
            let millis = d.subsec_millis();
            let hours = (secs % 86400) / 3600;
            let mins = (secs % 3600) / 60;
            let secs = secs % 60;
            format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
        })
        .unwrap_or_else(|_| "??:??:??.???".to_string())
}

impl Logger for FileLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.write(level, message);
    }
}
