//! Logger forwarding every message to several sinks

use std::sync::Arc;

use super::level::LogLevel;
use super::traits::Logger;

/// Forwards each message to every wrapped logger, in order
#[derive(Clone, Default)]
pub struct FanoutLogger {
    sinks: Vec<Arc<dyn Logger>>,
}

impl FanoutLogger {
    pub fn new(sinks: Vec<Arc<dyn Logger>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn Logger>) {
        self.sinks.push(sink);
    }
}

impl Logger for FanoutLogger {
    fn log(&self, level: LogLevel, message: &str) {
        for sink in &self.sinks {
            sink.log(level, message);
        }
    }
}
