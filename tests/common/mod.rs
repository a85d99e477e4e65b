#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use json_rest_client::{Level, Logger};

/// Logger that keeps every line for later assertions.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingLogger {
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .expect("log mutex must not be poisoned")
            .iter()
            .filter(|(line_level, _)| *line_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lines_at(Level::WARN)
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines_at(Level::ERROR)
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines
            .lock()
            .expect("log mutex must not be poisoned")
            .push((level, message.to_owned()));
    }
}
