use std::sync::Mutex;

use log::Level;

/// Logging collaborator injected into the reporter instead of relying on
/// process-wide logger state.
pub trait EventLog: Send + Sync {
    fn event(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.event(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.event(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.event(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.event(Level::Error, message);
    }
}

/// Default log sink: forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLog;

impl EventLog for FacadeLog {
    fn event(&self, level: Level, message: &str) {
        log::log!(target: "location_reporter", level, "{}", message);
    }
}

/// In-memory log capture for tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl EventLog for MemoryLog {
    fn event(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}
