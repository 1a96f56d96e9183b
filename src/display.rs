use crate::messages::RecordingState;
use std::io::Write;

/// Where the recorder reports its status, sample count and alerts.
pub trait StatusDisplay {
    fn show_status(&mut self, state: RecordingState);

    fn show_count(&mut self, count: usize);

    /// Blocking, user-facing message
    fn alert(&mut self, message: &str);
}

/// Reports through tracing and, optionally, echoes to stderr.
pub struct ConsoleDisplay {
    echo: bool,
}

impl ConsoleDisplay {
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }

    fn echo(&self, line: &str) {
        if self.echo {
            let mut stderr = std::io::stderr().lock();
            if let Err(e) = writeln!(stderr, "{}", line) {
                tracing::warn!("Failed to write status line: {}", e);
            }
        }
    }
}

impl StatusDisplay for ConsoleDisplay {
    fn show_status(&mut self, state: RecordingState) {
        tracing::info!("Status: {}", state.status_text());
        self.echo(state.status_text());
    }

    fn show_count(&mut self, count: usize) {
        tracing::debug!("Total coordinates: {}", count);
        self.echo(&format!("total coordinates: {}", count));
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!("Alert: {}", message);
        self.echo(&format!("ALERT: {}", message));
    }
}

/// Keeps the latest values so tests can inspect them.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryDisplay {
    pub status: Option<&'static str>,
    pub status_updates: usize,
    pub count: Option<usize>,
    pub alerts: Vec<String>,
}

#[cfg(test)]
impl StatusDisplay for MemoryDisplay {
    fn show_status(&mut self, state: RecordingState) {
        self.status = Some(state.status_text());
        self.status_updates += 1;
    }

    fn show_count(&mut self, count: usize) {
        self.count = Some(count);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
