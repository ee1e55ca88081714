use std::collections::VecDeque;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// A user-facing notification: a short title and a descriptive line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub detail: String,
    pub severity: Severity,
}

/// A per-viewer notification queue.
///
/// Components emit notices through a borrowed bus and the host drains them
/// after each operation. One bus lives inside each viewer instance, so two
/// viewers in the same process never see each other's notices.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    pending: VecDeque<Notice>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        self.push(title, detail, Severity::Info);
    }

    pub fn error(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        self.push(title, detail, Severity::Error);
    }

    fn push(&mut self, title: impl Into<String>, detail: impl Into<String>, severity: Severity) {
        self.pending.push_back(Notice {
            title: title.into(),
            detail: detail.into(),
            severity,
        });
    }

    /// Removes and returns all queued notices, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_drain_in_order() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.info("File loaded", "data.json has been loaded");
        bus.error("Export failed", "An error occurred while exporting");

        let notices = bus.drain();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].title, "File loaded");
        assert_eq!(notices[0].severity, Severity::Info);
        assert_eq!(notices[1].severity, Severity::Error);

        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn buses_are_independent() {
        let mut a = EventBus::new();
        let mut b = EventBus::new();
        a.info("only here", "");
        assert!(b.drain().is_empty());
        assert_eq!(a.drain().len(), 1);
    }
}
