use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub shown_at: Instant,
}

/// Notification banners, newest first
#[derive(Debug)]
pub struct Alerts {
    items: VecDeque<Alert>,
    ttl: Duration,
    max_visible: usize,
}

impl Alerts {
    pub fn new(ttl: Duration, max_visible: usize) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
            max_visible,
        }
    }

    pub fn show(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.show_at(kind, message, Instant::now());
    }

    pub fn show_at(&mut self, kind: AlertKind, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match kind {
            AlertKind::Success => tracing::info!(%message, "alert"),
            AlertKind::Error => tracing::warn!(%message, "alert"),
        }
        self.items.push_front(Alert {
            kind,
            message,
            shown_at: now,
        });
    }

    /// Drop alerts older than the time to live
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|a| now.saturating_duration_since(a.shown_at) < ttl);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Alert> {
        self.items.iter().take(self.max_visible)
    }

    pub fn visible_count(&self) -> usize {
        self.items.len().min(self.max_visible)
    }

    pub fn latest(&self) -> Option<&Alert> {
        self.items.front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
