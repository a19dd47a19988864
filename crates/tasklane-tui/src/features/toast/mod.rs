//! Transient notifications, stacked in the top-right corner.

mod render;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub use render::render_toasts;
use tasklane_core::notify::Notification;

/// Maximum number of toasts on screen at once.
pub const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct ToastState {
    items: VecDeque<Toast>,
    duration: Duration,
}

impl ToastState {
    pub fn new(duration: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            duration,
        }
    }

    pub fn push(&mut self, notification: Notification, now: Instant) {
        tracing::debug!(severity = notification.severity.label(), "{}", notification.message);
        self.items.push_back(Toast {
            notification,
            expires_at: now + self.duration,
        });
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    /// Drops expired toasts. Returns true when something was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.expires_at > now);
        self.items.len() != before
    }

    /// Visible toasts, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|t| t.notification.message.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
