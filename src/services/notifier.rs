//! User-facing notifications
//!
//! Transient, single-slot messages: showing a new one replaces whatever was visible, and
//! every workflow dismisses the pending message before it shows the next.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use uuid::Uuid;

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Spinner-style "work in progress"
    Loading,
    Success,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Loading => "loading",
            NotificationLevel::Success => "success",
            NotificationLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification payload
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Notification sink
pub trait Notifier: Send + Sync {
    /// Show a notification, replacing the visible one
    fn show(&self, notification: Notification);

    /// Remove the visible notification, if any
    fn dismiss(&self);

    fn loading(&self, message: &str) {
        self.show(Notification::new(NotificationLevel::Loading, message));
    }

    fn success(&self, message: &str) {
        self.show(Notification::new(NotificationLevel::Success, message));
    }

    fn error(&self, message: &str) {
        self.show(Notification::new(NotificationLevel::Error, message));
    }
}

/// Single-slot toast with a history of everything shown, for inspection
#[derive(Debug, Clone, Default)]
pub struct ToastSlot {
    inner: Arc<Mutex<ToastState>>,
}

#[derive(Debug, Default)]
struct ToastState {
    current: Option<Notification>,
    history: Vec<Notification>,
    dismissed: usize,
}

impl ToastSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently visible notification
    pub fn current(&self) -> Option<Notification> {
        self.inner.lock().ok().and_then(|s| s.current.clone())
    }

    /// Every notification shown so far, oldest first
    pub fn history(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    /// Shown notifications of one level
    pub fn shown(&self, level: NotificationLevel) -> Vec<String> {
        self.history()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    pub fn dismiss_count(&self) -> usize {
        self.inner.lock().map(|s| s.dismissed).unwrap_or_default()
    }
}

impl Notifier for ToastSlot {
    fn show(&self, notification: Notification) {
        if let Ok(mut state) = self.inner.lock() {
            state.history.push(notification.clone());
            state.current = Some(notification);
        }
    }

    fn dismiss(&self) {
        if let Ok(mut state) = self.inner.lock() {
            if state.current.take().is_some() {
                state.dismissed += 1;
            }
        }
    }
}

/// Writes notifications to the log; used by the CLI
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => error!("{}", notification.message),
            level => info!("[{}] {}", level, notification.message),
        }
    }

    fn dismiss(&self) {}
}
