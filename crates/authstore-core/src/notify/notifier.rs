use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::sink::{ToastSink, TracingSink};
use super::toast::{Toast, ToastKind, ToastOptions, ToastOverrides};

/// Shown when a toast is raised without a message
pub const DEFAULT_MESSAGE: &str = "Default message";

pub struct Notifier {
    sink: Box<dyn ToastSink>,
    defaults: ToastOptions,
    next_id: AtomicU64,
    active: Mutex<Vec<Toast>>,
}

impl Notifier {
    pub fn new(sink: impl ToastSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            defaults: ToastOptions::default(),
            next_id: AtomicU64::new(1),
            active: Mutex::new(Vec::new()),
        }
    }

    /// Replace the defaults applied before per-call overrides
    pub fn with_defaults(mut self, defaults: ToastOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &ToastOptions {
        &self.defaults
    }

    /// Build a toast from the defaults plus `overrides`, render it and track
    /// it until its auto-close elapses. An empty message falls back to
    /// `DEFAULT_MESSAGE`; whitespace is kept as given.
    pub fn show_toast(&self, message: &str, kind: ToastKind, overrides: ToastOverrides) -> Toast {
        let message = if message.is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            message.to_string()
        };

        let toast = Toast {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message,
            kind,
            options: overrides.apply(&self.defaults),
            shown_at: Utc::now(),
        };

        self.sink.render(&toast);

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.retain(|t| !t.is_expired_at(toast.shown_at));
        active.push(toast.clone());
        toast
    }

    pub fn success(&self, message: &str) -> Toast {
        self.show_toast(message, ToastKind::Success, ToastOverrides::default())
    }

    pub fn error(&self, message: &str) -> Toast {
        self.show_toast(message, ToastKind::Error, ToastOverrides::default())
    }

    pub fn warning(&self, message: &str) -> Toast {
        self.show_toast(message, ToastKind::Warning, ToastOverrides::default())
    }

    pub fn info(&self, message: &str) -> Toast {
        self.show_toast(message, ToastKind::Info, ToastOverrides::default())
    }

    /// Toasts still on screen now
    pub fn active(&self) -> Vec<Toast> {
        self.active_at(Utc::now())
    }

    /// Toasts still on screen at `now`; expired ones are dropped
    pub fn active_at(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        active.retain(|t| !t.is_expired_at(now));
        active.clone()
    }

    /// Close a toast before its auto-close. Returns false if it was not showing.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        let before = active.len();
        active.retain(|t| t.id != id);
        active.len() != before
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}
