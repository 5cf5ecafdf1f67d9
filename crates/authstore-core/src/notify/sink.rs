use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use super::toast::{Toast, ToastKind};
use crate::utils::{strip_html, truncate_string};

/// Maximum message width for terminal output
const MAX_TERMINAL_MESSAGE_LENGTH: usize = 200;

/// Displays toasts. Rendering is best-effort and never fails the caller.
pub trait ToastSink: Send + Sync {
    fn render(&self, toast: &Toast);
}

/// Message text as it should be displayed: markup is stripped only when the
/// toast opted into HTML, otherwise the text is shown literally.
pub fn display_text(toast: &Toast) -> String {
    if toast.options.allow_html {
        strip_html(&toast.message)
    } else {
        toast.message.clone()
    }
}

/// Emits toasts as tracing events at a level matching their kind
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ToastSink for TracingSink {
    fn render(&self, toast: &Toast) {
        let text = display_text(toast);
        match toast.kind {
            ToastKind::Error => error!(toast_id = toast.id, "{}", text),
            ToastKind::Warning => warn!(toast_id = toast.id, "{}", text),
            ToastKind::Success | ToastKind::Info => info!(toast_id = toast.id, "{}", text),
            ToastKind::Default => debug!(toast_id = toast.id, "{}", text),
        }
    }
}

/// Writes one `[kind] message` line per toast
pub struct TerminalSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl TerminalSink<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    pub fn format_line(toast: &Toast) -> String {
        let text = truncate_string(&display_text(toast), MAX_TERMINAL_MESSAGE_LENGTH);
        format!("[{}] {}", toast.kind, text)
    }
}

impl<W: Write + Send> ToastSink for TerminalSink<W> {
    fn render(&self, toast: &Toast) {
        let line = Self::format_line(toast);
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(error = %e, "Failed to write toast");
        }
    }
}

/// Records every rendered toast. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ToastSink for MemorySink {
    fn render(&self, toast: &Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(toast.clone());
    }
}
