//! Toast notifications.
//!
//! `Notifier::show_toast` fills in default display options (auto theme,
//! 3 second auto-close, raw HTML disabled, top-right position), applies any
//! per-call overrides and hands the toast to a `ToastSink` for display.
//! The notifier also remembers which toasts are still on screen.

pub mod notifier;
pub mod sink;
pub mod toast;

pub use notifier::{Notifier, DEFAULT_MESSAGE};
pub use sink::{MemorySink, TerminalSink, ToastSink, TracingSink};
pub use toast::{Position, Theme, Toast, ToastKind, ToastOptions, ToastOverrides};
