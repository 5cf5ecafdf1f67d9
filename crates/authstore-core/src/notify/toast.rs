use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds a toast stays visible unless overridden
pub const DEFAULT_AUTO_CLOSE_MS: i64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
    Default,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
            ToastKind::Default => "default",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the host's light/dark preference
    #[default]
    Auto,
    Light,
    Dark,
    Colored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    #[default]
    TopRight,
    TopCenter,
    BottomLeft,
    BottomRight,
    BottomCenter,
}

/// Display options for a single toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub theme: Theme,
    /// `None` keeps the toast until it is dismissed
    pub auto_close: Option<Duration>,
    /// Render the message as markup instead of literal text
    pub allow_html: bool,
    pub position: Position,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            auto_close: Some(Duration::milliseconds(DEFAULT_AUTO_CLOSE_MS)),
            allow_html: false,
            position: Position::TopRight,
        }
    }
}

/// Per-call replacements for `ToastOptions`. Unset fields keep the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastOverrides {
    pub theme: Option<Theme>,
    pub auto_close: Option<Option<Duration>>,
    pub allow_html: Option<bool>,
    pub position: Option<Position>,
}

impl ToastOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn auto_close_ms(mut self, ms: i64) -> Self {
        self.auto_close = Some(Some(Duration::milliseconds(ms)));
        self
    }

    /// Keep the toast on screen until dismissed
    pub fn sticky(mut self) -> Self {
        self.auto_close = Some(None);
        self
    }

    pub fn allow_html(mut self, allow: bool) -> Self {
        self.allow_html = Some(allow);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: ToastOverrides) -> Self {
        Self {
            theme: other.theme.or(self.theme),
            auto_close: other.auto_close.or(self.auto_close),
            allow_html: other.allow_html.or(self.allow_html),
            position: other.position.or(self.position),
        }
    }

    pub fn apply(&self, base: &ToastOptions) -> ToastOptions {
        ToastOptions {
            theme: self.theme.unwrap_or(base.theme),
            auto_close: self.auto_close.unwrap_or(base.auto_close),
            allow_html: self.allow_html.unwrap_or(base.allow_html),
            position: self.position.unwrap_or(base.position),
        }
    }
}

/// A toast as handed to a sink
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub options: ToastOptions,
    pub shown_at: DateTime<Utc>,
}

impl Toast {
    /// `None` when the toast never auto-closes, including auto-close delays
    /// too large to represent
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.options
            .auto_close
            .and_then(|d| self.shown_at.checked_add_signed(d))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|at| now >= at).unwrap_or(false)
    }
}
