//! User-facing notifications (toasts).
//!
//! Notifications are fire-and-forget: `Notifier::notify` never blocks and
//! never fails.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Default time a toast stays visible
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    pub position: Position,
    /// `None` keeps the toast until it is dismissed
    pub timeout: Option<Duration>,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            position: Position::default(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind, options: &NotifyOptions);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, kind: NotificationKind, _options: &NotifyOptions) {
        match kind {
            NotificationKind::Warning | NotificationKind::Error => {
                warn!(kind = kind.label(), "{}", message)
            }
            NotificationKind::Success | NotificationKind::Info => {
                info!(kind = kind.label(), "{}", message)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: NotificationKind,
    pub position: Position,
    pub shown_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Toast {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Keeps notifications until they expire or are drained by the UI.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts still visible at `now`, pruning expired ones
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut toasts = self.lock();
        toasts.retain(|t| !t.is_expired(now));
        toasts.clone()
    }

    /// Take every queued toast
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str, kind: NotificationKind, options: &NotifyOptions) {
        let shown_at = Utc::now();
        let expires_at = options
            .timeout
            .and_then(|t| chrono::Duration::from_std(t).ok())
            .map(|t| shown_at + t);
        self.lock().push(Toast {
            message: message.to_string(),
            kind,
            position: options.position,
            shown_at,
            expires_at,
        });
    }
}
