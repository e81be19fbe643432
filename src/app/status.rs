use chrono::{DateTime, Local, Utc};
use colored::Color;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub fn color(self) -> Color {
        match self {
            StatusKind::Info => Color::BrightMagenta,
            StatusKind::Error => Color::Red,
        }
    }
}

/// A transient user-facing message
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub shown_at: DateTime<Utc>,
}

impl StatusMessage {
    /// Text prefixed with the local time it was shown
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {}",
            self.shown_at.with_timezone(&Local).format("%H:%M:%S"),
            self.text
        )
    }
}

/// Message surface with a single owned clear timer.
///
/// Showing a message cancels the pending clear of the previous one, so
/// only the newest message's timer can blank the line.
pub struct StatusLine {
    current: Arc<Mutex<Option<StatusMessage>>>,
    ttl: Duration,
    pending_clear: Option<JoinHandle<()>>,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            ttl,
            pending_clear: None,
        }
    }

    /// Must be called from within a tokio runtime
    pub fn show(&mut self, text: impl Into<String>, kind: StatusKind) {
        if let Some(handle) = self.pending_clear.take() {
            handle.abort();
        }

        let message = StatusMessage {
            text: text.into(),
            kind,
            shown_at: Utc::now(),
        };
        debug!("Status ({:?}): {}", message.kind, message.text);
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(message);

        let current = Arc::clone(&self.current);
        let ttl = self.ttl;
        self.pending_clear = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            *current.lock().unwrap_or_else(|e| e.into_inner()) = None;
        }));
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_TTL)
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        if let Some(handle) = self.pending_clear.take() {
            handle.abort();
        }
    }
}
