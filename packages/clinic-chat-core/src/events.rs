//! Events emitted by a chat session.
//!
//! Front-ends subscribe through [`ChatSession::subscribe`](crate::ChatSession::subscribe)
//! and redraw or show toasts as these arrive.

use serde::{Deserialize, Serialize};

/// Capacity of the per-session broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The transcript changed; read it again with `messages()`
    TranscriptUpdated,
    /// Something the user should be told about
    Notification(Notification),
    /// The inactivity timeout fired and the expiry message was appended
    SessionExpired,
    /// The transcript was reset to the welcome message
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            text: text.into(),
        }
    }
}
