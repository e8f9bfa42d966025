//! Session tunables.

use std::time::Duration;

use crate::{Error, Result};

/// Idle period after which a conversation expires.
pub const CHAT_TIMEOUT: Duration = Duration::from_millis(300_000);

pub const DEFAULT_WELCOME_TEXT: &str = "¡Hola! Soy el asistente virtual de la clínica. ¿En qué puedo ayudarte hoy?\n\
Hello! I'm the clinic's virtual assistant. How can I help you today?";

pub const DEFAULT_EXPIRY_TEXT: &str = "La sesión ha expirado por inactividad. Escribe un mensaje para comenzar de nuevo.\n\
Your session has expired due to inactivity. Send a message to start again.";

pub const DEFAULT_PLACEHOLDER_TEXT: &str = "...";

/// Configuration for a [`ChatSession`](crate::ChatSession).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Idle period before the session expires
    pub timeout: Duration,
    /// Text of the single message a fresh transcript starts with
    pub welcome_text: String,
    /// Text appended when the session expires
    pub expiry_text: String,
    /// Text shown while a reply is pending
    pub placeholder_text: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            timeout: CHAT_TIMEOUT,
            welcome_text: DEFAULT_WELCOME_TEXT.to_string(),
            expiry_text: DEFAULT_EXPIRY_TEXT.to_string(),
            placeholder_text: DEFAULT_PLACEHOLDER_TEXT.to_string(),
        }
    }
}

impl ChatConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_welcome_text(mut self, text: impl Into<String>) -> Self {
        self.welcome_text = text.into();
        self
    }

    pub fn with_expiry_text(mut self, text: impl Into<String>) -> Self {
        self.expiry_text = text.into();
        self
    }

    /// Reject configurations the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        if self.welcome_text.trim().is_empty() {
            return Err(Error::InvalidConfig("welcome text must not be blank".to_string()));
        }
        if self.expiry_text.trim().is_empty() {
            return Err(Error::InvalidConfig("expiry text must not be blank".to_string()));
        }
        Ok(())
    }
}
