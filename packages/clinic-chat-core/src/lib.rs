//! Clinic Chat Core - session controller for the patient-facing chat widget.
//!
//! This crate provides the stateful half of the clinic assistant chat:
//!
//! - **Transcript**: ordered chat messages with optimistic placeholders
//! - **Session controller**: send/clear with a debounced inactivity timeout
//! - **Gateway seam**: the [`ChatGateway`] trait the remote API is reached through
//! - **Events**: transcript changes and user-visible notifications
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clinic_chat_core::{ChatConfig, ChatGateway, ChatSession};
//!
//! # async fn run(gateway: Arc<dyn ChatGateway>) {
//! let session = ChatSession::new(gateway, ChatConfig::default());
//! session.initialize();
//!
//! let outcome = session.send_message("Quisiera una cita").await;
//! println!("{:?}", outcome);
//! println!("{} messages", session.messages().len());
//! # }
//! ```

pub mod config;
pub mod events;
pub mod gateway;
pub mod session;
pub mod types;

pub use config::{ChatConfig, CHAT_TIMEOUT, DEFAULT_EXPIRY_TEXT, DEFAULT_WELCOME_TEXT};
pub use events::{ChatEvent, Notification, NotificationLevel};
pub use gateway::{ChatGateway, GatewayError};
pub use session::{ChatSession, ClearOutcome, SendOutcome};
pub use types::{ChatMessage, SessionState};

/// Error types for clinic-chat-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for clinic-chat-core operations.
pub type Result<T> = std::result::Result<T, Error>;
