//! Seam between the session controller and the remote chat API.

use async_trait::async_trait;

/// Failures reported by a [`ChatGateway`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Not authorized")]
    Unauthorized,

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Auth token carries no user id")]
    MissingUserId,
}

/// Remote conversational API the session talks to.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Submit one user utterance and return the assistant's reply.
    async fn send_message(&self, text: &str) -> Result<String, GatewayError>;

    /// Drop the server-side conversation for the current user.
    async fn clear_chat(&self) -> Result<(), GatewayError>;
}
