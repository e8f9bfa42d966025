//! Core data types for the chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in the chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique within the session
    pub id: String,
    /// Message content
    pub text: String,
    /// True when written by the patient, false for the assistant
    pub is_user: bool,
    /// When the message was created (or when its reply landed)
    pub timestamp: DateTime<Utc>,
    /// Placeholder awaiting a server reply
    #[serde(default)]
    pub is_temp: bool,
}

impl ChatMessage {
    /// Create a message authored by the patient.
    pub fn user(text: &str) -> Self {
        Self::new(text, true, false)
    }

    /// Create a message authored by the assistant.
    pub fn assistant(text: &str) -> Self {
        Self::new(text, false, false)
    }

    /// Create an assistant placeholder shown while a reply is pending.
    pub fn placeholder(text: &str) -> Self {
        Self::new(text, false, true)
    }

    fn new(text: &str, is_user: bool, is_temp: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            is_user,
            timestamp: Utc::now(),
            is_temp,
        }
    }

    /// Turn a placeholder into the real reply, keeping its id.
    pub fn resolve(&mut self, reply: &str) {
        self.text = reply.to_string();
        self.is_temp = false;
        self.timestamp = Utc::now();
    }
}

/// Whether the inactivity countdown is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No timer armed: before the first interaction, after expiry or clear
    #[default]
    Idle,
    /// Timer armed, counting down from the last activity
    Active,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_flags() {
        let user = ChatMessage::user("hola");
        assert!(user.is_user);
        assert!(!user.is_temp);

        let reply = ChatMessage::assistant("hi");
        assert!(!reply.is_user);
        assert!(!reply.is_temp);

        let pending = ChatMessage::placeholder("...");
        assert!(!pending.is_user);
        assert!(pending.is_temp);
        assert_eq!(pending.text, "...");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = ChatMessage::user("same");
        let b = ChatMessage::user("same");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_resolve_keeps_id() {
        let mut pending = ChatMessage::placeholder("...");
        let id = pending.id.clone();

        pending.resolve("Claro, ¿para qué día?");

        assert_eq!(pending.id, id);
        assert_eq!(pending.text, "Claro, ¿para qué día?");
        assert!(!pending.is_temp);
    }

    #[test]
    fn test_serializes_camel_case() {
        let msg = ChatMessage::placeholder("...");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["isUser"], false);
        assert_eq!(json["isTemp"], true);
        assert!(json.get("is_user").is_none());
    }

    #[test]
    fn test_session_state_default_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }
}
