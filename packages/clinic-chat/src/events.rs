//! Session event rendering
//!
//! Subscribes to a session's event channel and prints assistant messages and
//! notifications as they arrive.

use std::collections::HashSet;

use clinic_chat_core::{ChatEvent, ChatMessage, ChatSession, NotificationLevel};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Spawn the render loop. Subscribes before returning, so nothing emitted
/// afterwards is missed.
pub fn spawn_renderer(session: ChatSession) -> JoinHandle<()> {
    let mut events = session.subscribe();

    tokio::spawn(async move {
        let mut printed = HashSet::new();

        loop {
            match events.recv().await {
                Ok(ChatEvent::TranscriptUpdated) => {
                    for message in unseen_replies(&session.messages(), &mut printed) {
                        println!("{}", format_message(&message));
                    }
                }
                Ok(ChatEvent::Notification(notification)) => match notification.level {
                    NotificationLevel::Error => eprintln!("! {}", notification.text),
                    NotificationLevel::Info => eprintln!("{}", notification.text),
                },
                Ok(ChatEvent::SessionExpired) => {
                    tracing::debug!("Session expired");
                }
                Ok(ChatEvent::Cleared) => printed.clear(),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Renderer lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Assistant messages that are final and not yet printed. The user's own
/// messages are already on screen.
fn unseen_replies(messages: &[ChatMessage], printed: &mut HashSet<String>) -> Vec<ChatMessage> {
    messages
        .iter()
        .filter(|m| !m.is_user && !m.is_temp)
        .filter(|m| printed.insert(m.id.clone()))
        .cloned()
        .collect()
}

pub fn format_message(message: &ChatMessage) -> String {
    let author = if message.is_user { "Tú" } else { "Asistente" };
    format!(
        "[{}] {}: {}",
        message.timestamp.with_timezone(&chrono::Local).format("%H:%M"),
        author,
        message.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_replies_skips_user_temp_and_printed() {
        let welcome = ChatMessage::assistant("Hola");
        let user = ChatMessage::user("cita");
        let pending = ChatMessage::placeholder("...");
        let mut printed = HashSet::new();

        let first = unseen_replies(&[welcome.clone(), user.clone(), pending.clone()], &mut printed);
        assert_eq!(first, vec![welcome.clone()]);

        let mut resolved = pending.clone();
        resolved.resolve("Lunes a las 10");
        let second = unseen_replies(&[welcome, user, resolved.clone()], &mut printed);
        assert_eq!(second, vec![resolved]);
    }

    #[test]
    fn test_format_message_labels_author() {
        let line = format_message(&ChatMessage::user("hola"));
        assert!(line.contains("Tú: hola"));
        assert!(line.starts_with('['));

        let line = format_message(&ChatMessage::assistant("buenas"));
        assert!(line.contains("Asistente: buenas"));
    }
}
