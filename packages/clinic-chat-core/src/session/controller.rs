//! Chat session controller.
//!
//! Owns the transcript, the "has the user interacted" flag and the inactivity
//! timer for one conversation. Lifecycle:
//!
//! - `Idle --send--> Active` (first interaction force-starts the timer)
//! - `Active --send--> Active` (countdown restarts)
//! - `Active --timeout--> Idle` (transcript kept, expiry message appended)
//! - `Active|Idle --clear--> Idle` (transcript reset to the welcome message)
//!
//! State lives behind a mutex that is never held across an `.await`; the only
//! suspension points are the gateway calls. Replies are fenced by a generation
//! counter that advances whenever the conversation is reset, so a reply that
//! lands after a clear or an expiry is dropped instead of resurrecting a stale
//! placeholder.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use super::timer::InactivityTimer;
use crate::config::ChatConfig;
use crate::events::{ChatEvent, Notification, EVENT_CHANNEL_CAPACITY};
use crate::gateway::{ChatGateway, GatewayError};
use crate::types::{ChatMessage, SessionState};

const SEND_FAILED_TEXT: &str =
    "No se pudo enviar el mensaje. Inténtalo de nuevo. / The message could not be sent. Please try again.";
const CLEARED_TEXT: &str = "Conversación borrada. / Conversation cleared.";
const CLEAR_FAILED_TEXT: &str =
    "No se pudo borrar la conversación. / The conversation could not be cleared.";

/// Result of [`ChatSession::send_message`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// Another reply is still pending
    Busy,
    /// The placeholder was replaced by this reply
    Replied(ChatMessage),
    /// The gateway failed; the placeholder was removed
    Failed(GatewayError),
    /// The conversation was reset while the reply was in flight
    Discarded,
}

/// Result of [`ChatSession::clear_chat`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClearOutcome {
    Cleared,
    /// The gateway failed; the local transcript was left as it was
    Failed(GatewayError),
}

struct Inner {
    messages: Vec<ChatMessage>,
    has_user_interacted: bool,
    initialized: bool,
    /// Id of the placeholder of the send in flight
    pending: Option<String>,
    generation: u64,
    timer: InactivityTimer,
}

struct Shared {
    inner: Mutex<Inner>,
    gateway: Arc<dyn ChatGateway>,
    config: ChatConfig,
    events: broadcast::Sender<ChatEvent>,
}

/// Handle to one chat conversation. Cheap to clone; clones share state.
///
/// The inactivity timer is aborted when the last handle is dropped.
#[derive(Clone)]
pub struct ChatSession {
    shared: Arc<Shared>,
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("ChatSession")
            .field("messages", &inner.messages.len())
            .field("has_user_interacted", &inner.has_user_interacted)
            .field("armed", &inner.timer.is_armed())
            .field("generation", &inner.generation)
            .finish()
    }
}

impl ChatSession {
    /// Create a session. The transcript stays empty until [`initialize`](Self::initialize).
    pub fn new(gateway: Arc<dyn ChatGateway>, config: ChatConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    messages: Vec::new(),
                    has_user_interacted: false,
                    initialized: false,
                    pending: None,
                    generation: 0,
                    timer: InactivityTimer::new(),
                }),
                gateway,
                config,
                events,
            }),
        }
    }

    /// Seed the transcript with the welcome message.
    ///
    /// Only the first call has an effect; returns whether this call did it.
    /// The timer is not started until the user sends something.
    pub fn initialize(&self) -> bool {
        {
            let mut inner = self.lock();
            if inner.initialized {
                return false;
            }
            inner.initialized = true;
            inner.messages = vec![self.welcome_message()];
        }
        tracing::debug!("Chat session initialized");
        self.emit(ChatEvent::TranscriptUpdated);
        true
    }

    /// Send one user utterance and wait for the assistant's reply.
    ///
    /// The user message and a placeholder are appended before the gateway is
    /// called, so a front-end redrawing on [`ChatEvent::TranscriptUpdated`]
    /// shows them immediately.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let (placeholder_id, generation) = {
            let mut inner = self.lock();
            if inner.pending.is_some() {
                tracing::debug!("Send rejected, a reply is still pending");
                return SendOutcome::Busy;
            }

            if inner.has_user_interacted {
                self.restart_timeout(&mut inner, false);
            } else {
                // Flag and timer are set together under the lock; force the
                // start rather than relying on the guard seeing the new flag.
                inner.has_user_interacted = true;
                self.restart_timeout(&mut inner, true);
            }

            inner.messages.push(ChatMessage::user(text));
            let placeholder = ChatMessage::placeholder(&self.shared.config.placeholder_text);
            let id = placeholder.id.clone();
            inner.messages.push(placeholder);
            inner.pending = Some(id.clone());
            (id, inner.generation)
        };
        self.emit(ChatEvent::TranscriptUpdated);

        let result = self.shared.gateway.send_message(text).await;

        let outcome = {
            let mut inner = self.lock();
            if inner.pending.as_deref() == Some(placeholder_id.as_str()) {
                inner.pending = None;
            }

            if inner.generation != generation {
                tracing::debug!(
                    "Discarding reply for placeholder {} from generation {} (now {})",
                    placeholder_id,
                    generation,
                    inner.generation
                );
                remove_placeholder(&mut inner.messages, &placeholder_id);
                return SendOutcome::Discarded;
            }

            match result {
                Ok(reply) => {
                    let resolved = inner
                        .messages
                        .iter_mut()
                        .find(|m| m.id == placeholder_id && m.is_temp)
                        .map(|m| {
                            m.resolve(&reply);
                            m.clone()
                        });
                    match resolved {
                        Some(message) => {
                            self.restart_timeout(&mut inner, false);
                            SendOutcome::Replied(message)
                        }
                        None => {
                            tracing::warn!("Placeholder {} vanished before its reply", placeholder_id);
                            SendOutcome::Discarded
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!("Failed to send chat message: {}", err);
                    remove_placeholder(&mut inner.messages, &placeholder_id);
                    self.restart_timeout(&mut inner, false);
                    SendOutcome::Failed(err)
                }
            }
        };

        if matches!(outcome, SendOutcome::Failed(_)) {
            self.emit(ChatEvent::Notification(Notification::error(SEND_FAILED_TEXT)));
        }
        self.emit(ChatEvent::TranscriptUpdated);
        outcome
    }

    /// Clear the conversation on the server, then locally.
    ///
    /// The timer is cancelled and the interaction flag reset up front; the
    /// transcript is only reset once the server has acknowledged.
    pub async fn clear_chat(&self) -> ClearOutcome {
        {
            let mut inner = self.lock();
            inner.timer.cancel();
            inner.has_user_interacted = false;
        }

        match self.shared.gateway.clear_chat().await {
            Ok(()) => {
                {
                    let mut inner = self.lock();
                    inner.messages = vec![self.welcome_message()];
                    inner.initialized = true;
                    inner.pending = None;
                    inner.generation += 1;
                    // A send during the request may have re-armed the timer.
                    inner.timer.cancel();
                    inner.has_user_interacted = false;
                }
                tracing::info!("Chat cleared");
                self.emit(ChatEvent::Cleared);
                self.emit(ChatEvent::Notification(Notification::info(CLEARED_TEXT)));
                self.emit(ChatEvent::TranscriptUpdated);
                ClearOutcome::Cleared
            }
            Err(err) => {
                tracing::warn!("Failed to clear chat: {}", err);
                self.emit(ChatEvent::Notification(Notification::error(CLEAR_FAILED_TEXT)));
                ClearOutcome::Failed(err)
            }
        }
    }

    /// Snapshot of the transcript.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().messages.clone()
    }

    pub fn state(&self) -> SessionState {
        if self.lock().timer.is_armed() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn has_user_interacted(&self) -> bool {
        self.lock().has_user_interacted
    }

    /// Whether a send is waiting for its reply.
    pub fn is_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.shared.events.subscribe()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ChatEvent) {
        // No subscribers is fine.
        let _ = self.shared.events.send(event);
    }

    fn welcome_message(&self) -> ChatMessage {
        ChatMessage::assistant(&self.shared.config.welcome_text)
    }

    /// Re-arm the inactivity timer. Without `force` this only happens once the
    /// user has interacted.
    fn restart_timeout(&self, inner: &mut Inner, force: bool) {
        if !force && !inner.has_user_interacted {
            return;
        }
        let session = Arc::downgrade(&self.shared);
        inner.timer.arm(self.shared.config.timeout, move |token| async move {
            if let Some(shared) = session.upgrade() {
                ChatSession { shared }.expire(token).await;
            }
        });
    }

    async fn expire(&self, token: u64) {
        {
            let mut inner = self.lock();
            if !inner.timer.claim(token) {
                return;
            }
            inner.has_user_interacted = false;
            inner.generation += 1;
            if let Some(id) = inner.pending.take() {
                remove_placeholder(&mut inner.messages, &id);
            }
            inner
                .messages
                .push(ChatMessage::assistant(&self.shared.config.expiry_text));
        }
        tracing::info!("Chat session expired after {:?} of inactivity", self.shared.config.timeout);
        self.emit(ChatEvent::SessionExpired);
        self.emit(ChatEvent::TranscriptUpdated);

        if let Err(err) = self.shared.gateway.clear_chat().await {
            tracing::warn!("Failed to clear expired chat: {}", err);
        }
    }
}

fn remove_placeholder(messages: &mut Vec<ChatMessage>, id: &str) {
    messages.retain(|m| !(m.id == id && m.is_temp));
}
