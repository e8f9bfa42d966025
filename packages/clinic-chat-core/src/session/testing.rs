//! In-memory gateway with scripted results for controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::gateway::{ChatGateway, GatewayError};

pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    clears: Mutex<VecDeque<Result<(), GatewayError>>>,
    sent: Mutex<Vec<String>>,
    clear_calls: AtomicUsize,
    gate: Option<Semaphore>,
    clear_gate: Option<Semaphore>,
}

impl ScriptedGateway {
    /// Replies immediately; unscripted sends echo the text back.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            clears: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            clear_calls: AtomicUsize::new(0),
            gate: None,
            clear_gate: None,
        }
    }

    /// Holds every send until [`release`](Self::release) is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Holds every clear until [`release_clear`](Self::release_clear) is called.
    pub fn gated_clear() -> Self {
        Self {
            clear_gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn push_reply(&self, reply: Result<String, GatewayError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_clear(&self, result: Result<(), GatewayError>) {
        self.clears.lock().unwrap().push_back(result);
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn release_clear(&self) {
        if let Some(gate) = &self.clear_gate {
            gate.add_permits(1);
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn send_message(&self, text: &str) -> Result<String, GatewayError> {
        self.sent.lock().unwrap().push(text.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .expect("gate semaphore closed")
                .forget();
        }
        let scripted = self.replies.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(format!("echo: {}", text)))
    }

    async fn clear_chat(&self) -> Result<(), GatewayError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.clear_gate {
            gate.acquire()
                .await
                .expect("clear gate semaphore closed")
                .forget();
        }
        let scripted = self.clears.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(()))
    }
}
