//! Wire types for the clinic chat endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    pub user_id: String,
}

/// Reply to `POST /chat/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessageResponse {
    pub reply: String,
}

/// Body of `POST /chat/clear`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClearChatRequest {
    pub user_id: String,
}
