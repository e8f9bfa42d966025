//! Clinic chat HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use clinic_chat_core::{ChatGateway, GatewayError};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::auth::AuthToken;
use super::types::{ClearChatRequest, SendMessageRequest, SendMessageResponse};

pub const SEND_PATH: &str = "/chat/send";
pub const CLEAR_PATH: &str = "/chat/clear";

/// HTTP client for the clinic chat endpoints
#[derive(Debug, Clone)]
pub struct ClinicApiClient {
    base_url: String,
    client: Client,
    token: AuthToken,
}

impl ClinicApiClient {
    /// Create a new client with the given base URL and credentials
    pub fn new(base_url: &str, token: AuthToken, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> &str {
        self.token.user_id()
    }

    // ========================================================================
    // Internal HTTP Methods
    // ========================================================================

    /// Make a POST request and check the status
    async fn post_raw<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, GatewayError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, self.token.bearer())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        Ok(response)
    }

    /// Make a POST request and decode the JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, GatewayError> {
        self.post_raw(path, body)
            .await?
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatGateway for ClinicApiClient {
    async fn send_message(&self, text: &str) -> Result<String, GatewayError> {
        let request = SendMessageRequest {
            message: text.to_string(),
            user_id: self.user_id().to_string(),
        };
        tracing::debug!("POST {} for user {}", SEND_PATH, request.user_id);
        let response: SendMessageResponse = self.post(SEND_PATH, &request).await?;
        Ok(response.reply)
    }

    async fn clear_chat(&self) -> Result<(), GatewayError> {
        let request = ClearChatRequest {
            user_id: self.user_id().to_string(),
        };
        tracing::debug!("POST {} for user {}", CLEAR_PATH, request.user_id);
        // The ack body carries nothing we use.
        self.post_raw(CLEAR_PATH, &request).await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Transport("request timed out".to_string())
    } else {
        GatewayError::Transport(err.to_string())
    }
}

fn status_error(status: StatusCode, body: String) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
        _ => GatewayError::Status {
            status: status.as_u16(),
            body,
        },
    }
}
