//! Bearer token handling.
//!
//! The chat endpoints want the caller's user id in the request body. It is
//! read from the JWT payload; the signature is not checked here, the server
//! does that.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use clinic_chat_core::GatewayError;
use serde_json::Value;

/// Claims consulted for the user id, in order.
const USER_ID_CLAIMS: [&str; 3] = ["userId", "id", "sub"];

#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    raw: String,
    user_id: String,
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl AuthToken {
    /// Parse a JWT and pull the user id out of its payload.
    pub fn parse(token: &str) -> Result<Self, GatewayError> {
        let token = token.trim();
        let user_id = user_id_from_jwt(token).ok_or(GatewayError::MissingUserId)?;
        Ok(Self {
            raw: token.to_string(),
            user_id,
        })
    }

    /// Use an opaque token with an explicitly known user id.
    pub fn with_user_id(token: &str, user_id: &str) -> Self {
        Self {
            raw: token.trim().to_string(),
            user_id: user_id.to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.raw)
    }
}

fn user_id_from_jwt(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    USER_ID_CLAIMS.iter().find_map(|claim| match claims.get(*claim)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
