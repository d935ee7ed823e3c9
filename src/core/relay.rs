//! The relay proxy
//!
//! [`Relay::handle_chat`] is the whole server-side protocol:
//! 1. Validate the client's conversation
//! 2. Forward it to the upstream model, bounded by a timeout
//! 3. Map the outcome to a reply or a client-safe error
//!
//! Nothing is retained between calls.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::conversation::{ChatRequest, Conversation};
use crate::providers::{Upstream, UpstreamError};

/// Sent with a 200 when the upstream succeeded but produced no usable candidate.
///
/// This is intentionally lossy: the client cannot tell it apart from a real reply.
/// Operators see a warning in the logs.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a reply.";

/// Errors from the relay, each paired with an HTTP status
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    /// HTTP status for this error.
    ///
    /// Upstream 4xx/5xx are forwarded as-is; anything else that went wrong talking
    /// to the upstream, including an unreadable success body, is a 500.
    pub fn status(&self) -> u16 {
        match self {
            RelayError::BadRequest(_) => 400,
            RelayError::Upstream(e) => match e {
                UpstreamError::Status { status, .. } if (400..600).contains(status) => *status,
                UpstreamError::Timeout(_) => 504,
                UpstreamError::Status { .. }
                | UpstreamError::Malformed(_)
                | UpstreamError::Network(_)
                | UpstreamError::Setup(_) => 500,
            },
        }
    }

    /// Human-readable text for the `error` field
    pub fn client_message(&self) -> String {
        match self {
            RelayError::BadRequest(msg) => msg.clone(),
            RelayError::Upstream(e) => match e {
                UpstreamError::Status { message, .. } => message.clone(),
                UpstreamError::Malformed(_) => "Malformed response from the model API.".into(),
                UpstreamError::Timeout(_) => "The model API did not respond in time.".into(),
                UpstreamError::Network(_) => {
                    "Internal server error during API communication.".into()
                }
                UpstreamError::Setup(_) => "Internal server error.".into(),
            },
        }
    }
}

pub struct Relay {
    upstream: Arc<dyn Upstream>,
    timeout: Duration,
}

impl Relay {
    pub fn new(upstream: Arc<dyn Upstream>, timeout: Duration) -> Self {
        Self { upstream, timeout }
    }

    /// Relay one conversation and return the model's reply text
    pub async fn handle_chat(&self, request: ChatRequest) -> Result<String, RelayError> {
        let request_id = Uuid::new_v4();
        let conversation = validate(request)?;

        tracing::info!(
            %request_id,
            turns = conversation.len(),
            upstream = self.upstream.name(),
            "Relaying conversation"
        );

        let call = self.upstream.complete(&conversation);
        let outcome = tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(UpstreamError::Timeout(self.timeout)));

        match outcome {
            Ok(Some(reply)) => {
                tracing::debug!(%request_id, "Upstream replied");
                Ok(reply)
            }
            Ok(None) => {
                tracing::warn!(%request_id, "No candidate text in upstream response, sending fallback reply");
                Ok(FALLBACK_REPLY.to_string())
            }
            Err(e) => {
                tracing::error!(%request_id, error = %e, "Upstream call failed");
                Err(e.into())
            }
        }
    }
}

fn validate(request: ChatRequest) -> Result<Conversation, RelayError> {
    let conversation = request
        .conversation
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            RelayError::BadRequest("Missing conversation history in request body.".into())
        })?;

    if let Some(index) = conversation.messages().iter().position(|m| m.parts.is_empty()) {
        return Err(RelayError::BadRequest(format!(
            "Message {} in conversation has no parts.",
            index
        )));
    }

    Ok(conversation)
}
