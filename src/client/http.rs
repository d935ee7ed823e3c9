//! HTTP transport from the chat client to the relay

use std::time::Duration;

use reqwest::Client;

use crate::conversation::{ChatRequest, ChatResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The relay answered with `{ "error" }`
    #[error("Relay returned {status}: {message}")]
    Relay { status: u16, message: String },

    #[error("Unexpected response from relay (HTTP {0})")]
    UnexpectedResponse(u16),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl ClientError {
    /// Short text shown in place of the model's reply
    pub fn notice(&self) -> String {
        match self {
            ClientError::Relay { message, .. } => format!("⚠️ {}", message),
            ClientError::UnexpectedResponse(_) => "⚠️ The AI server sent an unexpected response.".into(),
            ClientError::RequestFailed(_) => "⚠️ Unable to reach the AI server.".into(),
        }
    }
}

pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    /// Client for the relay at `base_url` (e.g. `http://localhost:3000`)
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    /// Send one turn's conversation and return the reply text
    pub async fn send(&self, request: &ChatRequest) -> Result<String, ClientError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(ChatResponse::Reply { reply }) if (200..300).contains(&status) => Ok(reply),
            Ok(ChatResponse::Error { error }) => Err(ClientError::Relay {
                status,
                message: error,
            }),
            _ => Err(ClientError::UnexpectedResponse(status)),
        }
    }
}
