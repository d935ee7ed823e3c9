//! Upstream model API integrations
//!
//! The relay only needs one thing from a model backend: complete a conversation
//! and hand back the first candidate's text. [`Upstream`] captures that, and the
//! raw Generative Language API and Vertex AI are interchangeable behind it.

mod gemini;
mod vertex;
mod wire;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::{Backend, Config};
use crate::conversation::Conversation;

pub use gemini::GeminiUpstream;
pub use vertex::VertexUpstream;

#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Upstream answered 2xx but the body was not a generateContent response
    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

/// A model backend that can complete a conversation.
///
/// `Ok(None)` means the call succeeded but no candidate text could be extracted.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    async fn complete(&self, conversation: &Conversation) -> Result<Option<String>, UpstreamError>;
}

/// Build the upstream selected by `config.backend`
pub fn from_config(
    config: &Config,
    system_instruction: Option<String>,
) -> Result<Arc<dyn Upstream>, UpstreamError> {
    let upstream: Arc<dyn Upstream> = match config.backend {
        Backend::Gemini => Arc::new(GeminiUpstream::new(config, system_instruction)?),
        Backend::Vertex => Arc::new(VertexUpstream::new(config, system_instruction)?),
    };
    Ok(upstream)
}

fn http_client(timeout: Duration) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::Setup(e.to_string()))
}
