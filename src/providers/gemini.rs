//! Generative Language API provider
//!
//! Calls `{base}/v1beta/models/{model}:generateContent` directly over HTTP. The key
//! travels in the `x-goog-api-key` header so it never shows up in a URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{ApiKey, Config};
use crate::conversation::Conversation;

use super::wire::{self, GenerateContentRequest};
use super::{http_client, Upstream, UpstreamError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GeminiUpstream {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
    system_instruction: Option<String>,
    timeout: Duration,
}

impl GeminiUpstream {
    pub fn new(config: &Config, system_instruction: Option<String>) -> Result<Self, UpstreamError> {
        let base = config.api_base.as_deref().unwrap_or(DEFAULT_BASE_URL);

        Ok(Self {
            client: http_client(config.upstream_timeout)?,
            endpoint: format!("{}/v1beta/models/{}:generateContent", base, config.model_id),
            api_key: config.api_key.clone(),
            system_instruction,
            timeout: config.upstream_timeout,
        })
    }
}

#[async_trait]
impl Upstream for GeminiUpstream {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, conversation: &Conversation) -> Result<Option<String>, UpstreamError> {
        let body = GenerateContentRequest::new(conversation, self.system_instruction.as_deref());

        let request = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose());

        wire::generate(request, &body, &self.api_key, self.timeout).await
    }
}
