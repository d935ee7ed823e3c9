//! Vertex AI provider
//!
//! Same generateContent format as the Generative Language API, but addressed per
//! project/location and authorized with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{ApiKey, Config};
use crate::conversation::Conversation;

use super::wire::{self, GenerateContentRequest};
use super::{http_client, Upstream, UpstreamError};

pub struct VertexUpstream {
    client: Client,
    endpoint: String,
    token: ApiKey,
    system_instruction: Option<String>,
    timeout: Duration,
}

impl VertexUpstream {
    pub fn new(config: &Config, system_instruction: Option<String>) -> Result<Self, UpstreamError> {
        let project = config
            .vertex_project
            .as_deref()
            .ok_or_else(|| UpstreamError::Setup("VERTEX_PROJECT is not configured".into()))?;
        let location = &config.vertex_location;

        let base = config
            .api_base
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", location));

        Ok(Self {
            client: http_client(config.upstream_timeout)?,
            endpoint: format!(
                "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
                base, project, location, config.model_id
            ),
            token: config.api_key.clone(),
            system_instruction,
            timeout: config.upstream_timeout,
        })
    }
}

#[async_trait]
impl Upstream for VertexUpstream {
    fn name(&self) -> &str {
        "vertex"
    }

    async fn complete(&self, conversation: &Conversation) -> Result<Option<String>, UpstreamError> {
        let body = GenerateContentRequest::new(conversation, self.system_instruction.as_deref());

        let request = self.client.post(&self.endpoint).bearer_auth(self.token.expose());

        wire::generate(request, &body, &self.token, self.timeout).await
    }
}
