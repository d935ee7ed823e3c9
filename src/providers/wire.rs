//! generateContent request/response format, shared by Gemini and Vertex AI

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

use crate::config::ApiKey;
use crate::conversation::{Conversation, Role};

use super::UpstreamError;

const GENERIC_FAILURE: &str = "Error communicating with the model API.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

impl GenerateContentRequest {
    pub(super) fn new(conversation: &Conversation, system_instruction: Option<&str>) -> Self {
        let contents = conversation
            .messages()
            .iter()
            .map(|m| Content {
                role: Some(
                    match m.role {
                        Role::User => "user",
                        Role::Model => "model",
                    }
                    .to_string(),
                ),
                parts: m
                    .parts
                    .iter()
                    .map(|p| WirePart {
                        text: Some(p.text.clone()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            contents,
            system_instruction: system_instruction.map(|text| Content {
                role: None,
                parts: vec![WirePart {
                    text: Some(text.to_string()),
                }],
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePart {
    /// Non-text parts (inline data, function calls) carry no `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, or `None` when there is nothing usable
    fn first_candidate_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Send a generateContent call and map the outcome.
///
/// Every message that leaves this function has the credential scrubbed from it.
pub(super) async fn generate(
    request: RequestBuilder,
    body: &GenerateContentRequest,
    secret: &ApiKey,
    timeout: Duration,
) -> Result<Option<String>, UpstreamError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(e, secret, timeout))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(e, secret, timeout))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|e| e.error.message)
            .filter(|m| !m.trim().is_empty())
            .map(|m| redact(&m, secret))
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        let status = if status.is_client_error() || status.is_server_error() {
            status.as_u16()
        } else {
            500
        };

        return Err(UpstreamError::Status { status, message });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(&text)
        .map_err(|e| UpstreamError::Malformed(redact(&e.to_string(), secret)))?;

    Ok(parsed.first_candidate_text())
}

fn transport_error(err: reqwest::Error, secret: &ApiKey, timeout: Duration) -> UpstreamError {
    if err.is_timeout() {
        return UpstreamError::Timeout(timeout);
    }
    if err.is_decode() {
        return UpstreamError::Malformed(redact(&err.without_url().to_string(), secret));
    }
    UpstreamError::Network(redact(&err.without_url().to_string(), secret))
}

pub(super) fn redact(message: &str, secret: &ApiKey) -> String {
    let secret = secret.expose();
    if secret.is_empty() {
        return message.to_string();
    }
    message.replace(secret, "[redacted]")
}
