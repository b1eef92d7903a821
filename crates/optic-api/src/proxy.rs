//! Chat-completion proxy for image-context Q&A.
//!
//! Forwards caller-supplied conversations to an OpenAI-compatible
//! upstream, prepending a system guardrail and holding the credential so
//! it never reaches the browser side.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use optic_core::config::ProxyConfig;
use optic_core::types::Turn;

/// Guardrail prepended to every forwarded conversation.
const GUARDRAIL: &str = "You answer strictly about the provided image context. If off-topic, reply exactly: \"Please ask in the context of the current image.\" Keep answers concise (2–4 sentences). Prefer factual specificity. If unsure, say so briefly.";

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 350;

/// Errors surfaced to the HTTP layer by the proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("upstream credential not configured")]
    MissingCredential,
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

/// Conversation forwarded through the proxy.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Turn>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct UpstreamBody {
    model: String,
    messages: Vec<Turn>,
    temperature: f32,
    max_tokens: u32,
}

/// Credential-holding proxy to the chat-completion upstream.
pub struct QaProxy {
    client: reqwest::Client,
    upstream_url: String,
    default_model: String,
    api_key: Option<String>,
}

impl QaProxy {
    pub fn new(client: reqwest::Client, config: &ProxyConfig, api_key: Option<String>) -> Self {
        Self {
            client,
            upstream_url: config.upstream_url.clone(),
            default_model: config.default_model.clone(),
            api_key,
        }
    }

    /// Forward a conversation to the upstream and return the answer text.
    ///
    /// The guardrail system message goes first, then the caller's
    /// messages unchanged. A response with no content yields an empty
    /// string rather than an error.
    pub async fn complete(&self, request: CompletionRequest) -> Result<String, ProxyError> {
        let api_key = self.api_key.as_ref().ok_or(ProxyError::MissingCredential)?;
        let body = self.upstream_body(request);

        let response = self
            .client
            .post(&self.upstream_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "upstream completion returned non-success");
            return Err(ProxyError::Upstream(format!("upstream status {}", status)));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;
        Ok(extract_answer(&data))
    }

    fn upstream_body(&self, request: CompletionRequest) -> UpstreamBody {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(Turn::system(GUARDRAIL));
        messages.extend(request.messages);

        UpstreamBody {
            model: request.model.unwrap_or_else(|| self.default_model.clone()),
            messages,
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}

/// `choices[0].message.content`, trimmed; empty string when absent.
fn extract_answer(data: &Value) -> String {
    data.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
