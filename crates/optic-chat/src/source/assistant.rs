//! Assistant tier: delegate the question to a chat-completion endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use optic_core::config::AssistantConfig;
use optic_core::types::{AnswerRequest, Role, Turn};

use crate::source::AnswerSource;

const SYSTEM_INSTRUCTION: &str = "You are an assistant answering questions strictly about the current image. If the question is off-topic, reply exactly: \"Please ask in the context of the current image.\" Keep answers concise (2–4 sentences). Prefer factual, specific answers. Use the provided label, summary and predictions as context.";

#[derive(Debug, Serialize)]
struct AssistantPayload {
    messages: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AssistantReply {
    answer: Option<String>,
}

/// Highest-priority tier: an external assistant endpoint.
///
/// Only constructed when an endpoint is configured; the tier is absent
/// from the chain otherwise.
pub struct AssistantSource {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl AssistantSource {
    /// Build the source from configuration. Returns `None` when no
    /// endpoint is set, which disables the tier entirely.
    pub fn from_config(client: reqwest::Client, config: &AssistantConfig) -> Option<Self> {
        let endpoint = config.endpoint.clone()?;
        Some(Self {
            client,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

/// Assemble the message list sent to the assistant: the system
/// instruction, recent history, then a final user turn packing the image
/// context with the question.
fn build_messages(request: &AnswerRequest) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);
    messages.push(Turn::system(SYSTEM_INSTRUCTION));
    messages.extend(request.history.iter().cloned());

    let summary = request
        .summary
        .as_ref()
        .map(|s| s.extract.trim())
        .filter(|e| !e.is_empty())
        .unwrap_or("N/A");
    let predictions = request.result_lines.join(" | ");
    messages.push(Turn::user(format!(
        "Label: {}\nSummary: {}\nPredictions: {}\n---\nUser question: {}",
        request.topic, summary, predictions, request.question
    )));
    messages
}

#[async_trait]
impl AnswerSource for AssistantSource {
    fn name(&self) -> &'static str {
        "assistant"
    }

    async fn answer(&self, request: &AnswerRequest) -> Option<String> {
        let payload = AssistantPayload {
            messages: build_messages(request),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "assistant request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "assistant returned non-success");
            return None;
        }

        let reply: AssistantReply = match response.json().await {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "assistant reply malformed");
                return None;
            }
        };

        let answer = reply.answer?;
        let answer = answer.trim();
        if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optic_core::types::KnowledgeSummary;

    fn request(history: Vec<Turn>) -> AnswerRequest {
        AnswerRequest {
            topic: "golden retriever".to_string(),
            summary: Some(KnowledgeSummary {
                title: "Golden Retriever".to_string(),
                extract: "A Scottish breed of retriever.".to_string(),
                reference_url: None,
            }),
            result_lines: vec![
                "1. golden retriever 91.20%".to_string(),
                "2. labrador retriever 4.10%".to_string(),
            ],
            history,
            question: "are they good with kids?".to_string(),
        }
    }

    // ---- build_messages ----

    #[test]
    fn test_messages_start_with_system_instruction() {
        let messages = build_messages(&request(vec![]));
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("strictly about the current image"));
        assert!(messages[0]
            .content
            .contains("Please ask in the context of the current image."));
    }

    #[test]
    fn test_history_sits_between_system_and_context() {
        let history = vec![Turn::user("what breed?"), Turn::assistant("A retriever.")];
        let messages = build_messages(&request(history));
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "what breed?");
        assert_eq!(messages[2].content, "A retriever.");
        assert_eq!(messages[3].role, Role::User);
    }

    #[test]
    fn test_final_turn_packs_context_and_question() {
        let messages = build_messages(&request(vec![]));
        let last = &messages.last().unwrap().content;
        assert!(last.starts_with("Label: golden retriever\n"));
        assert!(last.contains("Summary: A Scottish breed of retriever.\n"));
        assert!(last.contains("Predictions: 1. golden retriever 91.20% | 2. labrador retriever 4.10%\n"));
        assert!(last.ends_with("User question: are they good with kids?"));
    }

    #[test]
    fn test_missing_summary_renders_na() {
        let mut req = request(vec![]);
        req.summary = None;
        let last = build_messages(&req).last().unwrap().content.clone();
        assert!(last.contains("Summary: N/A\n"));
    }

    #[test]
    fn test_blank_extract_renders_na() {
        let mut req = request(vec![]);
        req.summary = Some(KnowledgeSummary {
            title: "x".to_string(),
            extract: "   ".to_string(),
            reference_url: None,
        });
        let last = build_messages(&req).last().unwrap().content.clone();
        assert!(last.contains("Summary: N/A\n"));
    }

    // ---- from_config ----

    #[test]
    fn test_from_config_requires_endpoint() {
        let client = reqwest::Client::new();
        let config = AssistantConfig::default();
        assert!(AssistantSource::from_config(client, &config).is_none());
    }

    #[test]
    fn test_from_config_with_endpoint() {
        let client = reqwest::Client::new();
        let config = AssistantConfig {
            endpoint: Some("http://localhost:9999/answer".to_string()),
            ..AssistantConfig::default()
        };
        let source = AssistantSource::from_config(client, &config).unwrap();
        assert_eq!(source.endpoint, "http://localhost:9999/answer");
    }

    // ---- payload shape ----

    #[test]
    fn test_payload_omits_unset_model() {
        let payload = AssistantPayload {
            messages: vec![Turn::user("q")],
            model: None,
            temperature: 0.3,
            max_tokens: 350,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("model").is_none());
        let temperature = json["temperature"].as_f64().unwrap();
        assert!((temperature - 0.3).abs() < 1e-6);
        assert_eq!(json["max_tokens"], 350);
    }
}
