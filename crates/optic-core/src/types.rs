//! Shared domain types for the Optic pipeline.
//!
//! These types cross crate boundaries: the knowledge resolver produces
//! [`KnowledgeSummary`], the conversation log owns [`Turn`]s, and the
//! answer source chain consumes [`AnswerRequest`]s.

use serde::{Deserialize, Serialize};

/// One ranked prediction from the external image classifier.
///
/// Highest confidence first; confidence is in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

/// Resolved knowledge about a topic.
///
/// Immutable once created; a new resolution replaces the whole value
/// (no merging).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    /// Canonical page title as returned by the lookup.
    pub title: String,
    /// Introductory extract text.
    pub extract: String,
    /// Link to the full reference page, when the lookup provides one.
    pub reference_url: Option<String>,
}

/// Who authored a conversation turn.
///
/// Conversation logs only ever hold `User` and `Assistant` turns; `System`
/// exists for the wire format of assistant requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a conversation, in wire format (`{role, content}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Everything an answer source may use to answer one question.
///
/// Built per question by the orchestrator and discarded afterwards.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    /// Normalized topic of the current image.
    pub topic: String,
    /// Cached summary for the topic, if resolution succeeded.
    pub summary: Option<KnowledgeSummary>,
    /// Display lines for the most recent classification (up to 5).
    pub result_lines: Vec<String>,
    /// Recent conversation window, oldest first (up to 6 turns).
    pub history: Vec<Turn>,
    /// The literal user question.
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::System.to_string(), "system");
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_turn_wire_format() {
        let turn = Turn::user("how long do they live?");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(
            json,
            "{\"role\":\"user\",\"content\":\"how long do they live?\"}"
        );
    }

    #[test]
    fn test_turn_roundtrip() {
        let turn = Turn::assistant("They live 10-12 years.");
        let json = serde_json::to_string(&turn).unwrap();
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }

    #[test]
    fn test_prediction_deserializes() {
        let p: Prediction =
            serde_json::from_str("{\"label\":\"tabby, tabby cat\",\"confidence\":0.92}").unwrap();
        assert_eq!(p.label, "tabby, tabby cat");
        assert!((p.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn test_knowledge_summary_optional_url() {
        let s: KnowledgeSummary = serde_json::from_str(
            "{\"title\":\"Tabby cat\",\"extract\":\"A tabby is...\",\"reference_url\":null}",
        )
        .unwrap();
        assert_eq!(s.title, "Tabby cat");
        assert!(s.reference_url.is_none());
    }
}
