//! Terminal fallback tier.

use async_trait::async_trait;

use optic_core::types::AnswerRequest;

use crate::source::AnswerSource;

/// Templated statement naming the recognized topic.
pub fn generic_answer(topic: &str) -> String {
    format!("The image appears to show: {}.", topic)
}

/// Tier that cannot fail: always produces the generic template.
pub struct FallbackSource;

#[async_trait]
impl AnswerSource for FallbackSource {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn answer(&self, request: &AnswerRequest) -> Option<String> {
        Some(generic_answer(&request.topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(topic: &str) -> AnswerRequest {
        AnswerRequest {
            topic: topic.to_string(),
            summary: None,
            result_lines: vec![],
            history: vec![],
            question: "anything".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fallback_always_answers() {
        let answer = FallbackSource.answer(&request("tabby")).await.unwrap();
        assert_eq!(answer, "The image appears to show: tabby.");
    }

    #[test]
    fn test_generic_answer_template() {
        assert_eq!(
            generic_answer("golden retriever"),
            "The image appears to show: golden retriever."
        );
    }
}
