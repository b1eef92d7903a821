//! Knowledge-summary tier: answer from the resolved article extract.

use async_trait::async_trait;
use tracing::debug;

use optic_core::types::AnswerRequest;

use crate::source::AnswerSource;

/// Take the first `count` sentences of `text`.
///
/// Sentences end at `.`, `!` or `?` followed by whitespace. Input with no
/// terminator counts as a single sentence.
pub fn first_sentences(text: &str, count: usize) -> String {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() && sentences.len() < count {
        let c = bytes[i] as char;
        if matches!(c, '.' | '!' | '?') {
            let next = bytes.get(i + 1).map(|b| *b as char);
            if next.is_none() || next.is_some_and(|n| n.is_whitespace()) {
                let sentence = text[start..=i].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = i + 1;
            }
        }
        i += 1;
    }
    if sentences.len() < count && start < text.len() {
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
    }
    sentences.join(" ")
}

/// Tier that quotes the leading sentences of the resolved summary.
pub struct SummarySource;

#[async_trait]
impl AnswerSource for SummarySource {
    fn name(&self) -> &'static str {
        "summary"
    }

    async fn answer(&self, request: &AnswerRequest) -> Option<String> {
        let summary = request.summary.as_ref()?;
        let extract = summary.extract.trim();
        if extract.is_empty() {
            debug!(topic = %request.topic, "summary present but empty, skipping");
            return None;
        }
        let sentences = first_sentences(extract, 2);
        Some(format!(
            "From the image context ({}): {}",
            request.topic, sentences
        ))
    }
}
