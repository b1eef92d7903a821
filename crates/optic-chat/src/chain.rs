//! Ordered answer source chain with first-success semantics.

use tracing::debug;

use optic_core::types::AnswerRequest;

use crate::source::fallback::generic_answer;
use crate::source::AnswerSource;

/// Runs answer sources in priority order and takes the first usable
/// answer.
///
/// The chain is total: if every source declines, the generic template
/// answer is produced, so callers always receive a non-empty string.
pub struct AnswerChain {
    sources: Vec<Box<dyn AnswerSource>>,
}

impl AnswerChain {
    pub fn new(sources: Vec<Box<dyn AnswerSource>>) -> Self {
        Self { sources }
    }

    /// Resolve an answer, consulting sources in order.
    ///
    /// A source's answer is accepted when it is non-empty after trimming.
    /// Later sources are not consulted once one succeeds.
    pub async fn resolve(&self, request: &AnswerRequest) -> String {
        for source in &self.sources {
            if let Some(answer) = source.answer(request).await {
                let answer = answer.trim();
                if !answer.is_empty() {
                    debug!(source = source.name(), "answer source succeeded");
                    return answer.to_string();
                }
                debug!(source = source.name(), "answer source returned blank, skipping");
            }
        }
        generic_answer(&request.topic)
    }
}
