//! Instant-answer tier backed by a public answer API.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use optic_core::types::AnswerRequest;
use optic_knowledge::instant::{extract_abstract, mine_lifespan_fact, InstantAnswer};

use crate::source::AnswerSource;

/// Tier that queries an instant-answer API with "topic question" and
/// accepts either the abstract text or a mined lifespan fact.
pub struct InstantAnswerSource {
    client: Arc<dyn InstantAnswer>,
}

impl InstantAnswerSource {
    pub fn new(client: Arc<dyn InstantAnswer>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnswerSource for InstantAnswerSource {
    fn name(&self) -> &'static str {
        "instant-answer"
    }

    async fn answer(&self, request: &AnswerRequest) -> Option<String> {
        let query = format!("{} {}", request.topic, request.question);
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let body = self.client.query(query).await?;
        if let Some(text) = extract_abstract(&body) {
            return Some(text);
        }
        if let Some(fact) = mine_lifespan_fact(&body) {
            return Some(format!("{} lifespan: {}", request.topic, fact));
        }
        debug!(topic = %request.topic, "instant answer had no abstract or mined fact");
        None
    }
}
