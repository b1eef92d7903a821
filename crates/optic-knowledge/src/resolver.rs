//! Two-tier knowledge resolution.
//!
//! Direct lookups are fast but fail on non-canonical names; the search
//! fallback trades one extra round-trip for resilience against label
//! strings that do not match canonical titles exactly.

use std::sync::Arc;

use optic_core::types::KnowledgeSummary;

use crate::lookup::{KnowledgeLookup, PageSummary};
use crate::normalize::collapse_whitespace;

/// Resolves a topic string to a [`KnowledgeSummary`].
pub struct KnowledgeResolver {
    lookup: Arc<dyn KnowledgeLookup>,
}

impl KnowledgeResolver {
    pub fn new(lookup: Arc<dyn KnowledgeLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve a summary for `topic`.
    ///
    /// Tier 1: direct summary lookup by topic. Tier 2: search for the
    /// best-matching canonical title and retry the summary lookup with it.
    /// Returns `None` when both tiers miss — a legitimate "unknown"
    /// outcome, not an error. Failures at either tier never propagate.
    pub async fn resolve(&self, topic: &str) -> Option<KnowledgeSummary> {
        let query = collapse_whitespace(topic);
        if query.is_empty() {
            return None;
        }

        if let Some(page) = self.lookup.page_summary(&query).await {
            if let Some(summary) = usable_summary(page) {
                tracing::debug!(topic = %query, title = %summary.title, "Summary resolved directly");
                return Some(summary);
            }
        }

        // Direct lookup missed (or hit a page with no extract, e.g. a
        // disambiguation page). Resolve the canonical title via search.
        let resolved_title = self.lookup.search_best_title(&query).await?;
        tracing::debug!(topic = %query, resolved = %resolved_title, "Retrying via search result");

        let page = self.lookup.page_summary(&resolved_title).await?;
        match usable_summary(page) {
            Some(summary) => {
                tracing::debug!(topic = %query, title = %summary.title, "Summary resolved via search");
                Some(summary)
            }
            None => {
                tracing::debug!(topic = %query, "No usable summary found");
                None
            }
        }
    }
}

/// A page counts as a usable summary only when its extract is non-empty.
fn usable_summary(page: PageSummary) -> Option<KnowledgeSummary> {
    if page.extract.trim().is_empty() {
        return None;
    }
    Some(KnowledgeSummary {
        title: page.title,
        extract: page.extract,
        reference_url: page.url,
    })
}
