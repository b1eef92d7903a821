//! Instant-answer lookup and fact mining.
//!
//! The instant-answer service either returns a direct abstract or an
//! arbitrary nested structure. [`mine_lifespan_fact`] scans the latter for
//! a loosely-patterned lifespan fact; it is deliberately isolated here and
//! kept out of the general answer-formatting logic.

use async_trait::async_trait;
use regex::Regex;

use optic_core::config::InstantAnswerConfig;

/// Transport seam for the instant-answer tier.
#[async_trait]
pub trait InstantAnswer: Send + Sync {
    /// Query the service, returning the raw JSON body on success.
    async fn query(&self, q: &str) -> Option<serde_json::Value>;
}

/// Production client for the DuckDuckGo Instant Answer API.
pub struct DuckDuckGoClient {
    client: reqwest::Client,
    config: InstantAnswerConfig,
}

impl DuckDuckGoClient {
    pub fn new(client: reqwest::Client, config: InstantAnswerConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl InstantAnswer for DuckDuckGoClient {
    async fn query(&self, q: &str) -> Option<serde_json::Value> {
        let request = self.client.get(&self.config.endpoint).query(&[
            ("q", q),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ]);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(query = %q, error = %e, "Instant-answer request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(query = %q, status = %response.status(), "Instant-answer non-success");
            return None;
        }

        match response.json().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!(query = %q, error = %e, "Instant-answer response malformed");
                None
            }
        }
    }
}

/// Pull the direct abstract text out of an instant-answer response.
///
/// Checks `AbstractText` first, then `Abstract`; returns the trimmed text
/// when non-empty.
pub fn extract_abstract(body: &serde_json::Value) -> Option<String> {
    for field in ["AbstractText", "Abstract"] {
        if let Some(text) = body.get(field).and_then(|v| v.as_str()) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Scan a raw instant-answer body for an infobox-like lifespan fact.
///
/// Matches a "life span"-like field followed by `:` or `=` and a number
/// with a time-unit token (years/yrs/y), anywhere in the serialized JSON.
/// Returns the matched value, e.g. `"10 - 12 years"`.
///
/// This is a heuristic over unstructured data: a lifespan-shaped phrase in
/// any unrelated field will match (known false-positive risk, accepted for
/// a last-resort fallback tier).
pub fn mine_lifespan_fact(body: &serde_json::Value) -> Option<String> {
    let raw = body.to_string().to_lowercase();
    let re = Regex::new(r#"life\s*span[^:]*[:=]\s*"?([0-9.\-\s]+\s*(?:years?|yrs?|y))"#).ok()?;
    let fact = re.captures(&raw)?.get(1)?.as_str().trim().to_string();
    if fact.is_empty() {
        None
    } else {
        Some(fact)
    }
}
