//! Knowledge lookup transport.
//!
//! Defines the [`KnowledgeLookup`] async trait and the production
//! [`WikiLookup`] backed by the Wikipedia REST summary endpoint and the
//! MediaWiki opensearch endpoint. All transport and parse failures are
//! soft: they log at debug level and surface as `None`.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use optic_core::config::KnowledgeConfig;

/// A fetched page summary, prior to any resolution policy.
///
/// `extract` may be empty (disambiguation and redirect pages); deciding
/// whether that counts as a usable result is the resolver's job.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub title: String,
    pub extract: String,
    pub url: Option<String>,
}

/// Transport seam for the knowledge resolver.
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Fetch the summary for a page identified by `title`.
    async fn page_summary(&self, title: &str) -> Option<PageSummary>;

    /// Free-text search returning the best-matching canonical title.
    async fn search_best_title(&self, query: &str) -> Option<String>;
}

// =============================================================================
// WikiLookup
// =============================================================================

/// Wire shape of the REST summary response.
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: Option<String>,
    extract: Option<String>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<DesktopUrls>,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
    page: Option<String>,
}

/// Production lookup against Wikipedia.
pub struct WikiLookup {
    client: reqwest::Client,
    config: KnowledgeConfig,
}

impl WikiLookup {
    pub fn new(client: reqwest::Client, config: KnowledgeConfig) -> Self {
        Self { client, config }
    }

    /// Build the summary URL with `title` as a percent-encoded path segment.
    fn summary_url(&self, title: &str) -> Option<Url> {
        let mut url = Url::parse(&self.config.summary_endpoint).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().push(title);
        Some(url)
    }
}

#[async_trait]
impl KnowledgeLookup for WikiLookup {
    async fn page_summary(&self, title: &str) -> Option<PageSummary> {
        let url = self.summary_url(title)?;

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(title = %title, error = %e, "Summary request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(title = %title, status = %response.status(), "Summary lookup non-success");
            return None;
        }

        let body: SummaryResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(title = %title, error = %e, "Summary response malformed");
                return None;
            }
        };

        Some(PageSummary {
            title: body.title.unwrap_or_else(|| title.to_string()),
            extract: body.extract.unwrap_or_default(),
            url: body
                .content_urls
                .and_then(|c| c.desktop)
                .and_then(|d| d.page),
        })
    }

    async fn search_best_title(&self, query: &str) -> Option<String> {
        let request = self.client.get(&self.config.search_endpoint).query(&[
            ("action", "opensearch"),
            ("format", "json"),
            ("limit", "1"),
            ("search", query),
        ]);

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(query = %query, error = %e, "Title search request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(query = %query, status = %response.status(), "Title search non-success");
            return None;
        }

        let body: serde_json::Value = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(query = %query, error = %e, "Title search response malformed");
                return None;
            }
        };

        // Opensearch format: [query, [titles...], [descriptions...], [urls...]]
        best_title_from_opensearch(&body)
    }
}

/// Extract the top search-result title from an opensearch response body.
fn best_title_from_opensearch(body: &serde_json::Value) -> Option<String> {
    let title = body.get(1)?.get(0)?.as_str()?.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

// =============================================================================
// NullLookup
// =============================================================================

/// Lookup that never resolves anything.
///
/// Used when the deployment has no network access and as a stand-in in
/// tests; every resolution degrades to the "unknown topic" path.
pub struct NullLookup;

#[async_trait]
impl KnowledgeLookup for NullLookup {
    async fn page_summary(&self, _title: &str) -> Option<PageSummary> {
        None
    }

    async fn search_best_title(&self, _query: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- opensearch parsing ----

    #[test]
    fn test_best_title_from_opensearch() {
        let body = json!(["tabby", ["Tabby cat"], ["A tabby is..."], ["https://..."]]);
        assert_eq!(
            best_title_from_opensearch(&body),
            Some("Tabby cat".to_string())
        );
    }

    #[test]
    fn test_best_title_empty_results() {
        let body = json!(["zzzz", [], [], []]);
        assert_eq!(best_title_from_opensearch(&body), None);
    }

    #[test]
    fn test_best_title_malformed_body() {
        assert_eq!(best_title_from_opensearch(&json!({})), None);
        assert_eq!(best_title_from_opensearch(&json!(null)), None);
        assert_eq!(best_title_from_opensearch(&json!(["only-query"])), None);
    }

    #[test]
    fn test_best_title_blank_entry() {
        let body = json!(["q", ["   "], [], []]);
        assert_eq!(best_title_from_opensearch(&body), None);
    }

    #[test]
    fn test_best_title_non_string_entry() {
        let body = json!(["q", [42], [], []]);
        assert_eq!(best_title_from_opensearch(&body), None);
    }

    // ---- summary response wire shape ----

    #[test]
    fn test_summary_response_full() {
        let body: SummaryResponse = serde_json::from_value(json!({
            "title": "Tabby cat",
            "extract": "A tabby is any domestic cat with a distinctive coat.",
            "content_urls": {"desktop": {"page": "https://en.wikipedia.org/wiki/Tabby_cat"}}
        }))
        .unwrap();
        assert_eq!(body.title.as_deref(), Some("Tabby cat"));
        assert!(body.extract.unwrap().starts_with("A tabby"));
        assert_eq!(
            body.content_urls
                .and_then(|c| c.desktop)
                .and_then(|d| d.page)
                .as_deref(),
            Some("https://en.wikipedia.org/wiki/Tabby_cat")
        );
    }

    #[test]
    fn test_summary_response_missing_extract() {
        let body: SummaryResponse =
            serde_json::from_value(json!({"title": "Tabby (disambiguation)"})).unwrap();
        assert!(body.extract.is_none());
        assert!(body.content_urls.is_none());
    }

    // ---- URL building ----

    #[test]
    fn test_summary_url_encodes_title() {
        let lookup = WikiLookup::new(reqwest::Client::new(), KnowledgeConfig::default());
        let url = lookup.summary_url("golden retriever").unwrap();
        assert!(url.as_str().ends_with("/page/summary/golden%20retriever"));
    }

    #[test]
    fn test_summary_url_trailing_slash_base() {
        let config = KnowledgeConfig {
            summary_endpoint: "https://example.org/api/summary/".to_string(),
            ..KnowledgeConfig::default()
        };
        let lookup = WikiLookup::new(reqwest::Client::new(), config);
        let url = lookup.summary_url("tabby").unwrap();
        assert_eq!(url.as_str(), "https://example.org/api/summary/tabby");
    }

    // ---- NullLookup ----

    #[tokio::test]
    async fn test_null_lookup_resolves_nothing() {
        assert!(NullLookup.page_summary("tabby").await.is_none());
        assert!(NullLookup.search_best_title("tabby").await.is_none());
    }
}
