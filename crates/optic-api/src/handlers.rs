//! Route handler functions for all API endpoints.
//!
//! Each handler extracts the JSON body via axum extractors, interacts
//! with AppState services, and returns JSON responses.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use optic_core::types::{KnowledgeSummary, Prediction, Turn};

use crate::error::ApiError;
use crate::proxy::CompletionRequest;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub session_id: Option<Uuid>,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub session_id: Uuid,
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub messages: Option<Vec<Turn>>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub session_id: Uuid,
    pub topic: String,
    pub summary: Option<KnowledgeSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /analyze - record a classification result and resolve its topic.
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let outcome = state
        .orchestrator
        .analyze(body.session_id, &body.predictions)
        .await;
    Json(AnalyzeResponse {
        session_id: outcome.session_id,
        topic: outcome.topic,
        summary: outcome.summary,
    })
}

/// POST /question - answer a question in a session's image context.
pub async fn question(
    State(state): State<AppState>,
    Json(body): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let answer = state
        .orchestrator
        .ask(body.session_id, &body.question)
        .await?;
    Ok(Json(AnswerResponse { answer }))
}

/// POST /qa - forward a conversation to the chat-completion upstream.
pub async fn qa(
    State(state): State<AppState>,
    Json(body): Json<QaRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let messages = match body.messages {
        Some(messages) if !messages.is_empty() => messages,
        _ => return Err(ApiError::BadRequest("messages array required".to_string())),
    };

    let answer = state
        .proxy
        .complete(CompletionRequest {
            messages,
            model: body.model,
            temperature: body.temperature,
            max_tokens: body.max_tokens,
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(AnswerResponse { answer }))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    use optic_chat::{AnswerChain, FallbackSource, QaOrchestrator, SummarySource, NO_IMAGE_PROMPT};
    use optic_core::config::OpticConfig;
    use optic_knowledge::lookup::NullLookup;
    use optic_knowledge::resolver::KnowledgeResolver;

    use crate::proxy::QaProxy;

    fn make_state() -> AppState {
        let config = OpticConfig::default();
        let resolver = KnowledgeResolver::new(Arc::new(NullLookup));
        let chain = AnswerChain::new(vec![Box::new(SummarySource), Box::new(FallbackSource)]);
        let orchestrator = QaOrchestrator::new(resolver, chain, config.chat.clone());
        let proxy = QaProxy::new(reqwest::Client::new(), &config.proxy, None);
        AppState::new(orchestrator, proxy, config)
    }

    fn make_app() -> axum::Router {
        crate::create_router(make_state())
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = make_app();
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let health: HealthResponse = json_body(resp).await;
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_analyze_returns_session_and_topic() {
        let app = make_app();
        let resp = app
            .oneshot(post_json(
                "/analyze",
                serde_json::json!({
                    "predictions": [
                        {"label": "tabby, tabby cat", "confidence": 0.91},
                        {"label": "tiger cat", "confidence": 0.04}
                    ]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let analysis: AnalyzeResponse = json_body(resp).await;
        assert_eq!(analysis.topic, "tabby");
        // NullLookup never resolves a summary.
        assert!(analysis.summary.is_none());
    }

    #[tokio::test]
    async fn test_question_flow_falls_back_to_generic() {
        let app = make_app();

        let resp = app
            .clone()
            .oneshot(post_json(
                "/analyze",
                serde_json::json!({
                    "predictions": [{"label": "tabby, tabby cat", "confidence": 0.91}]
                }),
            ))
            .await
            .unwrap();
        let analysis: AnalyzeResponse = json_body(resp).await;

        let resp = app
            .oneshot(post_json(
                "/question",
                serde_json::json!({
                    "session_id": analysis.session_id,
                    "question": "what is it?"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let answer: AnswerResponse = json_body(resp).await;
        assert_eq!(answer.answer, "The image appears to show: tabby.");
    }

    #[tokio::test]
    async fn test_question_before_analysis_gets_fixed_prompt() {
        let app = make_app();
        let resp = app
            .clone()
            .oneshot(post_json("/analyze", serde_json::json!({"predictions": []})))
            .await
            .unwrap();
        let analysis: AnalyzeResponse = json_body(resp).await;

        let resp = app
            .oneshot(post_json(
                "/question",
                serde_json::json!({
                    "session_id": analysis.session_id,
                    "question": "what is it?"
                }),
            ))
            .await
            .unwrap();
        let answer: AnswerResponse = json_body(resp).await;
        assert_eq!(answer.answer, NO_IMAGE_PROMPT);
    }

    #[tokio::test]
    async fn test_question_unknown_session_is_404() {
        let app = make_app();
        let resp = app
            .oneshot(post_json(
                "/question",
                serde_json::json!({
                    "session_id": Uuid::new_v4(),
                    "question": "hello"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_question_is_400() {
        let app = make_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/analyze",
                serde_json::json!({
                    "predictions": [{"label": "tabby", "confidence": 0.9}]
                }),
            ))
            .await
            .unwrap();
        let analysis: AnalyzeResponse = json_body(resp).await;

        let resp = app
            .oneshot(post_json(
                "/question",
                serde_json::json!({
                    "session_id": analysis.session_id,
                    "question": "   "
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_qa_requires_messages() {
        let app = make_app();
        let resp = app
            .clone()
            .oneshot(post_json("/qa", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = app
            .oneshot(post_json("/qa", serde_json::json!({"messages": []})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_qa_without_credential_is_500() {
        let app = make_app();
        let resp = app
            .oneshot(post_json(
                "/qa",
                serde_json::json!({
                    "messages": [{"role": "user", "content": "what is it?"}]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
