//! Application state shared across all route handlers.
//!
//! AppState holds references to the orchestrator, the completion proxy,
//! and the loaded configuration. It is passed to handlers via axum's
//! State extractor.

use std::sync::Arc;
use std::time::Instant;

use optic_chat::QaOrchestrator;
use optic_core::config::OpticConfig;

use crate::proxy::QaProxy;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Q&A orchestrator holding session state.
    pub orchestrator: Arc<QaOrchestrator>,
    /// Chat-completion proxy holding the upstream credential.
    pub proxy: Arc<QaProxy>,
    /// Loaded application configuration.
    pub config: Arc<OpticConfig>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: QaOrchestrator, proxy: QaProxy, config: OpticConfig) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            proxy: Arc::new(proxy),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
