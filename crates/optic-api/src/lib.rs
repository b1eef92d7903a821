//! Optic API crate - axum HTTP server and route handlers.
//!
//! Provides the REST API for the Optic application: image analysis
//! intake, session Q&A, the chat-completion proxy, and health checks.

pub mod error;
pub mod handlers;
pub mod proxy;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use proxy::QaProxy;
pub use routes::{create_router, start_server};
pub use state::AppState;
