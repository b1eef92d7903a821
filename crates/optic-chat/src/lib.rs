//! Conversational Q&A engine for Optic.
//!
//! Provides session management, a bounded conversation log, and the
//! multi-tier answer source chain that turns an image topic plus a user
//! question into an answer.

pub mod chain;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod source;

pub use chain::AnswerChain;
pub use context::ConversationLog;
pub use error::ChatError;
pub use orchestrator::{AnalyzeOutcome, QaOrchestrator, Session, NO_IMAGE_PROMPT};
pub use source::{
    AnswerSource, AssistantSource, FallbackSource, InstantAnswerSource, SummarySource,
};
