//! Error types for the Q&A engine.

use optic_core::error::OpticError;

/// Errors from the Q&A orchestrator.
///
/// Note the deliberate asymmetry with the answer chain: the chain never
/// fails, these errors only cover request preconditions.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("question exceeds maximum length of {0} characters")]
    QuestionTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
}

impl From<ChatError> for OpticError {
    fn from(err: ChatError) -> Self {
        OpticError::Chat(err.to_string())
    }
}
