use thiserror::Error;

/// Top-level error type for the Optic system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define their
/// own error types and implement `From<SubsystemError> for OpticError` so
/// that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpticError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge error: {0}")]
    Knowledge(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for OpticError {
    fn from(err: toml::de::Error) -> Self {
        OpticError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for OpticError {
    fn from(err: toml::ser::Error) -> Self {
        OpticError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for OpticError {
    fn from(err: serde_json::Error) -> Self {
        OpticError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Optic operations.
pub type Result<T> = std::result::Result<T, OpticError>;
