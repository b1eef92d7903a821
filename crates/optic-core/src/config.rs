use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{OpticError, Result};

/// Top-level configuration for the Optic application.
///
/// Loaded from `~/.optic/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpticConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub instant_answer: InstantAnswerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

impl OpticConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OpticConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| OpticError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// API server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 8788,
            log_level: "info".to_string(),
        }
    }
}

/// Knowledge resolver endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Base URL of the page summary endpoint (title appended as a path segment).
    pub summary_endpoint: String,
    /// URL of the opensearch-style title search endpoint.
    pub search_endpoint: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            summary_endpoint: "https://en.wikipedia.org/api/rest_v1/page/summary".to_string(),
            search_endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
        }
    }
}

/// Remote assistant tier configuration.
///
/// When `endpoint` is unset the assistant tier is skipped entirely;
/// that is a valid configuration, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Assistant endpoint URL (e.g. the local `/qa` proxy). None disables the tier.
    pub endpoint: Option<String>,
    /// Model name forwarded to the endpoint. None lets the endpoint choose.
    pub model: Option<String>,
    /// Sampling temperature. Kept low to favor determinism.
    pub temperature: f32,
    /// Response length cap in tokens.
    pub max_tokens: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: None,
            temperature: 0.3,
            max_tokens: 350,
        }
    }
}

/// Instant-answer lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstantAnswerConfig {
    /// Instant-answer endpoint URL.
    pub endpoint: String,
}

impl Default for InstantAnswerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.duckduckgo.com/".to_string(),
        }
    }
}

/// Conversation and session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of recent turns handed to answer sources as context.
    pub context_turns: usize,
    /// Upper bound on stored history; oldest turns are evicted beyond this.
    pub max_history_turns: usize,
    /// Maximum classification result lines included in a request digest.
    pub max_result_lines: usize,
    /// Clear the conversation log when a new image is analyzed.
    pub reset_history_on_analyze: bool,
    /// Session idle timeout in minutes.
    pub session_timeout_minutes: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_turns: 6,
            max_history_turns: 100,
            max_result_lines: 5,
            reset_history_on_analyze: true,
            session_timeout_minutes: 30,
        }
    }
}

/// Assistant proxy (server-side `/qa` boundary) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// OpenAI-compatible chat completions URL to forward requests to.
    pub upstream_url: String,
    /// Model used when the request does not name one.
    pub default_model: String,
    /// Environment variable holding the upstream API key.
    pub api_key_env: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            default_model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "OPTIC_API_KEY".to_string(),
        }
    }
}
