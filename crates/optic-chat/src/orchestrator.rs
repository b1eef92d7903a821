//! Q&A orchestrator: sessions, image analysis state, and question routing.
//!
//! Holds per-session state (recognized topic, resolved summary, prediction
//! digest, conversation log) and coordinates the knowledge resolver with
//! the answer source chain.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use tracing::debug;
use uuid::Uuid;

use optic_core::config::ChatConfig;
use optic_core::types::{AnswerRequest, KnowledgeSummary, Prediction, Turn};
use optic_knowledge::normalize::normalize_label;
use optic_knowledge::resolver::KnowledgeResolver;

use crate::chain::AnswerChain;
use crate::context::ConversationLog;
use crate::error::ChatError;

/// Fixed reply for questions asked before any image has been analyzed.
pub const NO_IMAGE_PROMPT: &str = "Please analyze an image first.";

/// Maximum question length in characters.
const MAX_QUESTION_LENGTH: usize = 2000;

/// Per-session Q&A state.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub topic: Option<String>,
    pub summary: Option<KnowledgeSummary>,
    pub result_lines: Vec<String>,
    pub log: ConversationLog,
    pub started_at: i64,
    pub last_message_at: i64,
}

/// What an analysis produced for the caller: the session it landed in and
/// the resolved context.
#[derive(Debug, Clone)]
pub struct AnalyzeOutcome {
    pub session_id: Uuid,
    pub topic: String,
    pub summary: Option<KnowledgeSummary>,
}

/// Central coordinator for image Q&A sessions.
pub struct QaOrchestrator {
    resolver: KnowledgeResolver,
    chain: AnswerChain,
    sessions: Mutex<HashMap<Uuid, Session>>,
    config: ChatConfig,
}

impl QaOrchestrator {
    pub fn new(resolver: KnowledgeResolver, chain: AnswerChain, config: ChatConfig) -> Self {
        Self {
            resolver,
            chain,
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Record a fresh image analysis for a session.
    ///
    /// Normalizes the top prediction label into the session topic,
    /// resolves its knowledge summary, and stores a numbered digest of the
    /// leading predictions. Concurrent analyses race benignly: the last
    /// writer wins. With `reset_history_on_analyze` set, the conversation
    /// log restarts with the new image.
    pub async fn analyze(
        &self,
        session_id: Option<Uuid>,
        predictions: &[Prediction],
    ) -> AnalyzeOutcome {
        let sid = self.resolve_session(session_id);

        let topic = predictions
            .first()
            .map(|p| normalize_label(&p.label))
            .unwrap_or_default();

        // Network resolution happens outside the sessions lock.
        let summary = if topic.is_empty() {
            None
        } else {
            self.resolver.resolve(&topic).await
        };

        let result_lines: Vec<String> = predictions
            .iter()
            .take(self.config.max_result_lines)
            .enumerate()
            .map(|(i, p)| format!("{}. {} {:.2}%", i + 1, p.label, p.confidence * 100.0))
            .collect();

        let now = Local::now().timestamp();
        let mut sessions = self.lock_sessions();
        let session = sessions.entry(sid).or_insert_with(|| {
            // The session can vanish between resolve_session and here if
            // another thread expired it; recreate in place.
            new_session(sid, self.config.max_history_turns, now)
        });
        session.topic = if topic.is_empty() {
            None
        } else {
            Some(topic.clone())
        };
        session.summary = summary.clone();
        session.result_lines = result_lines;
        session.last_message_at = now;
        if self.config.reset_history_on_analyze {
            session.log.clear();
        }
        debug!(session = %sid, topic = %topic, resolved = summary.is_some(), "analysis recorded");

        AnalyzeOutcome {
            session_id: sid,
            topic,
            summary,
        }
    }

    /// Answer a question in the context of a session's current image.
    ///
    /// Questions asked before any analysis get the fixed prompt back,
    /// with no history mutation and no network traffic.
    pub async fn ask(&self, session_id: Uuid, question: &str) -> Result<String, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }
        if question.len() > MAX_QUESTION_LENGTH {
            return Err(ChatError::QuestionTooLong(MAX_QUESTION_LENGTH));
        }

        // Build the request under the lock, run the chain outside it.
        let request = {
            let mut sessions = self.lock_sessions();
            let session = sessions
                .get_mut(&session_id)
                .ok_or(ChatError::SessionNotFound(session_id))?;

            let Some(topic) = session.topic.clone() else {
                return Ok(NO_IMAGE_PROMPT.to_string());
            };

            session.log.append(Turn::user(question));
            session.last_message_at = Local::now().timestamp();

            AnswerRequest {
                topic,
                summary: session.summary.clone(),
                result_lines: session.result_lines.clone(),
                history: session.log.recent_window(self.config.context_turns).to_vec(),
                question: question.to_string(),
            }
        };

        let answer = self.chain.resolve(&request).await;

        let mut sessions = self.lock_sessions();
        if let Some(session) = sessions.get_mut(&session_id) {
            session.log.append(Turn::assistant(answer.clone()));
            session.last_message_at = Local::now().timestamp();
        }
        Ok(answer)
    }

    /// Full conversation transcript for a session, oldest-first.
    pub fn history(&self, session_id: Uuid) -> Result<Vec<Turn>, ChatError> {
        let sessions = self.lock_sessions();
        sessions
            .get(&session_id)
            .map(|s| s.log.turns().to_vec())
            .ok_or(ChatError::SessionNotFound(session_id))
    }

    /// Snapshot of a session's state.
    pub fn session(&self, session_id: Uuid) -> Option<Session> {
        self.lock_sessions().get(&session_id).cloned()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.lock_sessions().len()
    }

    // -- Private helpers --

    /// Reuse the requested session when it exists and has not idled out;
    /// otherwise create a fresh one.
    fn resolve_session(&self, requested: Option<Uuid>) -> Uuid {
        let now = Local::now().timestamp();
        let mut sessions = self.lock_sessions();

        if let Some(sid) = requested {
            if let Some(session) = sessions.get(&sid) {
                if !self.is_expired(session, now) {
                    return sid;
                }
                debug!(session = %sid, "session expired, replacing");
                sessions.remove(&sid);
            }
        }

        let session = new_session(Uuid::new_v4(), self.config.max_history_turns, now);
        let sid = session.id;
        sessions.insert(sid, session);
        sid
    }

    fn is_expired(&self, session: &Session, now: i64) -> bool {
        let timeout_secs = self.config.session_timeout_minutes as i64 * 60;
        now - session.last_message_at > timeout_secs
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        // A poisoning panic cannot leave the map structurally broken;
        // recover the guard and continue.
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn new_session(id: Uuid, max_history_turns: usize, now: i64) -> Session {
    Session {
        id,
        topic: None,
        summary: None,
        result_lines: Vec::new(),
        log: ConversationLog::new(max_history_turns),
        started_at: now,
        last_message_at: now,
    }
}

// =============================================================================
// Tests
// =============================================================================
