//! Conversation history with a bounded recent-context window.

use optic_core::types::Turn;

/// Append-only conversation transcript.
///
/// Turns are stored oldest-first and never mutated after insertion. The
/// underlying history is bounded: once `max_turns` is exceeded the oldest
/// turns are evicted. [`ConversationLog::recent_window`] exposes the
/// suffix handed to answer sources as context.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    turns: Vec<Turn>,
    max_turns: usize,
}

impl ConversationLog {
    /// Create an empty log retaining at most `max_turns` turns.
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_turns,
        }
    }

    /// Append a turn, evicting the oldest turns beyond the retention bound.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        while self.turns.len() > self.max_turns {
            self.turns.remove(0);
        }
    }

    /// The last `n` turns, oldest-first. Returns the whole history when
    /// fewer than `n` turns exist.
    pub fn recent_window(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Full transcript, oldest-first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop the whole transcript (new image analysis).
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
