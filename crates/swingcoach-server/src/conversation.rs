//! Session-scoped chat transcripts held for the life of the process

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use swingcoach_llm::ChatTurn;

/// Session used by callers that do not send a `sessionId`
pub const DEFAULT_SESSION: &str = "default";

/// Append-only transcripts keyed by session id.
///
/// Nothing is trimmed, deduplicated or evicted. The lock is only taken for
/// copies and appends, never across an LLM call.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: Mutex<HashMap<String, Vec<ChatTurn>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<ChatTurn>>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self, session: &str) -> Vec<ChatTurn> {
        self.lock().get(session).cloned().unwrap_or_default()
    }

    /// Append turns contiguously, in order
    pub fn append<I>(&self, session: &str, turns: I)
    where
        I: IntoIterator<Item = ChatTurn>,
    {
        self.lock()
            .entry(session.to_string())
            .or_default()
            .extend(turns);
    }

    pub fn len(&self, session: &str) -> usize {
        self.lock().get(session).map_or(0, Vec::len)
    }

    pub fn session_count(&self) -> usize {
        self.lock().len()
    }
}
