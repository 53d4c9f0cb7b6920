//! Append-only conversation log with change notification.
//!
//! Front ends subscribe to receive every appended turn instead of polling
//! the log.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use sc_protocol::ChatTurn;

const EVENT_CAPACITY: usize = 64;

/// Shared, cloneable conversation log.
#[derive(Clone)]
pub struct ConversationLog {
    turns: Arc<RwLock<Vec<ChatTurn>>>,
    events: broadcast::Sender<ChatTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::with_seed(Vec::new())
    }

    /// Start from pre-existing turns (e.g. a greeting exchange). Seed turns
    /// are not announced to subscribers.
    pub fn with_seed(turns: Vec<ChatTurn>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            turns: Arc::new(RwLock::new(turns)),
            events,
        }
    }

    /// Append a turn and notify subscribers.
    pub async fn append(&self, turn: ChatTurn) {
        self.turns.write().await.push(turn.clone());
        // No subscribers is fine.
        let _ = self.events.send(turn);
    }

    /// Copy of all turns, oldest first.
    pub async fn snapshot(&self) -> Vec<ChatTurn> {
        self.turns.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.read().await.is_empty()
    }

    /// Receive every turn appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatTurn> {
        self.events.subscribe()
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}
