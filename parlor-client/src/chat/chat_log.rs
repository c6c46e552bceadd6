use parlor_core::ChatMessage;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Append-only, arrival-ordered room chat history. Cloning shares the log;
/// entries are never mutated after they are appended.
#[derive(Clone, Default)]
pub struct ChatLog {
    entries: Arc<Mutex<Vec<ChatMessage>>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, message: ChatMessage) {
        self.entries.lock().await.push(message);
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.entries.lock().await.clone()
    }

    /// The log lives as long as the room does; leaving or losing the
    /// transport starts a fresh one.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
