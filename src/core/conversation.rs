use chrono::Utc;

use crate::core::message::{Message, Sender};

/// Append-only, in-memory log of the session's messages, oldest first.
#[derive(Debug, Default, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Creates a message stamped with the current time and appends it.
    ///
    /// Timestamps handed out here strictly increase, so ids stay unique even
    /// when two messages land within the same millisecond.
    pub fn record(&mut self, sender: Sender, text: &str) -> Option<&Message> {
        let now = Utc::now().timestamp_millis();
        let timestamp = match self.messages.last() {
            Some(last) if last.timestamp() >= now => last.timestamp() + 1,
            _ => now,
        };
        let message = Message::new(sender, text, timestamp)?;
        self.append(message);
        self.messages.last()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
