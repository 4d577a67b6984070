use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: String,
    sender: Sender,
    text: String,
    timestamp: i64,
}

impl Message {
    /// Builds a message stamped with `timestamp` (milliseconds since the Unix
    /// epoch). Returns `None` when `text` is blank; stored text is trimmed.
    pub fn new(sender: Sender, text: &str, timestamp: i64) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: format!("{}-{}", sender.as_str(), timestamp),
            sender,
            text: text.to_string(),
            timestamp,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }
}
