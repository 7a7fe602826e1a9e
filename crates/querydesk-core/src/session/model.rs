//! Thread domain model.
//!
//! A [`Thread`] is one independent conversation. Threads are addressed by their
//! position in the session, and also carry a stable id so that a reply can find
//! its thread even after other threads were deleted.

use super::message::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to threads that have not received a question yet.
pub const DEFAULT_THREAD_TITLE: &str = "New Chat";

/// Maximum number of characters kept from the first question.
pub const TITLE_MAX_CHARS: usize = 25;

/// Marker appended to truncated titles.
pub const TITLE_ELLIPSIS: &str = "...";

/// One conversation thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    /// Stable identifier (UUID format)
    pub id: String,
    /// Display title, frozen by the first user message
    pub title: String,
    /// Timestamp when the thread was created (ISO 8601 format)
    pub created_at: String,
    pub messages: Vec<Message>,
}

impl Thread {
    /// Creates an empty thread titled "New Chat".
    pub fn new() -> Self {
        Self {
            id: new_thread_id(),
            title: DEFAULT_THREAD_TITLE.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            messages: Vec::new(),
        }
    }

    /// Rebuilds a thread from its persisted record and title.
    pub fn from_record(record: ThreadRecord, title: String) -> Self {
        Self {
            id: record.id,
            title,
            created_at: record.created_at,
            messages: record.messages,
        }
    }

    pub fn to_record(&self) -> ThreadRecord {
        ThreadRecord {
            id: self.id.clone(),
            created_at: self.created_at.clone(),
            messages: self.messages.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a message, deriving the title when it is the thread's first question.
    pub fn push(&mut self, message: Message) {
        if self.messages.is_empty() {
            if let Message::User { text } = &message {
                self.title = derive_title(text);
            }
        }
        self.messages.push(message);
    }

    /// Title derived from the thread's first user message, or the default title.
    pub fn derived_title(&self) -> String {
        match self.messages.first() {
            Some(Message::User { text }) => derive_title(text),
            _ => DEFAULT_THREAD_TITLE.to_string(),
        }
    }
}

impl Default for Thread {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted form of a thread; titles are stored in a separate blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecord {
    #[serde(default = "new_thread_id")]
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

fn new_thread_id() -> String {
    Uuid::new_v4().to_string()
}

/// Truncates a question to the display bound, adding an ellipsis when cut.
pub fn derive_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}{}", head, TITLE_ELLIPSIS)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_short_text_unchanged() {
        assert_eq!(derive_title("total sales"), "total sales");
        assert_eq!(derive_title(&"x".repeat(25)), "x".repeat(25));
    }

    #[test]
    fn test_derive_title_truncates_long_text() {
        let title = derive_title("show me a pie chart of sales by region");
        assert_eq!(title, "show me a pie chart of sa...");
    }

    #[test]
    fn test_derive_title_counts_chars_not_bytes() {
        let text = "é".repeat(30);
        let title = derive_title(&text);
        assert_eq!(title, format!("{}...", "é".repeat(25)));
    }

    #[test]
    fn test_title_frozen_by_first_user_message() {
        let mut thread = Thread::new();
        assert_eq!(thread.title, DEFAULT_THREAD_TITLE);

        thread.push(Message::user("first question"));
        thread.push(Message::error("boom"));
        thread.push(Message::user("second question"));

        assert_eq!(thread.title, "first question");
        assert_eq!(thread.derived_title(), "first question");
    }

    #[test]
    fn test_first_non_user_message_does_not_set_title() {
        let mut thread = Thread::new();
        thread.push(Message::error("boom"));
        thread.push(Message::user("late question"));
        assert_eq!(thread.title, DEFAULT_THREAD_TITLE);
    }

    #[test]
    fn test_record_without_id_gets_fresh_id() {
        let record: ThreadRecord = serde_json::from_str(r#"{"messages": []}"#).unwrap();
        assert!(Uuid::parse_str(&record.id).is_ok());
    }
}
