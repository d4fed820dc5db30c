//! Chat session and message types for Iaped.
//!
//! A `ChatSession` is one conversation thread owned by a single caller.
//! Messages are append-only: sessions and messages are never edited in
//! place, only extended with new messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Speaker role of a message within a session.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('system', 'user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A chat session between a caller and the assistant.
///
/// `owner` is the authenticated caller identifier and is immutable after
/// creation. It is never serialized to the wire (the HTTP surface is already
/// scoped to the caller).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a fresh session for `owner` with a time-sortable v7 id.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            owner: owner.into(),
            created_at: Utc::now(),
        }
    }
}

/// A single message within a chat session.
///
/// Messages are ordered by `timestamp` within a session; ties are broken
/// by insertion order in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new message for a session, stamped with the current time.
    pub fn new(session_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Wire shape of a message: `{id, role, content, timestamp}`.
///
/// The owning session id is implicit from the enclosing [`SessionView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ChatMessage> for MessageView {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            role: m.role,
            content: m.content,
            timestamp: m.timestamp,
        }
    }
}

/// Wire shape of a session with its full message history:
/// `{id, created_at, messages: [...]}`, messages ascending by timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageView>,
}

impl SessionView {
    /// Assemble the wire view from a session and its ordered messages.
    pub fn new(session: &ChatSession, messages: Vec<ChatMessage>) -> Self {
        Self {
            id: session.id,
            created_at: session.created_at,
            messages: messages.into_iter().map(MessageView::from).collect(),
        }
    }
}

/// Read-only projection of a session for history listings:
/// `{id, created_at, first_msg, last_msg}`.
///
/// Previews are the full content of the first and last messages, or empty
/// strings for a session with no messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub first_msg: String,
    pub last_msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_invalid_role_rejected() {
        assert!("moderator".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_session_view_hides_owner() {
        let session = ChatSession::new("caregiver-1");
        let msg = ChatMessage::new(session.id, MessageRole::Assistant, "Olá!");
        let view = SessionView::new(&session, vec![msg]);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("owner").is_none());
        assert_eq!(json["messages"][0]["role"], "assistant");
        assert!(json["messages"][0].get("session_id").is_none());
    }

    #[test]
    fn test_summary_serde_field_names() {
        let summary = SessionSummary {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            first_msg: "olá".to_string(),
            last_msg: "até logo".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["first_msg"], "olá");
        assert_eq!(json["last_msg"], "até logo");
        assert!(json.get("created_at").is_some());
    }
}
