use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One persisted chat message.
///
/// `timestamp` is milliseconds since the epoch, matching the upstream
/// datastore's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_message_round_trips() {
        let message = ChatMessage::new(Role::User, "hello there");
        let json = serde_json::to_string(&message).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, message.id);
        assert_eq!(parsed.role, Role::User);
        assert_eq!(parsed.content, "hello there");
        assert_eq!(parsed.timestamp, message.timestamp);
    }

    #[test]
    fn test_messages_get_unique_ids() {
        let a = ChatMessage::new(Role::Assistant, "one");
        let b = ChatMessage::new(Role::Assistant, "two");
        assert_ne!(a.id, b.id);
    }
}
