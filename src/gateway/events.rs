use serde::{Deserialize, Serialize};

use crate::models::MessageRecord;

/// Everything a client may ask the gateway to do.
///
/// Frames look like `{"event": "sendMessage", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    UserOnline(String),
    UserOffline(String),
    SendMessage(SendMessage),
    ReadMessage(String),
    Join(String),
    Leave(String),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserOnline(_) => "userOnline",
            Self::UserOffline(_) => "userOffline",
            Self::SendMessage(_) => "sendMessage",
            Self::ReadMessage(_) => "readMessage",
            Self::Join(_) => "join",
            Self::Leave(_) => "leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    pub sender: String,
    pub recipient: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    UserPresence(PresenceUpdate),
    ReceiveMessage(MessageRecord),
    MessageRead(MessageRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdate {
    pub username: String,
    pub online: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_client_frames() {
        let online: ClientEvent =
            serde_json::from_value(json!({ "event": "userOnline", "data": "alice" })).unwrap();
        assert_eq!(online, ClientEvent::UserOnline("alice".to_owned()));

        let send: ClientEvent = serde_json::from_value(json!({
            "event": "sendMessage",
            "data": { "sender": "alice", "recipient": "bob", "content": "hi" },
        }))
        .unwrap();
        assert_eq!(send.name(), "sendMessage");
    }

    #[test]
    fn rejects_unknown_or_misshapen_frames() {
        assert!(serde_json::from_value::<ClientEvent>(json!({ "event": "typing", "data": "x" })).is_err());
        assert!(serde_json::from_value::<ClientEvent>(json!({
            "event": "sendMessage",
            "data": { "sender": "alice", "content": "hi" },
        }))
        .is_err());
        assert!(serde_json::from_value::<ClientEvent>(json!({ "event": "readMessage", "data": 7 })).is_err());
    }

    #[test]
    fn presence_frame_shape() {
        let event = ServerEvent::UserPresence(PresenceUpdate {
            username: "carol".to_owned(),
            online: true,
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "userPresence", "data": { "username": "carol", "online": true } })
        );
    }
}
