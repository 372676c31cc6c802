use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum NotificationPreference {
    #[default]
    Push,
    Email,
    Sms,
}

impl fmt::Display for NotificationPreference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use NotificationPreference::*;
        f.write_str(match self {
            Push => "push",
            Email => "email",
            Sms => "sms",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub online: bool,
    pub notification_preference: NotificationPreference,
}

/// A stored direct message as it travels over the wire.
///
/// Everything except `read` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub read: bool,
}

#[derive(sqlx::FromRow)]
pub(crate) struct MessageRow {
    pub(crate) id: String,
    pub(crate) sender: String,
    pub(crate) recipient: String,
    pub(crate) content: String,
    pub(crate) timestamp: i64,
    pub(crate) is_read: bool,
}

impl TryFrom<MessageRow> for MessageRecord {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> StoreResult<Self> {
        Ok(MessageRecord {
            id: Uuid::parse_str(&row.id)?,
            sender: row.sender,
            recipient: row.recipient,
            content: row.content,
            timestamp: OffsetDateTime::from_unix_timestamp_nanos(row.timestamp.into())?,
            read: row.is_read,
        })
    }
}

pub(crate) fn to_store_nanos(timestamp: OffsetDateTime) -> StoreResult<i64> {
    i64::try_from(timestamp.unix_timestamp_nanos()).map_err(|_| StoreError::TimestampOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_record_wire_shape() {
        let record = MessageRecord {
            id: Uuid::nil(),
            sender: "alice".to_owned(),
            recipient: "bob".to_owned(),
            content: "hi".to_owned(),
            timestamp: OffsetDateTime::UNIX_EPOCH,
            read: false,
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "sender": "alice",
                "recipient": "bob",
                "content": "hi",
                "timestamp": "1970-01-01T00:00:00Z",
                "read": false,
            })
        );
    }

    #[test]
    fn user_uses_camel_case_preference() {
        let user = User {
            username: "carol".to_owned(),
            online: true,
            notification_preference: NotificationPreference::Sms,
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({ "username": "carol", "online": true, "notificationPreference": "sms" })
        );
        assert_eq!(NotificationPreference::default().to_string(), "push");
    }

    #[test]
    fn timestamps_survive_the_store_encoding() {
        let now = OffsetDateTime::now_utc();
        let row = MessageRow {
            id: Uuid::now_v7().to_string(),
            sender: "a".to_owned(),
            recipient: "b".to_owned(),
            content: "c".to_owned(),
            timestamp: to_store_nanos(now).unwrap(),
            is_read: true,
        };
        let record = MessageRecord::try_from(row).unwrap();
        assert_eq!(record.timestamp, now);
        assert!(record.read);
    }
}
