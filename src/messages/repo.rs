use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    db::{require, StoreResult},
    models::{to_store_nanos, MessageRecord, MessageRow},
};

const MESSAGE_COLUMNS: &str = "id,sender,recipient,content,timestamp,is_read";

#[derive(Clone)]
pub struct MessageRepository {
    db_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Every message exchanged between `a` and `b`, oldest first.
    ///
    /// The pair is unordered. There is no limit on the result size.
    pub async fn find_conversation(&self, a: &str, b: &str) -> StoreResult<Vec<MessageRecord>> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE (sender=? AND recipient=?) OR (sender=? AND recipient=?)
             ORDER BY timestamp ASC, rowid ASC"
        ))
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_all(&self.db_pool)
        .await?;

        rows.into_iter().map(MessageRecord::try_from).collect()
    }

    pub async fn create(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> StoreResult<MessageRecord> {
        require("sender", sender)?;
        require("recipient", recipient)?;
        require("content", content)?;

        let record = MessageRecord {
            id: Uuid::now_v7(),
            sender: sender.to_owned(),
            recipient: recipient.to_owned(),
            content: content.to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            read: false,
        };

        sqlx::query(
            "INSERT INTO messages (id,sender,recipient,content,timestamp,is_read) values (?,?,?,?,?,0)",
        )
        .bind(record.id.to_string())
        .bind(&record.sender)
        .bind(&record.recipient)
        .bind(&record.content)
        .bind(to_store_nanos(record.timestamp)?)
        .execute(&self.db_pool)
        .await?;

        Ok(record)
    }

    /// Flags a message as read. `None` when no message has that id,
    /// which includes ids that are not UUIDs at all.
    pub async fn mark_read(&self, message_id: &str) -> StoreResult<Option<MessageRecord>> {
        let Ok(id) = Uuid::parse_str(message_id) else {
            return Ok(None);
        };

        let row: Option<MessageRow> = sqlx::query_as(&format!(
            "UPDATE messages SET is_read=1 WHERE id=? RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.db_pool)
        .await?;

        row.map(MessageRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_in_memory, StoreError};

    async fn repo() -> MessageRepository {
        MessageRepository::new(connect_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn create_assigns_server_fields() {
        let repo = repo().await;
        let before = OffsetDateTime::now_utc();

        let record = repo.create("alice", "bob", "hi").await.unwrap();

        assert_eq!(record.sender, "alice");
        assert_eq!(record.recipient, "bob");
        assert_eq!(record.content, "hi");
        assert!(!record.read);
        assert!(record.timestamp >= before);
    }

    #[tokio::test]
    async fn create_requires_content() {
        let repo = repo().await;

        let err = repo.create("alice", "bob", "").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(repo.find_conversation("alice", "bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn conversation_is_symmetric_and_ordered() {
        let repo = repo().await;
        let first = repo.create("alice", "bob", "one").await.unwrap();
        let second = repo.create("bob", "alice", "two").await.unwrap();
        let third = repo.create("alice", "bob", "three").await.unwrap();
        repo.create("alice", "carol", "elsewhere").await.unwrap();
        repo.create("carol", "bob", "elsewhere").await.unwrap();

        let ab = repo.find_conversation("alice", "bob").await.unwrap();
        let ba = repo.find_conversation("bob", "alice").await.unwrap();

        assert_eq!(ab, vec![first, second, third]);
        assert_eq!(ab, ba);
    }

    #[tokio::test]
    async fn conversation_with_self_only_matches_self() {
        let repo = repo().await;
        let note = repo.create("alice", "alice", "note to self").await.unwrap();
        repo.create("alice", "bob", "hi").await.unwrap();

        assert_eq!(repo.find_conversation("alice", "alice").await.unwrap(), vec![note]);
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let repo = repo().await;
        let record = repo.create("alice", "bob", "hi").await.unwrap();

        let once = repo.mark_read(&record.id.to_string()).await.unwrap().unwrap();
        let twice = repo.mark_read(&record.id.to_string()).await.unwrap().unwrap();

        assert!(once.read);
        assert_eq!(once, twice);
        assert_eq!(once.content, record.content);
        assert_eq!(once.timestamp, record.timestamp);
    }

    #[tokio::test]
    async fn mark_read_unknown_ids() {
        let repo = repo().await;

        assert!(repo.mark_read(&Uuid::now_v7().to_string()).await.unwrap().is_none());
        assert!(repo.mark_read("not-a-message-id").await.unwrap().is_none());
    }
}
