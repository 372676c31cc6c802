use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A required field was missing or empty.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("stored id is invalid: {0}")]
    Id(#[from] uuid::Error),

    #[error("stored timestamp is invalid: {0}")]
    Timestamp(#[from] time::error::ComponentRange),

    #[error("timestamp does not fit the store")]
    TimestampOutOfRange,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn require(field: &str, value: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<SqlitePool> {
    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    init_schema(&db_pool).await?;
    Ok(db_pool)
}

/// Single-connection pool over a private in-memory database.
pub async fn connect_in_memory() -> StoreResult<SqlitePool> {
    // every sqlite memory connection is its own database, so keep exactly one alive
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    init_schema(&db_pool).await?;
    Ok(db_pool)
}

pub async fn init_schema(db_pool: &SqlitePool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY NOT NULL,
            online INTEGER NOT NULL DEFAULT 0,
            notification_preference TEXT NOT NULL DEFAULT 'push'
        )
        "#,
    )
    .execute(db_pool)
    .await?;

    // timestamp is unix nanoseconds so ordering is numeric
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id TEXT PRIMARY KEY NOT NULL,
            sender TEXT NOT NULL,
            recipient TEXT NOT NULL,
            content TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            is_read INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(db_pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS messages_pair ON messages (sender, recipient, timestamp)",
    )
    .execute(db_pool)
    .await?;

    tracing::debug!("schema ready");
    Ok(())
}
