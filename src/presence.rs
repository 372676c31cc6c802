use sqlx::SqlitePool;

use crate::{
    db::{require, StoreResult},
    models::{NotificationPreference, User},
};

const USER_COLUMNS: &str = "username,online,notification_preference";

/// Online flags and per-user settings, keyed by username.
#[derive(Clone)]
pub struct PresenceRegistry {
    db_pool: SqlitePool,
}

impl PresenceRegistry {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Marks `username` online, creating the user if this is the first sighting.
    pub async fn set_online(&self, username: &str) -> StoreResult<User> {
        require("username", username)?;

        let user = sqlx::query_as(&format!(
            "INSERT INTO users (username,online) VALUES (?,1)
             ON CONFLICT(username) DO UPDATE SET online=1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(user)
    }

    /// Marks an existing user offline. Never creates one; returns whether
    /// anybody matched.
    pub async fn set_offline(&self, username: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET online=0 WHERE username=?")
            .bind(username)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username=?"))
            .bind(username)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(user)
    }

    pub async fn set_preference(
        &self,
        username: &str,
        preference: NotificationPreference,
    ) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET notification_preference=? WHERE username=?")
            .bind(preference)
            .bind(username)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
