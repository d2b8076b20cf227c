/// Avatar model
///
/// At most one avatar row per user (`avatars_user_id_key`); uploads after
/// the first overwrite the stored image in place rather than inserting a
/// second row.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

/// Stored avatar image for a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Avatar {
    pub id: i64,
    pub user_id: i64,
    pub content: Vec<u8>,
    pub file_name: String,
    pub updated_at: DateTime<Utc>,
}

impl Avatar {
    /// Inserts or replaces a user's avatar (upsert on the unique user id)
    pub async fn upsert(
        pool: &PgPool,
        user_id: i64,
        content: &[u8],
        file_name: &str,
    ) -> Result<Self, sqlx::Error> {
        let avatar = sqlx::query_as::<_, Avatar>(
            r#"
            INSERT INTO avatars (user_id, content, file_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET content = EXCLUDED.content,
                file_name = EXCLUDED.file_name,
                updated_at = NOW()
            RETURNING id, user_id, content, file_name, updated_at
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(file_name)
        .fetch_one(pool)
        .await?;

        info!(user_id = user_id, bytes = content.len(), "Avatar stored");
        Ok(avatar)
    }

    /// Fetches a user's avatar
    pub async fn find_by_user_id(pool: &PgPool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let avatar = sqlx::query_as::<_, Avatar>(
            r#"
            SELECT id, user_id, content, file_name, updated_at
            FROM avatars
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(avatar)
    }

    /// Deletes a user's avatar
    ///
    /// # Returns
    ///
    /// Number of rows deleted; zero is success.
    pub async fn delete_by_user_id(pool: &PgPool, user_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM avatars WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(user_id = user_id, "Avatar deleted");
        }

        Ok(result.rows_affected())
    }
}
