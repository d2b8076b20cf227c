/// Session store
///
/// One row per logged-in device: the issued access/refresh token pair, the
/// owning user, and the issue time. Both token columns carry unique
/// constraints, so an insert colliding with an existing token fails
/// distinctly (the API layer maps it from the constraint name).
///
/// Deletion contract: deleting zero rows is success. Sign-out of an
/// already-deleted session, scrubbing an absent refresh token, and the
/// second half of a concurrent refresh race are all no-ops.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::session::Session;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let session = Session::create(&pool, 42, "access...", "refresh...").await?;
///
/// // Revoke every other device after a password change
/// let revoked = Session::delete_all_for_user_except(&pool, 42, &session.access_token).await?;
/// println!("Signed out {} other devices", revoked);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::info;

/// A persisted access/refresh token pair bound to a user
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: i64,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// Persists a freshly issued token pair
    ///
    /// Accepts any executor so sign-up can run it inside its transaction.
    ///
    /// # Errors
    ///
    /// A colliding token violates `sessions_access_token_key` or
    /// `sessions_refresh_token_key`.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        user_id: i64,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (access_token, refresh_token, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, access_token, refresh_token, user_id, issued_at
            "#,
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        info!(user_id = user_id, session_id = session.id, "Session created");
        Ok(session)
    }

    /// Looks up a session by its access token
    pub async fn find_by_access_token(
        pool: &PgPool,
        access_token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, access_token, refresh_token, user_id, issued_at
            FROM sessions
            WHERE access_token = $1
            "#,
        )
        .bind(access_token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Looks up a session by its refresh token
    pub async fn find_by_refresh_token(
        pool: &PgPool,
        refresh_token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, access_token, refresh_token, user_id, issued_at
            FROM sessions
            WHERE refresh_token = $1
            "#,
        )
        .bind(refresh_token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Deletes the session holding this access token (single-device sign-out)
    ///
    /// # Returns
    ///
    /// Number of rows deleted; zero is success.
    pub async fn delete_by_access_token(
        pool: &PgPool,
        access_token: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE access_token = $1")
            .bind(access_token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes the session holding this refresh token (rotation / scrub)
    pub async fn delete_by_refresh_token(
        pool: &PgPool,
        refresh_token: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE refresh_token = $1")
            .bind(refresh_token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes every session for a user (sign-out from all devices)
    pub async fn delete_all_for_user(pool: &PgPool, user_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        info!(
            user_id = user_id,
            sessions = result.rows_affected(),
            "All sessions deleted for user"
        );
        Ok(result.rows_affected())
    }

    /// Deletes every session for a user except the one holding the given
    /// access token (password change: the caller's device stays signed in)
    pub async fn delete_all_for_user_except(
        pool: &PgPool,
        user_id: i64,
        access_token: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM sessions WHERE user_id = $1 AND access_token != $2",
        )
        .bind(user_id)
        .bind(access_token)
        .execute(pool)
        .await?;

        info!(
            user_id = user_id,
            sessions = result.rows_affected(),
            "Other sessions deleted for user"
        );
        Ok(result.rows_affected())
    }
}
