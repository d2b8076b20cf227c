/// Credential model
///
/// One row per user, holding the Argon2id password digest and mirroring
/// the user's email for sign-in lookup. Created atomically with the user at
/// sign-up; the digest is replaced on password change.
///
/// This type does not implement `Serialize`; digests never leave the
/// process.

use sqlx::{PgExecutor, PgPool};
use tracing::info;

/// Credential record (email + password digest, one-to-one with a user)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credential {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub user_id: i64,
}

impl Credential {
    /// Creates a credential row for a user
    ///
    /// Runs on any executor so sign-up can keep it inside the same
    /// transaction as the user insert.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        email: &str,
        password_hash: &str,
        user_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            INSERT INTO credentials (email, password_hash, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, user_id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        info!(user_id = user_id, "Credential created");
        Ok(credential)
    }

    /// Finds a credential by email (sign-in lookup)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, email, password_hash, user_id
            FROM credentials
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    /// Finds a credential by owning user id (password change lookup)
    pub async fn find_by_user_id(pool: &PgPool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, email, password_hash, user_id
            FROM credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    /// Replaces the stored password digest
    ///
    /// # Returns
    ///
    /// True if a row was updated, false if the user has no credential.
    pub async fn update_password_hash(
        pool: &PgPool,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE credentials
            SET password_hash = $2
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!(user_id = user_id, "Password digest updated");
        }

        Ok(updated)
    }
}
