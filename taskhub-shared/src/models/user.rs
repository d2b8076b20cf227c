/// User model and database operations
///
/// A user row is the public profile: name, mobile number, normalized
/// gender, and unique email. The password digest lives in the
/// `credentials` table (see [`crate::models::credential`]) so profile reads
/// never carry secrets.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     mobile_no TEXT NOT NULL,
///     gender TEXT NOT NULL,
///     email TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: "Ada Lovelace".to_string(),
///         mobile_no: "9876543210".to_string(),
///         gender: "female".to_string(),
///         email: "ada@example.com".to_string(),
///     },
/// )
/// .await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use tracing::info;

/// User profile model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (server-assigned, immutable)
    pub id: i64,

    /// Display name
    pub name: String,

    /// Mobile number (validated 10-digit numeric string)
    pub mobile_no: String,

    /// Gender, stored lower-cased (one of male/female/other)
    pub gender: String,

    /// Email address, unique across all users
    pub email: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Fields are expected to be validated (and gender normalized) before this
/// reaches the database.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub mobile_no: String,
    pub gender: String,
    pub email: String,
}

/// Input for a profile update (name and mobile number only; email and
/// gender are immutable through this path)
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub name: String,
    pub mobile_no: String,
}

impl User {
    /// Creates a new user
    ///
    /// Accepts any executor so sign-up can run this inside the same
    /// transaction as the credential and session writes.
    ///
    /// # Errors
    ///
    /// A duplicate email violates `users_email_key`; other failures are
    /// ordinary database errors.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, mobile_no, gender, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, mobile_no, gender, email, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.mobile_no)
        .bind(data.gender)
        .bind(data.email)
        .fetch_one(executor)
        .await?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, mobile_no, gender, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates a user's name and mobile number
    ///
    /// # Returns
    ///
    /// The updated user, or None if the user doesn't exist.
    pub async fn update_profile(
        pool: &PgPool,
        id: i64,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, mobile_no = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, mobile_no, gender, email, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.mobile_no)
        .fetch_optional(pool)
        .await?;

        if user.is_some() {
            info!(user_id = id, "User profile updated");
        }

        Ok(user)
    }
}
