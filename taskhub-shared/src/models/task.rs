/// Task model and database operations
///
/// Tasks belong to exactly one user. Listing supports creation-time
/// ordering, an exact-match filter on the `completed` flag, and
/// limit/offset pagination; the matching row count is exposed separately so
/// the API can report a total page count.
///
/// The `completed` column is a string flag ("true"/"false") rather than a
/// boolean; the filter does an exact string match on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

/// Sort direction for task listing (by creation time)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a query-string value; anything other than "desc" is ascending
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub completed: String,
}

/// Input for updating a task; None fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<String>,
}

impl Task {
    /// Creates a task for a user
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, completed, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.completed)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        info!(task_id = task.id, user_id = user_id, "Task created");
        Ok(task)
    }

    /// Finds a task by id (ownership is checked by the caller, so a missing
    /// task and someone else's task produce different failures)
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, completed, user_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a user's tasks with optional completed filter, sort order, and
    /// limit/offset pagination
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        sort: SortOrder,
        completed: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        // Sort direction comes from an enum, never from raw request input
        let query = format!(
            r#"
            SELECT id, title, description, completed, user_id, created_at, updated_at
            FROM tasks
            WHERE user_id = $1 AND ($2::text IS NULL OR completed = $2)
            ORDER BY created_at {}
            LIMIT $3 OFFSET $4
            "#,
            sort.as_sql()
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(completed)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Counts a user's tasks under the same filter as [`Self::list_for_user`]
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: i64,
        completed: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE user_id = $1 AND ($2::text IS NULL OR completed = $2)
            "#,
        )
        .bind(user_id)
        .bind(completed)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Updates a task's fields; None values keep the stored ones
    ///
    /// # Returns
    ///
    /// The updated task, or None if it no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                completed = COALESCE($4, completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, completed, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.completed)
        .fetch_optional(pool)
        .await?;

        if task.is_some() {
            info!(task_id = id, "Task updated");
        }

        Ok(task)
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(task_id = id, "Task deleted");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_from_query() {
        assert_eq!(SortOrder::from_query(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_query(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_query(Some("bogus")), SortOrder::Asc);
        assert_eq!(SortOrder::from_query(None), SortOrder::Asc);
    }
}
