/// Task endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task
/// - `GET /tasks` - List tasks with sort/filter/pagination
/// - `GET /tasks/:id` - Fetch one task
/// - `PUT /tasks/:id` - Update a task
/// - `DELETE /tasks/:id` - Delete a task
///
/// Every per-task operation fetches the row first and then checks
/// ownership, so a missing task answers 404 while someone else's task
/// answers 403: existence and authorization stay distinguishable.
///
/// Listing treats malformed `page`/`limit` values as "use the default"
/// rather than erroring.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use validator::Validate;

use taskhub_shared::{
    auth::{authorization::assert_owner, middleware::Principal},
    models::task::{CreateTask, SortOrder, Task, UpdateTask},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResponse, ApiResult},
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 5;

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Completion flag, "true" or "false" (default "false")
    pub completed: Option<String>,
}

/// Task update request; omitted fields keep their stored values
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<String>,
}

/// Task listing query parameters
///
/// Captured as raw strings so malformed numbers can fall back to defaults
/// instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// "asc" (default) or "desc", by creation time
    pub sort: Option<String>,

    /// Exact-match filter on the completed flag
    pub completed: Option<String>,

    /// Page number, ≥1 (default 1)
    pub page: Option<String>,

    /// Page size, ≥1 (default 5)
    pub limit: Option<String>,
}

/// Parses a positive integer query value, falling back to a default on
/// anything malformed or below 1
fn parse_positive_or(raw: Option<&str>, default: i64) -> i64 {
    match raw {
        None => default,
        Some(raw) => match raw.parse::<i64>() {
            Ok(value) if value >= 1 => value,
            _ => {
                warn!(value = raw, default = default, "Invalid pagination parameter, using default");
                default
            }
        },
    }
}

fn validate_completed_flag(completed: Option<&str>) -> Result<(), ApiError> {
    match completed {
        None | Some("true") | Some("false") => Ok(()),
        Some(_) => Err(ApiError::BadRequest(
            "Completed must be 'true' or 'false'".to_string(),
        )),
    }
}

/// Create a task for the authenticated user
///
/// # Errors
///
/// - `400 Bad Request`: empty title or malformed completed flag
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    req.validate()?;
    validate_completed_flag(req.completed.as_deref())?;

    let task = Task::create(
        &state.db,
        principal.user_id,
        CreateTask {
            title: req.title,
            description: req.description.unwrap_or_default(),
            completed: req.completed.unwrap_or_else(|| "false".to_string()),
        },
    )
    .await?;

    info!(task_id = task.id, user_id = principal.user_id, "Task created");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Task created successfully", json!({ "taskId": task.id })),
    ))
}

/// Fetch one task
///
/// # Errors
///
/// - `404 Not Found`: no such task
/// - `403 Forbidden`: task belongs to another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    assert_owner(task.user_id, principal.user_id)?;

    Ok((
        StatusCode::OK,
        ApiResponse::ok("Task fetched successfully", json!(task)),
    ))
}

/// List the authenticated user's tasks
///
/// Supports `sort` (asc/desc by creation time), `completed` (exact-match
/// filter), and `page`/`limit` pagination with silent fallback to 1/5.
/// The response reports `totalPages = ceil(totalMatching / limit)`.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let sort = SortOrder::from_query(query.sort.as_deref());
    let completed = query.completed.as_deref();

    let page = parse_positive_or(query.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive_or(query.limit.as_deref(), DEFAULT_LIMIT);
    let offset = (page - 1) * limit;

    let tasks = Task::list_for_user(&state.db, principal.user_id, sort, completed, limit, offset)
        .await?;
    let total = Task::count_for_user(&state.db, principal.user_id, completed).await?;

    let total_pages = (total + limit - 1) / limit;

    Ok((
        StatusCode::OK,
        ApiResponse::ok(
            "Tasks fetched successfully",
            json!({
                "tasks": tasks,
                "totalPages": total_pages,
                "currentPage": page,
            }),
        ),
    ))
}

/// Update a task's title, description, and/or completed flag
///
/// # Errors
///
/// - `400 Bad Request`: empty title or malformed completed flag
/// - `404 Not Found`: no such task
/// - `403 Forbidden`: task belongs to another user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    if let Some(title) = &req.title {
        if title.is_empty() {
            return Err(ApiError::BadRequest("Title must not be empty".to_string()));
        }
    }
    validate_completed_flag(req.completed.as_deref())?;

    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    assert_owner(task.user_id, principal.user_id)?;

    Task::update(
        &state.db,
        task_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            completed: req.completed,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    info!(task_id = task_id, user_id = principal.user_id, "Task updated");
    Ok((
        StatusCode::OK,
        ApiResponse::ok("Task updated successfully", Value::Null),
    ))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: no such task
/// - `403 Forbidden`: task belongs to another user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    assert_owner(task.user_id, principal.user_id)?;

    Task::delete(&state.db, task_id).await?;

    info!(task_id = task_id, user_id = principal.user_id, "Task deleted");
    Ok((
        StatusCode::OK,
        ApiResponse::ok("Task deleted successfully", Value::Null),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_silent_fallback() {
        assert_eq!(parse_positive_or(None, 1), 1);
        assert_eq!(parse_positive_or(Some("3"), 1), 3);

        // Malformed or out-of-range values fall back instead of erroring
        assert_eq!(parse_positive_or(Some("0"), 1), 1);
        assert_eq!(parse_positive_or(Some("-2"), 1), 1);
        assert_eq!(parse_positive_or(Some("abc"), 5), 5);
        assert_eq!(parse_positive_or(Some(""), 5), 5);
        assert_eq!(parse_positive_or(Some("2.5"), 5), 5);
    }

    #[test]
    fn test_completed_flag_validation() {
        assert!(validate_completed_flag(None).is_ok());
        assert!(validate_completed_flag(Some("true")).is_ok());
        assert!(validate_completed_flag(Some("false")).is_ok());
        assert!(validate_completed_flag(Some("yes")).is_err());
        assert!(validate_completed_flag(Some("")).is_err());
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let total_pages = |total: i64, limit: i64| (total + limit - 1) / limit;

        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }
}
