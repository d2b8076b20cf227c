/// Error handling for the API server
///
/// Provides a unified error type that maps to HTTP responses. All handlers
/// return `Result<T, ApiError>` which converts to the appropriate status
/// code automatically.
///
/// Every response body, success or failure, uses the same envelope:
///
/// ```json
/// { "message": "...", "error": false, "data": { } }
/// ```
///
/// Failures carry `error: true` and `data: null`. Internal errors are
/// logged with their detail and surfaced to clients as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use taskhub_shared::auth::{
    authorization::OwnershipError, jwt::JwtError, password::PasswordError,
    validation::ValidationError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed input, failed validation
    BadRequest(String),

    /// Unauthorized (401) - missing/invalid credentials or token
    Unauthorized(String),

    /// Forbidden (403) - valid session, wrong resource owner
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate email or token
    Conflict(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Human-readable outcome message
    pub message: String,

    /// True when the request failed
    pub error: bool,

    /// Payload (null on failure and for empty successes)
    pub data: Value,
}

impl ApiResponse {
    /// Builds a success envelope
    pub fn ok(message: impl Into<String>, data: Value) -> Json<Self> {
        Json(Self {
            message: message.into(),
            error: false,
            data,
        })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalError(msg) => {
                // Log the detail but never leak it to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ApiResponse {
            message,
            error: true,
            data: Value::Null,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations are classified by constraint name so a
/// duplicate email and a duplicate token surface as distinct conflicts.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    if constraint.contains("token") {
                        return ApiError::Conflict("Token already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert token errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
            // Issuance failures are server-side problems
            JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            JwtError::MissingSecret => {
                ApiError::InternalError("Signing secret is not set".to_string())
            }
        }
    }
}

/// Convert password hashing errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert profile validation errors to API errors
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Convert ownership check failures to API errors
impl From<OwnershipError> for ApiError {
    fn from(err: OwnershipError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

/// Convert request DTO validation failures to API errors (first message)
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .iter()
            .flat_map(|(_, errors)| errors.iter())
            .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Request validation failed".to_string());

        ApiError::BadRequest(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                ApiError::InternalError("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_jwt_error_mapping() {
        assert!(matches!(
            ApiError::from(JwtError::Expired),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(JwtError::CreateError("boom".into())),
            ApiError::InternalError(_)
        ));
    }

    #[test]
    fn test_envelope_shape() {
        let Json(body) = ApiResponse::ok("done", serde_json::json!({"id": 1}));
        assert_eq!(body.message, "done");
        assert!(!body.error);
        assert_eq!(body.data["id"], 1);
    }
}
