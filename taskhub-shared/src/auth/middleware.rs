/// Request authentication middleware for Axum
///
/// Authenticates requests in two steps:
///
/// 1. The `Authorization: Bearer <token>` header is validated against the
///    access secret (signature + expiry).
/// 2. The token is looked up in the sessions table. A token whose session
///    row is gone is rejected as revoked, even if the signature is still
///    valid. This is what makes server-side sign-out work with otherwise
///    stateless signed tokens.
///
/// On success a [`Principal`] carrying the user id and the raw token string
/// is added to the request extensions, so downstream handlers get a typed
/// identity instead of fishing values out of ambient context.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskhub_shared::auth::middleware::Principal;
///
/// async fn handler(Extension(principal): Extension<Principal>) -> String {
///     format!("Hello, user {}!", principal.user_id)
/// }
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError, JwtKeys};
use crate::models::session::Session;

/// Authenticated request principal
///
/// The raw access token is kept alongside the user id because sign-out and
/// password-change need to address the caller's own session row.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Authenticated user id
    pub user_id: i64,

    /// The access token the request presented
    pub access_token: String,
}

/// Error type for authentication
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header on the request
    MissingToken,

    /// Header present but not a well-formed Bearer token
    MalformedToken(String),

    /// Signature invalid, token expired, or claims unreadable
    InvalidToken(String),

    /// Signature-valid token whose session has been deleted
    Revoked,

    /// Session store lookup failed
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Not authorized".to_string()),
            AuthError::MalformedToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::Revoked => (
                StatusCode::UNAUTHORIZED,
                "Session expired, user has to log in".to_string(),
            ),
            AuthError::DatabaseError(msg) => {
                tracing::error!("Session lookup failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "message": message,
            "error": true,
            "data": null,
        }));

        (status, body).into_response()
    }
}

/// Authenticates a request against the access secret and the session store
///
/// # Errors
///
/// Returns 401-mapped errors for a missing/malformed header, an invalid or
/// expired token, and a revoked session; storage failures map to 500.
pub async fn session_auth_middleware(
    pool: PgPool,
    keys: Arc<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::MalformedToken("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, keys.access_secret()).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    // Signature alone is not enough: the session row must still exist
    let session = Session::find_by_access_token(&pool, token)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    if session.is_none() {
        tracing::warn!(user_id = claims.sub, "Valid token presented for a revoked session");
        return Err(AuthError::Revoked);
    }

    let principal = Principal {
        user_id: claims.sub,
        access_token: token.to_string(),
    };
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::MalformedToken("Expected Bearer token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::Revoked.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_principal_is_cloneable() {
        let principal = Principal {
            user_id: 1,
            access_token: "token".to_string(),
        };

        let cloned = principal.clone();
        assert_eq!(cloned.user_id, 1);
        assert_eq!(cloned.access_token, "token");
    }
}
