/// Session lifecycle endpoints
///
/// # Endpoints
///
/// - `POST /user/signup` - Register a new user
/// - `POST /user/signin` - Login and get a token pair
/// - `POST /user/refresh` - Exchange a refresh token for a new pair
/// - `POST /user/signout?all=` - Sign out this device, or all of them
/// - `PUT /user/password` - Change password (revokes other devices)
///
/// Request DTOs carrying passwords implement `Debug` by hand with the
/// password field masked, so no log statement can leak one.

use std::fmt;

use axum::{
    extract::{Extension, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use taskhub_shared::{
    auth::{
        jwt::{issue_token_pair, verify_refresh_token},
        middleware::Principal,
        password::{hash_password, validate_password_strength, verify_password},
        validation::validate_profile,
    },
    models::{
        credential::Credential,
        session::Session,
        user::{CreateUser, User},
    },
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResponse, ApiResult},
};

/// Sign-up request
#[derive(Deserialize)]
pub struct SignUpRequest {
    /// Display name (≥2 chars, alphabetic and spaces)
    pub name: String,

    /// Mobile number (exactly 10 digits)
    pub mobile_no: String,

    /// Gender (male/female/other, case-insensitive)
    pub gender: String,

    /// Email address (unique)
    pub email: String,

    /// Password (≥8 chars with upper, lower, digit, special)
    pub password: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("name", &self.name)
            .field("mobile_no", &self.mobile_no)
            .field("gender", &self.gender)
            .field("email", &self.email)
            .field("password", &"******")
            .finish()
    }
}

/// Sign-in request
#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"******")
            .finish()
    }
}

/// Password change request
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePasswordRequest")
            .field("old_password", &"******")
            .field("new_password", &"******")
            .finish()
    }
}

/// Sign-out query parameters
#[derive(Debug, Deserialize)]
pub struct SignOutQuery {
    /// "true" signs out every device; default is this device only
    pub all: Option<String>,
}

/// Register a new user
///
/// Validates the profile and password, then creates the user, its
/// credential, and its first session inside one transaction, so a failure
/// at any step leaves no partial account behind.
///
/// # Errors
///
/// - `400 Bad Request`: a profile field or the password failed validation
/// - `409 Conflict`: email already exists
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let gender = validate_profile(&req.name, &req.email, &req.mobile_no, &req.gender)?;
    validate_password_strength(&req.password).map_err(ApiError::BadRequest)?;

    let password_hash = hash_password(&req.password)?;

    // User, credential, and first session are all-or-nothing
    let mut tx = state.db.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            name: req.name.clone(),
            mobile_no: req.mobile_no.clone(),
            gender,
            email: req.email.clone(),
        },
    )
    .await?;

    Credential::create(&mut *tx, &req.email, &password_hash, user.id).await?;

    let pair = issue_token_pair(user.id, &state.jwt)?;
    Session::create(&mut *tx, user.id, &pair.access_token, &pair.refresh_token).await?;

    tx.commit().await?;

    info!(user_id = user.id, "User registered successfully");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "User registered successfully",
            json!({
                "user_token": pair.access_token,
                "refresh_token": pair.refresh_token,
            }),
        ),
    ))
}

/// Login with email and password
///
/// An unknown email and a wrong password produce the same response, so the
/// failure never reveals which one was wrong. Existing sessions are left
/// alone: each sign-in is a new device.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let credential = Credential::find_by_email(&state.db, &req.email).await?;

    let credential = match credential {
        Some(credential) => credential,
        None => {
            warn!("Sign-in failed: unknown email");
            return Err(ApiError::Unauthorized(
                "Incorrect username or password".to_string(),
            ));
        }
    };

    if !verify_password(&req.password, &credential.password_hash)? {
        warn!(user_id = credential.user_id, "Sign-in failed: password mismatch");
        return Err(ApiError::Unauthorized(
            "Incorrect username or password".to_string(),
        ));
    }

    let pair = issue_token_pair(credential.user_id, &state.jwt)?;
    Session::create(
        &state.db,
        credential.user_id,
        &pair.access_token,
        &pair.refresh_token,
    )
    .await?;

    info!(user_id = credential.user_id, "User signed in successfully");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(
            "User signed in successfully",
            json!({
                "user_token": pair.access_token,
                "refresh_token": pair.refresh_token,
            }),
        ),
    ))
}

/// Exchange a refresh token for a new token pair
///
/// The refresh token arrives in the `Refresh-Token` header. A token that is
/// absent from the store is rejected; a token that fails verification is
/// additionally scrubbed from the store. On success the new pair is saved
/// before the old pair's row is deleted, so a crash between the two steps
/// can never leave the user without a valid session. Rotation: the old
/// refresh token is single-use.
///
/// # Errors
///
/// - `401 Unauthorized`: missing, unknown, invalid, or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let refresh_token = headers
        .get("Refresh-Token")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token required".to_string()))?;

    let session = Session::find_by_refresh_token(&state.db, refresh_token).await?;
    if session.is_none() {
        warn!("Refresh failed: token not found in session store");
        return Err(ApiError::Unauthorized(
            "Invalid or expired refresh token".to_string(),
        ));
    }

    let user_id = match verify_refresh_token(refresh_token, &state.jwt) {
        Ok(user_id) => user_id,
        Err(e) => {
            // A presented-but-invalid refresh token is scrubbed from the store
            Session::delete_by_refresh_token(&state.db, refresh_token).await?;
            warn!("Refresh failed: {}", e);
            return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
        }
    };

    let pair = issue_token_pair(user_id, &state.jwt)?;
    Session::create(&state.db, user_id, &pair.access_token, &pair.refresh_token).await?;

    // Deleting zero rows here is the benign concurrent-refresh race
    Session::delete_by_refresh_token(&state.db, refresh_token).await?;

    info!(user_id = user_id, "Token refreshed successfully");
    Ok((
        StatusCode::OK,
        ApiResponse::ok(
            "Token refreshed successfully",
            json!({
                "user_token": pair.access_token,
                "refresh_token": pair.refresh_token,
            }),
        ),
    ))
}

/// Sign out this device, or every device with `?all=true`
///
/// Idempotent: signing out a session that is already gone succeeds.
///
/// # Errors
///
/// - `400 Bad Request`: `all` is neither "true" nor "false"
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<SignOutQuery>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let all = match query.all.as_deref() {
        None => false,
        Some(raw) => raw.parse::<bool>().map_err(|_| {
            ApiError::BadRequest(
                "Invalid query parameter for 'all', it must be true or false".to_string(),
            )
        })?,
    };

    if all {
        Session::delete_all_for_user(&state.db, principal.user_id).await?;

        info!(user_id = principal.user_id, "Signed out from all devices");
        Ok((
            StatusCode::OK,
            ApiResponse::ok("Signed out from all devices successfully", Value::Null),
        ))
    } else {
        Session::delete_by_access_token(&state.db, &principal.access_token).await?;

        info!(user_id = principal.user_id, "User signed out");
        Ok((
            StatusCode::OK,
            ApiResponse::ok("User signed out successfully", Value::Null),
        ))
    }
}

/// Change password
///
/// Verifies the old password, stores the new digest, and only then signs
/// out every other device; the caller's session survives. If storing the
/// digest fails, no session is revoked.
///
/// # Errors
///
/// - `400 Bad Request`: new password too weak
/// - `401 Unauthorized`: old password incorrect
pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    validate_password_strength(&req.new_password).map_err(ApiError::BadRequest)?;

    let credential = Credential::find_by_user_id(&state.db, principal.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !verify_password(&req.old_password, &credential.password_hash)? {
        warn!(user_id = principal.user_id, "Password change failed: old password mismatch");
        return Err(ApiError::Unauthorized("Incorrect old password".to_string()));
    }

    let new_hash = hash_password(&req.new_password)?;

    let updated =
        Credential::update_password_hash(&state.db, principal.user_id, &new_hash).await?;
    if !updated {
        return Err(ApiError::InternalError("Password update failed".to_string()));
    }

    // Revocation happens only after the digest is stored
    Session::delete_all_for_user_except(&state.db, principal.user_id, &principal.access_token)
        .await?;

    info!(user_id = principal.user_id, "Password updated successfully");
    Ok((
        StatusCode::OK,
        ApiResponse::ok("Password updated successfully", Value::Null),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_masked_in_debug_output() {
        let req = SignUpRequest {
            name: "Ada".to_string(),
            mobile_no: "9876543210".to_string(),
            gender: "female".to_string(),
            email: "ada@example.com".to_string(),
            password: "Abcd123!".to_string(),
        };

        let rendered = format!("{:?}", req);
        assert!(!rendered.contains("Abcd123!"));
        assert!(rendered.contains("******"));

        let req = ChangePasswordRequest {
            old_password: "OldPass1!".to_string(),
            new_password: "NewPass1!".to_string(),
        };

        let rendered = format!("{:?}", req);
        assert!(!rendered.contains("OldPass1!"));
        assert!(!rendered.contains("NewPass1!"));
    }
}
