/// Profile endpoints
///
/// # Endpoints
///
/// - `GET /user` - Fetch the authenticated user's profile
/// - `PUT /user` - Update name and mobile number
///
/// The profile response embeds the avatar fetch path for the user, whether
/// or not an avatar has been uploaded yet.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use taskhub_shared::{
    auth::{
        middleware::Principal,
        validation::{validate_mobile, validate_name},
    },
    models::user::{UpdateProfile, User},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResponse, ApiResult},
};

/// Profile update request (email and gender are immutable here)
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub mobile_no: String,
}

/// Fetch the authenticated user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let user = User::find_by_id(&state.db, principal.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let profile = json!({
        "id": user.id,
        "name": user.name,
        "mobile_no": user.mobile_no,
        "gender": user.gender,
        "email": user.email,
        "avatar": format!("/user/avatar/{}", user.id),
    });

    Ok((
        StatusCode::OK,
        ApiResponse::ok("User fetched successfully", profile),
    ))
}

/// Update the authenticated user's name and mobile number
///
/// # Errors
///
/// - `400 Bad Request`: name or mobile number failed validation
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    validate_name(&req.name)?;
    validate_mobile(&req.mobile_no)?;

    User::update_profile(
        &state.db,
        principal.user_id,
        UpdateProfile {
            name: req.name,
            mobile_no: req.mobile_no,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = principal.user_id, "User details updated");
    Ok((
        StatusCode::OK,
        ApiResponse::ok("User details updated successfully", serde_json::Value::Null),
    ))
}
