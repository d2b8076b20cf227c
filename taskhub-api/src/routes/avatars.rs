/// Avatar endpoints
///
/// # Endpoints
///
/// - `POST /user/avatar` - Upload or replace the caller's avatar
/// - `GET /user/avatar/:id` - Fetch a user's avatar bytes (public)
/// - `DELETE /user/avatar` - Delete the caller's avatar
///
/// Uploads arrive as multipart form data in a field named `avatar`. Only
/// .jpg/.jpeg files up to 100 KB are accepted; a second upload overwrites
/// the stored image in place. Fetching is public by user id, since the
/// avatar path is embedded in profile responses.

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::info;

use taskhub_shared::{auth::middleware::Principal, models::avatar::Avatar};

use crate::{
    app::AppState,
    error::{ApiError, ApiResponse, ApiResult},
};

/// Maximum accepted avatar size
const MAX_AVATAR_BYTES: usize = 100 * 1024;

/// Validates an uploaded avatar and returns its normalized extension
fn validate_avatar(file_name: &str, size: usize) -> Result<String, ApiError> {
    if size > MAX_AVATAR_BYTES {
        return Err(ApiError::BadRequest(
            "File size is too large, max 100 KB is allowed".to_string(),
        ));
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    if extension != ".jpg" && extension != ".jpeg" {
        return Err(ApiError::BadRequest(
            "Invalid file type, only .jpg and .jpeg are allowed".to_string(),
        ));
    }

    Ok(extension)
}

/// Upload or replace the caller's avatar
///
/// # Errors
///
/// - `400 Bad Request`: no `avatar` field, file over 100 KB, or an
///   extension other than .jpg/.jpeg
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?
    {
        if field.name() == Some("avatar") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read uploaded file".to_string()))?;

            uploaded = Some((file_name, data.to_vec()));
            break;
        }
    }

    let (file_name, content) =
        uploaded.ok_or_else(|| ApiError::BadRequest("Invalid file".to_string()))?;

    let extension = validate_avatar(&file_name, content.len())?;
    let stored_name = format!("avatar_{}{}", principal.user_id, extension);

    Avatar::upsert(&state.db, principal.user_id, &content, &stored_name).await?;

    info!(user_id = principal.user_id, "Avatar uploaded");
    Ok((
        StatusCode::OK,
        ApiResponse::ok("Avatar uploaded successfully", Value::Null),
    ))
}

/// Fetch a user's avatar bytes by user id
///
/// Public: the profile response links here. Returns the raw image, not the
/// JSON envelope.
///
/// # Errors
///
/// - `404 Not Found`: the user has no avatar
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Response> {
    let avatar = Avatar::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Avatar not found".to_string()))?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], avatar.content).into_response())
}

/// Delete the caller's avatar
///
/// # Errors
///
/// - `404 Not Found`: no avatar to delete
pub async fn delete_avatar(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    Avatar::find_by_user_id(&state.db, principal.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No avatar present to delete".to_string()))?;

    Avatar::delete_by_user_id(&state.db, principal.user_id).await?;

    info!(user_id = principal.user_id, "Avatar deleted");
    Ok((
        StatusCode::OK,
        ApiResponse::ok("Avatar deleted successfully", Value::Null),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_size_limit() {
        assert!(validate_avatar("pic.jpg", MAX_AVATAR_BYTES).is_ok());
        assert!(validate_avatar("pic.jpg", MAX_AVATAR_BYTES + 1).is_err());
        assert!(validate_avatar("pic.jpg", 150 * 1024).is_err());
    }

    #[test]
    fn test_avatar_extension_rules() {
        assert_eq!(validate_avatar("pic.jpg", 1024).unwrap(), ".jpg");
        assert_eq!(validate_avatar("pic.jpeg", 1024).unwrap(), ".jpeg");
        assert_eq!(validate_avatar("PIC.JPG", 1024).unwrap(), ".jpg");

        assert!(validate_avatar("pic.png", 1024).is_err());
        assert!(validate_avatar("pic.gif", 1024).is_err());
        assert!(validate_avatar("no_extension", 1024).is_err());
        assert!(validate_avatar("", 1024).is_err());
    }
}
