//! Profile API endpoints
//!
//! - GET /api/v1/profile - Current user's profile
//! - PUT /api/v1/profile - Update profile fields (optionally with a
//!   client-reported location)
//! - POST /api/v1/profile/image - Replace the profile image

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Location, Profile, UpdateProfileInput};

/// Profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub name: String,
    pub university: String,
    pub field_of_study: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name,
            university: profile.university,
            field_of_study: profile.field_of_study,
            bio: profile.bio,
            image_url: profile.image_url,
            location: profile.location,
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Build the profile router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/image", post(upload_image))
}

/// GET /api/v1/profile - Current user's profile
async fn get_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profile_service.get(user.0.id).await?;
    Ok(Json(profile.into()))
}

/// PUT /api/v1/profile - Update profile fields
async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateProfileInput>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.profile_service.update(user.0.id, body).await?;
    Ok(Json(profile.into()))
}

/// POST /api/v1/profile/image - Replace the profile image
///
/// Accepts multipart/form-data with a single file field named "file".
async fn upload_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to read file: {}", e)))?;

        let profile = state
            .profile_service
            .update_image(user.0.id, &content_type, &data)
            .await?;

        return Ok(Json(profile.into()));
    }

    Err(ApiError::validation_error("No file provided"))
}
