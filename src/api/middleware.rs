//! API middleware
//!
//! Contains:
//! - The shared application state
//! - Authentication middleware (session token validation)
//! - The uniform API error responder

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::User;
use crate::services::{
    AuthService, AuthServiceError, BookingService, BookingServiceError, FeedbackService,
    FeedbackServiceError, HousingService, HousingServiceError, JobService, JobServiceError,
    MentorService, MentorServiceError, ProfileService, ProfileServiceError, StorageError,
    UniversityService, UniversityServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: crate::db::DynDatabasePool,
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub housing_service: Arc<HousingService>,
    pub job_service: Arc<JobService>,
    pub mentor_service: Arc<MentorService>,
    pub booking_service: Arc<BookingService>,
    pub feedback_service: Arc<FeedbackService>,
    pub university_service: Arc<UniversityService>,
    pub storage_config: Arc<crate::config::StorageConfig>,
}

/// Authenticated user extracted from request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

// Service errors map onto the uniform responder so every handler surfaces
// failures the same way.

impl From<AuthServiceError> for ApiError {
    fn from(e: AuthServiceError) -> Self {
        match e {
            AuthServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
            AuthServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            AuthServiceError::AccountExists(msg) => ApiError::conflict(msg),
            AuthServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<ProfileServiceError> for ApiError {
    fn from(e: ProfileServiceError) -> Self {
        match e {
            ProfileServiceError::NotFound => ApiError::not_found("Profile not found"),
            ProfileServiceError::Storage(e) => e.into(),
            ProfileServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidType(_) | StorageError::TooLarge { .. } => {
                ApiError::validation_error(e.to_string())
            }
            StorageError::InternalError(e) => internal(e),
        }
    }
}

impl From<HousingServiceError> for ApiError {
    fn from(e: HousingServiceError) -> Self {
        match e {
            HousingServiceError::NotFound => ApiError::not_found(e.to_string()),
            HousingServiceError::Forbidden => ApiError::forbidden(e.to_string()),
            HousingServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<JobServiceError> for ApiError {
    fn from(e: JobServiceError) -> Self {
        match e {
            JobServiceError::NotFound => ApiError::not_found(e.to_string()),
            JobServiceError::Forbidden => ApiError::forbidden(e.to_string()),
            JobServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<MentorServiceError> for ApiError {
    fn from(e: MentorServiceError) -> Self {
        match e {
            MentorServiceError::NotFound => ApiError::not_found(e.to_string()),
            MentorServiceError::AlreadyRegistered => ApiError::conflict(e.to_string()),
            MentorServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            MentorServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<BookingServiceError> for ApiError {
    fn from(e: BookingServiceError) -> Self {
        match e {
            BookingServiceError::NotFound(_) => ApiError::not_found(e.to_string()),
            BookingServiceError::Forbidden => ApiError::forbidden(e.to_string()),
            BookingServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            BookingServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<FeedbackServiceError> for ApiError {
    fn from(e: FeedbackServiceError) -> Self {
        match e {
            FeedbackServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            FeedbackServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<UniversityServiceError> for ApiError {
    fn from(e: UniversityServiceError) -> Self {
        match e {
            UniversityServiceError::NotFound => ApiError::not_found(e.to_string()),
            UniversityServiceError::InternalError(e) => internal(e),
        }
    }
}

fn internal(e: anyhow::Error) -> ApiError {
    tracing::error!("Internal error: {:#}", e);
    ApiError::internal_error("Something went wrong")
}

/// Extract the session token from a request: `Authorization: Bearer`
/// first, then the `session` cookie.
pub fn extract_session_token(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
///
/// Resolves the session token to its user and stores it in request
/// extensions; requests without a valid session are rejected with 401,
/// which the client turns into its login redirect.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user = state
        .auth_service
        .current_user(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}
