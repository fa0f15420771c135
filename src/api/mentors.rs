//! Mentor API endpoints (the connect flow)
//!
//! - GET /api/v1/mentors - Mentor directory
//! - POST /api/v1/mentors - Register as a mentor
//! - GET /api/v1/mentors/{id} - Mentor detail with reviews and the
//!   caller's review form state
//! - POST /api/v1/mentors/{id}/reviews - Submit (insert or update) a review

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateMentorInput, Mentor, Review, SubmitReviewInput};
use crate::services::ReviewForm;

/// Mentor detail: the mentor, their reviews, and what the caller's review
/// form should show (blank five-star default, or their previous review).
#[derive(Debug, Serialize)]
pub struct MentorDetailResponse {
    pub mentor: Mentor,
    pub reviews: Vec<Review>,
    pub review_form: ReviewForm,
}

/// Build the mentors router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mentors).post(register_mentor))
        .route("/{id}", get(get_mentor))
        .route("/{id}/reviews", get(list_reviews).post(submit_review))
}

/// GET /api/v1/mentors - Mentor directory
async fn list_mentors(State(state): State<AppState>) -> Result<Json<Vec<Mentor>>, ApiError> {
    let mentors = state.mentor_service.list().await?;
    Ok(Json(mentors))
}

/// POST /api/v1/mentors - Register the current user as a mentor
async fn register_mentor(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateMentorInput>,
) -> Result<impl IntoResponse, ApiError> {
    let mentor = state.mentor_service.register(&user.0, body).await?;
    Ok((StatusCode::CREATED, Json(mentor)))
}

/// GET /api/v1/mentors/{id} - Mentor detail
///
/// Selecting a mentor loads their reviews and checks whether the caller
/// already reviewed them, pre-filling the form if so.
async fn get_mentor(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<MentorDetailResponse>, ApiError> {
    let mentor = state.mentor_service.get(id).await?;
    let reviews = state.mentor_service.reviews(id).await?;
    let review_form = state.mentor_service.review_form(id, user.0.id).await?;

    Ok(Json(MentorDetailResponse {
        mentor,
        reviews,
        review_form,
    }))
}

/// GET /api/v1/mentors/{id}/reviews - Reviews for a mentor
async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Review>>, ApiError> {
    // 404 for unknown mentors rather than an empty list
    state.mentor_service.get(id).await?;
    let reviews = state.mentor_service.reviews(id).await?;
    Ok(Json(reviews))
}

/// POST /api/v1/mentors/{id}/reviews - Submit a review
///
/// Inserts on first submission, updates on resubmission, and refreshes the
/// mentor's aggregate rating either way.
async fn submit_review(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<SubmitReviewInput>,
) -> Result<Json<Review>, ApiError> {
    let review = state.mentor_service.submit_review(&user.0, id, body).await?;
    Ok(Json(review))
}
