//! Feedback API endpoints (the contact page)
//!
//! - POST /api/v1/feedback - Submit the contact form

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateFeedbackInput, Feedback};

/// Build the feedback router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_feedback))
}

/// POST /api/v1/feedback - Submit feedback
async fn submit_feedback(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateFeedbackInput>,
) -> Result<impl IntoResponse, ApiError> {
    let feedback: Feedback = state.feedback_service.submit(&user.0, body).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
