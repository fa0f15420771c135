//! Bookings API endpoints (the sessions page)
//!
//! - GET /api/v1/sessions - The caller's bookings, by tab and status
//! - POST /api/v1/sessions - Book a mentoring session
//! - POST /api/v1/sessions/{id}/cancel - Cancel (refunds)
//! - POST /api/v1/sessions/{id}/complete - Mark completed (pays out)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Booking, BookingStatus, CreateBookingInput};
use crate::services::BookingTab;

/// Query parameters for the bookings list
#[derive(Debug, Deserialize, Default)]
pub struct BookingsQuery {
    /// "upcoming" (default) or "past"
    #[serde(default)]
    pub tab: String,
    pub status: Option<BookingStatus>,
}

/// Build the bookings router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/{id}/cancel", post(cancel_booking))
        .route("/{id}/complete", post(complete_booking))
}

/// GET /api/v1/sessions - The caller's bookings
async fn list_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let tab = match query.tab.as_str() {
        "past" => BookingTab::Past,
        _ => BookingTab::Upcoming,
    };

    let bookings = state
        .booking_service
        .list(&user.0, tab, query.status)
        .await?;
    Ok(Json(bookings))
}

/// POST /api/v1/sessions - Book a mentoring session
///
/// Requires a date and time slot; the amount is computed from the mentor's
/// hourly rate and the chosen duration.
async fn create_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateBookingInput>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state.booking_service.book(&user.0, body).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// POST /api/v1/sessions/{id}/cancel - Cancel an upcoming booking
async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.booking_service.cancel(&user.0, id).await?;
    Ok(Json(booking))
}

/// POST /api/v1/sessions/{id}/complete - Mark a booking completed
async fn complete_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state.booking_service.complete(&user.0, id).await?;
    Ok(Json(booking))
}
