//! Housing API endpoints
//!
//! - GET /api/v1/housing - List with search and filters
//! - POST /api/v1/housing - Create a listing
//! - PUT /api/v1/housing/{id} - Update own listing
//! - DELETE /api/v1/housing/{id} - Delete own listing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateHousingInput, HousingListing, UpdateHousingInput};
use crate::services::HousingFilters;

/// Query parameters for the housing list
#[derive(Debug, Deserialize, Default)]
pub struct HousingQuery {
    #[serde(default)]
    pub search: String,
    /// "min-max" or "min+"
    pub price_range: Option<String>,
    pub available_from: Option<chrono::NaiveDate>,
}

impl From<HousingQuery> for HousingFilters {
    fn from(query: HousingQuery) -> Self {
        Self {
            price_range: query.price_range.filter(|s| !s.is_empty()),
            available_from: query.available_from,
        }
    }
}

/// Build the housing router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_housing).post(create_housing))
        .route("/{id}", axum::routing::put(update_housing).delete(delete_housing))
}

/// GET /api/v1/housing - List listings, filtered in memory
async fn list_housing(
    State(state): State<AppState>,
    Query(query): Query<HousingQuery>,
) -> Result<Json<Vec<HousingListing>>, ApiError> {
    let search = query.search.clone();
    let filters: HousingFilters = query.into();

    let listings = state.housing_service.list(&search, &filters).await?;
    Ok(Json(listings))
}

/// POST /api/v1/housing - Create a listing
async fn create_housing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateHousingInput>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.housing_service.create(&user.0, body).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// PUT /api/v1/housing/{id} - Update own listing
async fn update_housing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateHousingInput>,
) -> Result<Json<HousingListing>, ApiError> {
    let listing = state.housing_service.update(&user.0, id, body).await?;
    Ok(Json(listing))
}

/// DELETE /api/v1/housing/{id} - Delete own listing
async fn delete_housing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.housing_service.delete(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
