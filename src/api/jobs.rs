//! Jobs API endpoints
//!
//! - GET /api/v1/jobs - List with search and filters
//! - POST /api/v1/jobs - Create a listing
//! - PUT /api/v1/jobs/{id} - Update own listing
//! - DELETE /api/v1/jobs/{id} - Delete own listing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateJobInput, JobListing, JobType, UpdateJobInput};
use crate::services::JobFilters;

/// Query parameters for the jobs list
#[derive(Debug, Deserialize, Default)]
pub struct JobsQuery {
    #[serde(default)]
    pub search: String,
    pub job_type: Option<JobType>,
    /// "min-max" or "min+"
    pub salary_range: Option<String>,
}

impl From<JobsQuery> for JobFilters {
    fn from(query: JobsQuery) -> Self {
        Self {
            job_type: query.job_type,
            salary_range: query.salary_range.filter(|s| !s.is_empty()),
        }
    }
}

/// Build the jobs router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/{id}", axum::routing::put(update_job).delete(delete_job))
}

/// GET /api/v1/jobs - List listings, filtered in memory
async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<Vec<JobListing>>, ApiError> {
    let search = query.search.clone();
    let filters: JobFilters = query.into();

    let listings = state.job_service.list(&search, &filters).await?;
    Ok(Json(listings))
}

/// POST /api/v1/jobs - Create a listing
async fn create_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateJobInput>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.job_service.create(&user.0, body).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// PUT /api/v1/jobs/{id} - Update own listing
async fn update_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateJobInput>,
) -> Result<Json<JobListing>, ApiError> {
    let listing = state.job_service.update(&user.0, id, body).await?;
    Ok(Json(listing))
}

/// DELETE /api/v1/jobs/{id} - Delete own listing
async fn delete_job(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.job_service.delete(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
