//! University directory API endpoints
//!
//! - GET /api/v1/universities - Directory with search
//! - GET /api/v1/universities/{id}/students - Students with filters

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Student, StudentStatus, University};
use crate::services::StudentFilters;

/// Query parameters for the university list
#[derive(Debug, Deserialize, Default)]
pub struct UniversitiesQuery {
    #[serde(default)]
    pub search: String,
}

/// Query parameters for the student directory
#[derive(Debug, Deserialize, Default)]
pub struct StudentsQuery {
    pub search: Option<String>,
    pub degree: Option<String>,
    pub batch_year: Option<i32>,
    pub status: Option<StudentStatus>,
}

/// Build the universities router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_universities))
        .route("/{id}/students", get(list_students))
}

/// GET /api/v1/universities - Directory with search
async fn list_universities(
    State(state): State<AppState>,
    Query(query): Query<UniversitiesQuery>,
) -> Result<Json<Vec<University>>, ApiError> {
    let universities = state.university_service.list(&query.search).await?;
    Ok(Json(universities))
}

/// GET /api/v1/universities/{id}/students - Students with filters
async fn list_students(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<StudentsQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let filters = StudentFilters {
        search: query.search.filter(|s| !s.is_empty()),
        degree: query.degree.filter(|s| !s.is_empty()),
        batch_year: query.batch_year,
        status: query.status,
    };

    let students = state.university_service.students(id, &filters).await?;
    Ok(Json(students))
}
