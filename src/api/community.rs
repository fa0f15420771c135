//! Community API endpoints
//!
//! - GET /api/v1/community - Profiles with a location, optionally narrowed
//!   by a name/university search. The map and sidebar both render from
//!   this one list.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::profile::ProfileResponse;

/// Query parameters for the community list
#[derive(Debug, Deserialize, Default)]
pub struct CommunityQuery {
    #[serde(default)]
    pub search: String,
}

/// Build the community router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_community))
}

/// GET /api/v1/community - Located profiles, filtered in memory
async fn list_community(
    State(state): State<AppState>,
    Query(query): Query<CommunityQuery>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let profiles = state.profile_service.community().await?;

    let needle = query.search.to_lowercase();
    let profiles: Vec<ProfileResponse> = profiles
        .into_iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.university.to_lowercase().contains(&needle)
        })
        .map(Into::into)
        .collect();

    Ok(Json(profiles))
}
