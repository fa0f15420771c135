//! Static content API endpoints
//!
//! Serves the embedded editorial content behind the news/events and
//! resources pages.
//!
//! - GET /api/v1/content/news - News items and upcoming events
//! - GET /api/v1/content/resources - Visa and packing guides

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::AppState;
use crate::content::{events, news_items, packing_guides, visa_guides, Event, NewsItem, PackingGuide, VisaGuide};

/// News & events payload
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub news: &'static [NewsItem],
    pub events: &'static [Event],
}

/// Resources payload
#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub visa_guides: &'static [VisaGuide],
    pub packing_guides: &'static [PackingGuide],
}

/// Build the content router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(get_news))
        .route("/resources", get(get_resources))
}

/// GET /api/v1/content/news - News items and events
async fn get_news() -> Json<NewsResponse> {
    Json(NewsResponse {
        news: news_items(),
        events: events(),
    })
}

/// GET /api/v1/content/resources - Resource guides
async fn get_resources() -> Json<ResourcesResponse> {
    Json(ResourcesResponse {
        visa_guides: visa_guides(),
        packing_guides: packing_guides(),
    })
}
