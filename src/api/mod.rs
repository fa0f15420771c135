//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the GlobalNest service:
//! - Auth endpoints (register/login/logout/me)
//! - Profile endpoints (including the image upload)
//! - Housing and job listing endpoints
//! - University directory endpoints
//! - Community endpoints
//! - Mentor and review endpoints
//! - Booking (sessions) endpoints
//! - Feedback endpoint
//! - Static content endpoints (news, resources)
//!
//! Everything except register/login sits behind the auth middleware; a
//! request without a valid session gets 401, which the client turns into
//! its login redirect.

pub mod auth;
pub mod bookings;
pub mod community;
pub mod content;
pub mod feedback;
pub mod housing;
pub mod jobs;
pub mod mentors;
pub mod middleware;
pub mod profile;
pub mod universities;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Everything a signed-in user can reach
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/profile", profile::router())
        .nest("/housing", housing::router())
        .nest("/jobs", jobs::router())
        .nest("/universities", universities::router())
        .nest("/community", community::router())
        .nest("/mentors", mentors::router())
        .nest("/sessions", bookings::router())
        .nest("/feedback", feedback::router())
        .nest("/content", content::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .nest("/auth", auth::public_router())
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    // CORS configured for cookie-based auth from the web client
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    let uploads_dir = state.storage_config.path.clone();

    Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        // Uploaded profile images are served as plain static files
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::db::repositories::{
        SqlxBookingRepository, SqlxFeedbackRepository, SqlxHousingRepository, SqlxJobRepository,
        SqlxMentorRepository, SqlxProfileRepository, SqlxReviewRepository, SqlxSessionRepository,
        SqlxUniversityRepository, SqlxUserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::services::{
        AuthService, BookingService, FeedbackService, HousingService, ImageStorage, JobService,
        MentorService, ProfileService, UniversityService,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    async fn test_server() -> TestServer {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        let profile_repo = SqlxProfileRepository::boxed(pool.clone());
        let mentor_repo = SqlxMentorRepository::boxed(pool.clone());

        let storage_config = Arc::new(StorageConfig::default());
        let storage = Arc::new(ImageStorage::new(storage_config.clone()));

        let state = AppState {
            pool: pool.clone(),
            auth_service: Arc::new(AuthService::new(
                user_repo,
                session_repo,
                profile_repo.clone(),
            )),
            profile_service: Arc::new(ProfileService::new(profile_repo, storage)),
            housing_service: Arc::new(HousingService::new(SqlxHousingRepository::boxed(
                pool.clone(),
            ))),
            job_service: Arc::new(JobService::new(SqlxJobRepository::boxed(pool.clone()))),
            mentor_service: Arc::new(MentorService::new(
                mentor_repo.clone(),
                SqlxReviewRepository::boxed(pool.clone()),
            )),
            booking_service: Arc::new(BookingService::new(
                SqlxBookingRepository::boxed(pool.clone()),
                mentor_repo,
            )),
            feedback_service: Arc::new(FeedbackService::new(SqlxFeedbackRepository::boxed(
                pool.clone(),
            ))),
            university_service: Arc::new(UniversityService::new(SqlxUniversityRepository::boxed(
                pool.clone(),
            ))),
            storage_config,
        };

        let app = build_router(state, "http://localhost:3000");
        TestServer::new(app).expect("Failed to start test server")
    }

    async fn register(server: &TestServer, email: &str) -> String {
        let response = server
            .post("/api/v1/auth/register")
            .json(&json!({
                "email": email,
                "password": "password123",
                "role": "planning"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["token"].as_str().expect("token missing").to_string()
    }

    #[tokio::test]
    async fn test_protected_routes_reject_anonymous_requests() {
        let server = test_server().await;

        for path in ["/api/v1/housing", "/api/v1/profile", "/api/v1/sessions"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_register_then_me() {
        let server = test_server().await;
        let token = register(&server, "flow@example.com").await;

        let response = server
            .get("/api/v1/auth/me")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["email"], "flow@example.com");
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let server = test_server().await;
        let token = register(&server, "logout@example.com").await;

        let response = server
            .post("/api/v1/auth/logout")
            .authorization_bearer(&token)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        // The stale token no longer reaches protected routes
        let response = server
            .get("/api/v1/profile")
            .authorization_bearer(&token)
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_housing_crud_round_trip() {
        let server = test_server().await;
        let token = register(&server, "crud@example.com").await;

        let created = server
            .post("/api/v1/housing")
            .authorization_bearer(&token)
            .json(&json!({
                "title": "Room near campus",
                "description": "Sunny room, five minutes from the library",
                "price": 650.0,
                "location": "Palo Alto, CA",
                "available_from": "2025-09-01"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let listing: serde_json::Value = created.json();

        // Refetch-after-mutation: the list reflects the insert
        let list = server
            .get("/api/v1/housing")
            .authorization_bearer(&token)
            .await;
        list.assert_status_ok();
        let listings: serde_json::Value = list.json();
        assert_eq!(listings.as_array().unwrap().len(), 1);

        let delete = server
            .delete(&format!("/api/v1/housing/{}", listing["id"]))
            .authorization_bearer(&token)
            .await;
        delete.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let server = test_server().await;
        register(&server, "badlogin@example.com").await;

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({
                "email": "badlogin@example.com",
                "password": "not-the-password"
            }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_universities_listed_for_signed_in_user() {
        let server = test_server().await;
        let token = register(&server, "uni@example.com").await;

        let response = server
            .get("/api/v1/universities")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();

        let universities: serde_json::Value = response.json();
        assert_eq!(universities.as_array().unwrap().len(), 7);
    }
}
