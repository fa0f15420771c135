//! GlobalNest - student services platform

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use globalnest::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxBookingRepository, SqlxFeedbackRepository, SqlxHousingRepository,
            SqlxJobRepository, SqlxMentorRepository, SqlxProfileRepository, SqlxReviewRepository,
            SqlxSessionRepository, SqlxUniversityRepository, SqlxUserRepository,
        },
    },
    services::{
        AuthService, BookingService, FeedbackService, HousingService, ImageStorage, JobService,
        MentorService, ProfileService, UniversityService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "globalnest=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GlobalNest...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let profile_repo = SqlxProfileRepository::boxed(pool.clone());
    let housing_repo = SqlxHousingRepository::boxed(pool.clone());
    let job_repo = SqlxJobRepository::boxed(pool.clone());
    let mentor_repo = SqlxMentorRepository::boxed(pool.clone());
    let review_repo = SqlxReviewRepository::boxed(pool.clone());
    let booking_repo = SqlxBookingRepository::boxed(pool.clone());
    let feedback_repo = SqlxFeedbackRepository::boxed(pool.clone());
    let university_repo = SqlxUniversityRepository::boxed(pool.clone());

    // Initialize image storage
    let storage_config = Arc::new(config.storage.clone());
    let storage = Arc::new(ImageStorage::new(storage_config.clone()));

    // Initialize services
    let auth_service = Arc::new(AuthService::new(
        user_repo,
        session_repo,
        profile_repo.clone(),
    ));
    let profile_service = Arc::new(ProfileService::new(profile_repo, storage));
    let housing_service = Arc::new(HousingService::new(housing_repo));
    let job_service = Arc::new(JobService::new(job_repo));
    let mentor_service = Arc::new(MentorService::new(mentor_repo.clone(), review_repo));
    let booking_service = Arc::new(BookingService::new(booking_repo, mentor_repo));
    let feedback_service = Arc::new(FeedbackService::new(feedback_repo));
    let university_service = Arc::new(UniversityService::new(university_repo));
    tracing::info!("Services initialized");

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        auth_service,
        profile_service,
        housing_service,
        job_service,
        mentor_service,
        booking_service,
        feedback_service,
        university_service,
        storage_config,
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
