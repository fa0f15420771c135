//! Mentor service
//!
//! Business logic for the mentor marketplace: the mentor directory,
//! registering as a mentor, and the review flow. Submitting a review
//! validates locally, inserts or updates depending on whether the caller
//! reviewed this mentor before, then refreshes the mentor's aggregate
//! rating.

use crate::db::repositories::{MentorRepository, ReviewRepository};
use crate::models::{
    CreateMentorInput, Mentor, Review, SubmitReviewInput, User, DEFAULT_RATING, MIN_COMMENT_LENGTH,
};
use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

/// Error types for mentor operations
#[derive(Debug, thiserror::Error)]
pub enum MentorServiceError {
    /// Mentor does not exist
    #[error("Mentor not found")]
    NotFound,

    /// The user already has a mentor profile
    #[error("Already registered as a mentor")]
    AlreadyRegistered,

    /// Review validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Pre-filled state for the review form: the caller's existing review when
/// there is one, otherwise a blank five-star default.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewForm {
    pub rating: i32,
    pub comment: String,
    /// True when submission will update rather than insert
    pub existing: bool,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            comment: String::new(),
            existing: false,
        }
    }
}

/// Mentor service
pub struct MentorService {
    mentor_repo: Arc<dyn MentorRepository>,
    review_repo: Arc<dyn ReviewRepository>,
}

impl MentorService {
    /// Create a new mentor service
    pub fn new(
        mentor_repo: Arc<dyn MentorRepository>,
        review_repo: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            mentor_repo,
            review_repo,
        }
    }

    /// List all mentors
    pub async fn list(&self) -> Result<Vec<Mentor>, MentorServiceError> {
        let mentors = self.mentor_repo.list().await.context("Failed to load mentors")?;
        Ok(mentors)
    }

    /// Get a mentor by ID
    pub async fn get(&self, id: i64) -> Result<Mentor, MentorServiceError> {
        self.mentor_repo
            .get_by_id(id)
            .await
            .context("Failed to load mentor")?
            .ok_or(MentorServiceError::NotFound)
    }

    /// Register the user as a mentor
    pub async fn register(
        &self,
        user: &User,
        input: CreateMentorInput,
    ) -> Result<Mentor, MentorServiceError> {
        if self
            .mentor_repo
            .get_by_user(user.id)
            .await
            .context("Failed to check mentor registration")?
            .is_some()
        {
            return Err(MentorServiceError::AlreadyRegistered);
        }

        let now = Utc::now();
        let mentor = Mentor {
            id: 0,
            user_id: user.id,
            name: input.name,
            title: input.title,
            bio: input.bio,
            expertise: input.expertise,
            hourly_rate: input.hourly_rate,
            currency: input.currency,
            rating: 0.0,
            review_count: 0,
            badges: input.badges,
            languages: input.languages,
            availability: input.availability,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .mentor_repo
            .create(&mentor)
            .await
            .context("Failed to create mentor")?;

        Ok(created)
    }

    /// Reviews left on a mentor, newest first
    pub async fn reviews(&self, mentor_id: i64) -> Result<Vec<Review>, MentorServiceError> {
        let reviews = self
            .review_repo
            .list_by_mentor(mentor_id)
            .await
            .context("Failed to load reviews")?;

        Ok(reviews)
    }

    /// The review form state for a user looking at a mentor: pre-filled
    /// from their earlier review, or blank with a five-star default.
    pub async fn review_form(
        &self,
        mentor_id: i64,
        user_id: i64,
    ) -> Result<ReviewForm, MentorServiceError> {
        let existing = self
            .review_repo
            .find_by_mentor_and_user(mentor_id, user_id)
            .await
            .context("Failed to look up existing review")?;

        Ok(match existing {
            Some(review) => ReviewForm {
                rating: review.rating,
                comment: review.comment,
                existing: true,
            },
            None => ReviewForm::default(),
        })
    }

    /// Submit a review: insert on first submission, update on resubmission,
    /// then refresh the mentor's aggregate rating and review count.
    ///
    /// Validation happens before any write: rating must be 1 to 5 and the
    /// comment at least 10 characters.
    pub async fn submit_review(
        &self,
        user: &User,
        mentor_id: i64,
        input: SubmitReviewInput,
    ) -> Result<Review, MentorServiceError> {
        if !(1..=5).contains(&input.rating) {
            return Err(MentorServiceError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        if input.comment.chars().count() < MIN_COMMENT_LENGTH {
            return Err(MentorServiceError::ValidationError(format!(
                "Comment must be at least {} characters",
                MIN_COMMENT_LENGTH
            )));
        }

        // The mentor must exist before anything is written
        self.get(mentor_id).await?;

        let existing = self
            .review_repo
            .find_by_mentor_and_user(mentor_id, user.id)
            .await
            .context("Failed to look up existing review")?;

        let review = match existing {
            Some(mut review) => {
                review.rating = input.rating;
                review.comment = input.comment;
                self.review_repo
                    .update(&review)
                    .await
                    .context("Failed to update review")?
            }
            None => {
                let now = Utc::now();
                self.review_repo
                    .create(&Review {
                        id: 0,
                        mentor_id,
                        user_id: user.id,
                        rating: input.rating,
                        comment: input.comment,
                        created_at: now,
                        updated_at: now,
                    })
                    .await
                    .context("Failed to create review")?
            }
        };

        let (rating, count) = self
            .review_repo
            .rating_summary(mentor_id)
            .await
            .context("Failed to compute rating summary")?;
        self.mentor_repo
            .set_rating(mentor_id, rating, count)
            .await
            .context("Failed to refresh mentor rating")?;

        Ok(review)
    }
}
