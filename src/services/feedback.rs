//! Feedback service
//!
//! Business logic for the contact form.

use crate::db::repositories::FeedbackRepository;
use crate::models::{CreateFeedbackInput, Feedback, User};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for feedback operations
#[derive(Debug, thiserror::Error)]
pub enum FeedbackServiceError {
    /// Missing subject or message
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Feedback service
pub struct FeedbackService {
    repo: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    /// Create a new feedback service
    pub fn new(repo: Arc<dyn FeedbackRepository>) -> Self {
        Self { repo }
    }

    /// Submit feedback from a user
    pub async fn submit(
        &self,
        user: &User,
        input: CreateFeedbackInput,
    ) -> Result<Feedback, FeedbackServiceError> {
        if input.subject.trim().is_empty() {
            return Err(FeedbackServiceError::ValidationError(
                "Subject is required".to_string(),
            ));
        }
        if input.message.trim().is_empty() {
            return Err(FeedbackServiceError::ValidationError(
                "Message is required".to_string(),
            ));
        }

        let created = self
            .repo
            .create(&Feedback {
                id: 0,
                user_id: user.id,
                subject: input.subject,
                message: input.message,
                created_at: Utc::now(),
            })
            .await
            .context("Failed to submit feedback")?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxFeedbackRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::UserRole;

    async fn setup() -> (FeedbackService, User) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new("fb@example.com".to_string(), "hash".to_string(), UserRole::Planning))
            .await
            .unwrap();

        (FeedbackService::new(SqlxFeedbackRepository::boxed(pool)), user)
    }

    #[tokio::test]
    async fn test_submit() {
        let (service, user) = setup().await;

        let feedback = service
            .submit(
                &user,
                CreateFeedbackInput {
                    subject: "Great site".to_string(),
                    message: "Found a room in two days".to_string(),
                },
            )
            .await
            .expect("Submit failed");

        assert!(feedback.id > 0);
        assert_eq!(feedback.user_id, user.id);
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let (service, user) = setup().await;

        let no_subject = service
            .submit(
                &user,
                CreateFeedbackInput {
                    subject: "  ".to_string(),
                    message: "Body".to_string(),
                },
            )
            .await;
        assert!(matches!(no_subject, Err(FeedbackServiceError::ValidationError(_))));

        let no_message = service
            .submit(
                &user,
                CreateFeedbackInput {
                    subject: "Subject".to_string(),
                    message: "".to_string(),
                },
            )
            .await;
        assert!(matches!(no_message, Err(FeedbackServiceError::ValidationError(_))));
    }
}
