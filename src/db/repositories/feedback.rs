//! Feedback repository
//!
//! Database operations for contact-form submissions.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Feedback;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::sync::Arc;

/// Feedback repository trait
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Create a feedback entry
    async fn create(&self, feedback: &Feedback) -> Result<Feedback>;

    /// List feedback submitted by a user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Feedback>>;
}

/// SQLx-based feedback repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxFeedbackRepository {
    pool: DynDatabasePool,
}

impl SqlxFeedbackRepository {
    /// Create a new SQLx feedback repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn FeedbackRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl FeedbackRepository for SqlxFeedbackRepository {
    async fn create(&self, feedback: &Feedback) -> Result<Feedback> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_feedback_sqlite(self.pool.as_sqlite().unwrap(), feedback).await
            }
            DatabaseDriver::Postgres => {
                create_feedback_postgres(self.pool.as_postgres().unwrap(), feedback).await
            }
        }
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Feedback>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_feedback_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Postgres => {
                list_feedback_postgres(self.pool.as_postgres().unwrap(), user_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_feedback_sqlite(pool: &SqlitePool, feedback: &Feedback) -> Result<Feedback> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO feedback (user_id, subject, message, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(feedback.user_id)
    .bind(&feedback.subject)
    .bind(&feedback.message)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create feedback")?;

    Ok(Feedback {
        id: result.last_insert_rowid(),
        created_at: now,
        ..feedback.clone()
    })
}

async fn list_feedback_sqlite(pool: &SqlitePool, user_id: i64) -> Result<Vec<Feedback>> {
    let rows = sqlx::query(
        "SELECT id, user_id, subject, message, created_at
         FROM feedback WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list feedback")?;

    Ok(rows
        .iter()
        .map(|row| Feedback {
            id: row.get("id"),
            user_id: row.get("user_id"),
            subject: row.get("subject"),
            message: row.get("message"),
            created_at: row.get("created_at"),
        })
        .collect())
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn create_feedback_postgres(pool: &PgPool, feedback: &Feedback) -> Result<Feedback> {
    let now = Utc::now();

    let row = sqlx::query(
        "INSERT INTO feedback (user_id, subject, message, created_at) VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(feedback.user_id)
    .bind(&feedback.subject)
    .bind(&feedback.message)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create feedback")?;

    Ok(Feedback {
        id: row.get("id"),
        created_at: now,
        ..feedback.clone()
    })
}

async fn list_feedback_postgres(pool: &PgPool, user_id: i64) -> Result<Vec<Feedback>> {
    let rows = sqlx::query(
        "SELECT id, user_id, subject, message, created_at
         FROM feedback WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list feedback")?;

    Ok(rows
        .iter()
        .map(|row| Feedback {
            id: row.get("id"),
            user_id: row.get("user_id"),
            subject: row.get("subject"),
            message: row.get("message"),
            created_at: row.get("created_at"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{User, UserRole};

    async fn setup() -> (SqlxFeedbackRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new(
                "feedback@example.com".to_string(),
                "hash".to_string(),
                UserRole::Planning,
            ))
            .await
            .unwrap();

        (SqlxFeedbackRepository::new(pool), user.id)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (repo, user_id) = setup().await;

        let created = repo
            .create(&Feedback {
                id: 0,
                user_id,
                subject: "Housing page".to_string(),
                message: "The date filter is great".to_string(),
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to create feedback");
        assert!(created.id > 0);

        let listed = repo.list_by_user(user_id).await.expect("Failed to list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].subject, "Housing page");
    }
}
