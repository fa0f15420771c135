//! Mentor review repository
//!
//! Database operations for mentor reviews. The unique index on
//! (mentor_id, user_id) backs the one-review-per-pair rule; the service
//! layer decides between insert and update by calling
//! `find_by_mentor_and_user` first.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Review;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::sync::Arc;

/// Review repository trait
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// List reviews for a mentor, newest first
    async fn list_by_mentor(&self, mentor_id: i64) -> Result<Vec<Review>>;

    /// Find the review a user left on a mentor, if any
    async fn find_by_mentor_and_user(&self, mentor_id: i64, user_id: i64)
        -> Result<Option<Review>>;

    /// Create a review
    async fn create(&self, review: &Review) -> Result<Review>;

    /// Update an existing review's rating and comment
    async fn update(&self, review: &Review) -> Result<Review>;

    /// Average rating and review count for a mentor
    async fn rating_summary(&self, mentor_id: i64) -> Result<(f64, i64)>;
}

/// SQLx-based review repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxReviewRepository {
    pool: DynDatabasePool,
}

impl SqlxReviewRepository {
    /// Create a new SQLx review repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ReviewRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ReviewRepository for SqlxReviewRepository {
    async fn list_by_mentor(&self, mentor_id: i64) -> Result<Vec<Review>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_reviews_sqlite(self.pool.as_sqlite().unwrap(), mentor_id).await
            }
            DatabaseDriver::Postgres => {
                list_reviews_postgres(self.pool.as_postgres().unwrap(), mentor_id).await
            }
        }
    }

    async fn find_by_mentor_and_user(
        &self,
        mentor_id: i64,
        user_id: i64,
    ) -> Result<Option<Review>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                find_review_sqlite(self.pool.as_sqlite().unwrap(), mentor_id, user_id).await
            }
            DatabaseDriver::Postgres => {
                find_review_postgres(self.pool.as_postgres().unwrap(), mentor_id, user_id).await
            }
        }
    }

    async fn create(&self, review: &Review) -> Result<Review> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_review_sqlite(self.pool.as_sqlite().unwrap(), review).await
            }
            DatabaseDriver::Postgres => {
                create_review_postgres(self.pool.as_postgres().unwrap(), review).await
            }
        }
    }

    async fn update(&self, review: &Review) -> Result<Review> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_review_sqlite(self.pool.as_sqlite().unwrap(), review).await
            }
            DatabaseDriver::Postgres => {
                update_review_postgres(self.pool.as_postgres().unwrap(), review).await
            }
        }
    }

    async fn rating_summary(&self, mentor_id: i64) -> Result<(f64, i64)> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                rating_summary_sqlite(self.pool.as_sqlite().unwrap(), mentor_id).await
            }
            DatabaseDriver::Postgres => {
                rating_summary_postgres(self.pool.as_postgres().unwrap(), mentor_id).await
            }
        }
    }
}

const REVIEW_COLUMNS: &str = "id, mentor_id, user_id, rating, comment, created_at, updated_at";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn list_reviews_sqlite(pool: &SqlitePool, mentor_id: i64) -> Result<Vec<Review>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM mentor_reviews WHERE mentor_id = ? ORDER BY created_at DESC",
        REVIEW_COLUMNS
    ))
    .bind(mentor_id)
    .fetch_all(pool)
    .await
    .context("Failed to list reviews")?;

    Ok(rows.iter().map(row_to_review_sqlite).collect())
}

async fn find_review_sqlite(
    pool: &SqlitePool,
    mentor_id: i64,
    user_id: i64,
) -> Result<Option<Review>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM mentor_reviews WHERE mentor_id = ? AND user_id = ?",
        REVIEW_COLUMNS
    ))
    .bind(mentor_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to find review")?;

    Ok(row.map(|row| row_to_review_sqlite(&row)))
}

async fn create_review_sqlite(pool: &SqlitePool, review: &Review) -> Result<Review> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO mentor_reviews (mentor_id, user_id, rating, comment, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(review.mentor_id)
    .bind(review.user_id)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create review")?;

    Ok(Review {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..review.clone()
    })
}

async fn update_review_sqlite(pool: &SqlitePool, review: &Review) -> Result<Review> {
    let now = Utc::now();

    sqlx::query("UPDATE mentor_reviews SET rating = ?, comment = ?, updated_at = ? WHERE id = ?")
        .bind(review.rating)
        .bind(&review.comment)
        .bind(now)
        .bind(review.id)
        .execute(pool)
        .await
        .context("Failed to update review")?;

    Ok(Review {
        updated_at: now,
        ..review.clone()
    })
}

async fn rating_summary_sqlite(pool: &SqlitePool, mentor_id: i64) -> Result<(f64, i64)> {
    let row = sqlx::query(
        "SELECT COALESCE(AVG(rating), 0.0) as avg_rating, COUNT(*) as count
         FROM mentor_reviews WHERE mentor_id = ?",
    )
    .bind(mentor_id)
    .fetch_one(pool)
    .await
    .context("Failed to compute rating summary")?;

    Ok((row.get("avg_rating"), row.get("count")))
}

fn row_to_review_sqlite(row: &sqlx::sqlite::SqliteRow) -> Review {
    Review {
        id: row.get("id"),
        mentor_id: row.get("mentor_id"),
        user_id: row.get("user_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn list_reviews_postgres(pool: &PgPool, mentor_id: i64) -> Result<Vec<Review>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM mentor_reviews WHERE mentor_id = $1 ORDER BY created_at DESC",
        REVIEW_COLUMNS
    ))
    .bind(mentor_id)
    .fetch_all(pool)
    .await
    .context("Failed to list reviews")?;

    Ok(rows.iter().map(row_to_review_postgres).collect())
}

async fn find_review_postgres(
    pool: &PgPool,
    mentor_id: i64,
    user_id: i64,
) -> Result<Option<Review>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM mentor_reviews WHERE mentor_id = $1 AND user_id = $2",
        REVIEW_COLUMNS
    ))
    .bind(mentor_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to find review")?;

    Ok(row.map(|row| row_to_review_postgres(&row)))
}

async fn create_review_postgres(pool: &PgPool, review: &Review) -> Result<Review> {
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO mentor_reviews (mentor_id, user_id, rating, comment, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(review.mentor_id)
    .bind(review.user_id)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create review")?;

    Ok(Review {
        id: row.get("id"),
        created_at: now,
        updated_at: now,
        ..review.clone()
    })
}

async fn update_review_postgres(pool: &PgPool, review: &Review) -> Result<Review> {
    let now = Utc::now();

    sqlx::query("UPDATE mentor_reviews SET rating = $1, comment = $2, updated_at = $3 WHERE id = $4")
        .bind(review.rating)
        .bind(&review.comment)
        .bind(now)
        .bind(review.id)
        .execute(pool)
        .await
        .context("Failed to update review")?;

    Ok(Review {
        updated_at: now,
        ..review.clone()
    })
}

async fn rating_summary_postgres(pool: &PgPool, mentor_id: i64) -> Result<(f64, i64)> {
    let row = sqlx::query(
        "SELECT COALESCE(AVG(rating), 0)::float8 as avg_rating, COUNT(*) as count
         FROM mentor_reviews WHERE mentor_id = $1",
    )
    .bind(mentor_id)
    .fetch_one(pool)
    .await
    .context("Failed to compute rating summary")?;

    Ok((row.get("avg_rating"), row.get("count")))
}

fn row_to_review_postgres(row: &sqlx::postgres::PgRow) -> Review {
    Review {
        id: row.get("id"),
        mentor_id: row.get("mentor_id"),
        user_id: row.get("user_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        MentorRepository, SqlxMentorRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Availability, Mentor, User, UserRole};

    async fn setup() -> (SqlxReviewRepository, i64, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let mentor_user = users
            .create(&User::new("mentor@example.com".to_string(), "hash".to_string(), UserRole::Abroad))
            .await
            .unwrap();
        let reviewer = users
            .create(&User::new("reviewer@example.com".to_string(), "hash".to_string(), UserRole::Planning))
            .await
            .unwrap();

        let mentors = SqlxMentorRepository::new(pool.clone());
        let mentor = mentors
            .create(&Mentor {
                id: 0,
                user_id: mentor_user.id,
                name: "Akhil".to_string(),
                title: String::new(),
                bio: String::new(),
                expertise: vec![],
                hourly_rate: 45.0,
                currency: "USD".to_string(),
                rating: 0.0,
                review_count: 0,
                badges: vec![],
                languages: vec![],
                availability: Availability::default(),
                image_url: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        (SqlxReviewRepository::new(pool), mentor.id, reviewer.id)
    }

    fn make_review(mentor_id: i64, user_id: i64, rating: i32) -> Review {
        Review {
            id: 0,
            mentor_id,
            user_id,
            rating,
            comment: "Very helpful session".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (repo, mentor_id, user_id) = setup().await;

        let created = repo
            .create(&make_review(mentor_id, user_id, 5))
            .await
            .expect("Failed to create review");
        assert!(created.id > 0);

        let found = repo
            .find_by_mentor_and_user(mentor_id, user_id)
            .await
            .expect("Failed to find review")
            .expect("Review not found");
        assert_eq!(found.rating, 5);
    }

    #[tokio::test]
    async fn test_find_absent() {
        let (repo, mentor_id, user_id) = setup().await;

        let found = repo
            .find_by_mentor_and_user(mentor_id, user_id)
            .await
            .expect("Failed to query");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_review_rejected_by_index() {
        let (repo, mentor_id, user_id) = setup().await;

        repo.create(&make_review(mentor_id, user_id, 5)).await.unwrap();
        let duplicate = repo.create(&make_review(mentor_id, user_id, 3)).await;

        assert!(duplicate.is_err(), "Unique index must reject a second review");
    }

    #[tokio::test]
    async fn test_update_review() {
        let (repo, mentor_id, user_id) = setup().await;
        let mut review = repo.create(&make_review(mentor_id, user_id, 3)).await.unwrap();

        review.rating = 4;
        review.comment = "Even better the second time".to_string();
        repo.update(&review).await.expect("Failed to update review");

        let found = repo
            .find_by_mentor_and_user(mentor_id, user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.rating, 4);
        assert_eq!(found.comment, "Even better the second time");
    }

    #[tokio::test]
    async fn test_rating_summary() {
        let (repo, mentor_id, user_id) = setup().await;

        let (avg, count) = repo.rating_summary(mentor_id).await.unwrap();
        assert_eq!(avg, 0.0);
        assert_eq!(count, 0);

        repo.create(&make_review(mentor_id, user_id, 4)).await.unwrap();

        let (avg, count) = repo.rating_summary(mentor_id).await.unwrap();
        assert_eq!(avg, 4.0);
        assert_eq!(count, 1);
    }
}
