//! Mentor repository
//!
//! Database operations for mentor profiles. List-valued fields (expertise,
//! badges, languages) and the weekly availability map are stored as JSON
//! text so the schema stays identical across drivers.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Availability, Mentor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::sync::Arc;

/// Mentor repository trait
#[async_trait]
pub trait MentorRepository: Send + Sync {
    /// List all mentors, best rated first
    async fn list(&self) -> Result<Vec<Mentor>>;

    /// Get a mentor by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Mentor>>;

    /// Get the mentor profile belonging to a user, if any
    async fn get_by_user(&self, user_id: i64) -> Result<Option<Mentor>>;

    /// Create a mentor profile
    async fn create(&self, mentor: &Mentor) -> Result<Mentor>;

    /// Replace the review aggregate after a review was written
    async fn set_rating(&self, id: i64, rating: f64, review_count: i64) -> Result<()>;
}

/// SQLx-based mentor repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxMentorRepository {
    pool: DynDatabasePool,
}

impl SqlxMentorRepository {
    /// Create a new SQLx mentor repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn MentorRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl MentorRepository for SqlxMentorRepository {
    async fn list(&self) -> Result<Vec<Mentor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_mentors_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Postgres => {
                list_mentors_postgres(self.pool.as_postgres().unwrap()).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Mentor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_mentor_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Postgres => {
                get_mentor_by_id_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }

    async fn get_by_user(&self, user_id: i64) -> Result<Option<Mentor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_mentor_by_user_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Postgres => {
                get_mentor_by_user_postgres(self.pool.as_postgres().unwrap(), user_id).await
            }
        }
    }

    async fn create(&self, mentor: &Mentor) -> Result<Mentor> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_mentor_sqlite(self.pool.as_sqlite().unwrap(), mentor).await
            }
            DatabaseDriver::Postgres => {
                create_mentor_postgres(self.pool.as_postgres().unwrap(), mentor).await
            }
        }
    }

    async fn set_rating(&self, id: i64, rating: f64, review_count: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_rating_sqlite(self.pool.as_sqlite().unwrap(), id, rating, review_count).await
            }
            DatabaseDriver::Postgres => {
                set_rating_postgres(self.pool.as_postgres().unwrap(), id, rating, review_count)
                    .await
            }
        }
    }
}

const MENTOR_COLUMNS: &str = "id, user_id, name, title, bio, expertise, hourly_rate, currency, \
     rating, review_count, badges, languages, availability, image_url, created_at, updated_at";

fn json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn parse_json_list(value: String) -> Vec<String> {
    serde_json::from_str(&value).unwrap_or_default()
}

fn parse_availability(value: String) -> Availability {
    serde_json::from_str(&value).unwrap_or_default()
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn list_mentors_sqlite(pool: &SqlitePool) -> Result<Vec<Mentor>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM mentors ORDER BY rating DESC, name",
        MENTOR_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list mentors")?;

    Ok(rows.iter().map(row_to_mentor_sqlite).collect())
}

async fn get_mentor_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Mentor>> {
    let row = sqlx::query(&format!("SELECT {} FROM mentors WHERE id = ?", MENTOR_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get mentor")?;

    Ok(row.map(|row| row_to_mentor_sqlite(&row)))
}

async fn get_mentor_by_user_sqlite(pool: &SqlitePool, user_id: i64) -> Result<Option<Mentor>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM mentors WHERE user_id = ?",
        MENTOR_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get mentor by user")?;

    Ok(row.map(|row| row_to_mentor_sqlite(&row)))
}

async fn create_mentor_sqlite(pool: &SqlitePool, mentor: &Mentor) -> Result<Mentor> {
    let now = Utc::now();
    let availability =
        serde_json::to_string(&mentor.availability).unwrap_or_else(|_| "{}".to_string());

    let result = sqlx::query(
        r#"
        INSERT INTO mentors (user_id, name, title, bio, expertise, hourly_rate, currency,
                             rating, review_count, badges, languages, availability, image_url,
                             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(mentor.user_id)
    .bind(&mentor.name)
    .bind(&mentor.title)
    .bind(&mentor.bio)
    .bind(json_list(&mentor.expertise))
    .bind(mentor.hourly_rate)
    .bind(&mentor.currency)
    .bind(mentor.rating)
    .bind(mentor.review_count)
    .bind(json_list(&mentor.badges))
    .bind(json_list(&mentor.languages))
    .bind(availability)
    .bind(&mentor.image_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create mentor")?;

    Ok(Mentor {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..mentor.clone()
    })
}

async fn set_rating_sqlite(
    pool: &SqlitePool,
    id: i64,
    rating: f64,
    review_count: i64,
) -> Result<()> {
    sqlx::query("UPDATE mentors SET rating = ?, review_count = ?, updated_at = ? WHERE id = ?")
        .bind(rating)
        .bind(review_count)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update mentor rating")?;

    Ok(())
}

fn row_to_mentor_sqlite(row: &sqlx::sqlite::SqliteRow) -> Mentor {
    Mentor {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        title: row.get("title"),
        bio: row.get("bio"),
        expertise: parse_json_list(row.get("expertise")),
        hourly_rate: row.get("hourly_rate"),
        currency: row.get("currency"),
        rating: row.get("rating"),
        review_count: row.get("review_count"),
        badges: parse_json_list(row.get("badges")),
        languages: parse_json_list(row.get("languages")),
        availability: parse_availability(row.get("availability")),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn list_mentors_postgres(pool: &PgPool) -> Result<Vec<Mentor>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM mentors ORDER BY rating DESC, name",
        MENTOR_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list mentors")?;

    Ok(rows.iter().map(row_to_mentor_postgres).collect())
}

async fn get_mentor_by_id_postgres(pool: &PgPool, id: i64) -> Result<Option<Mentor>> {
    let row = sqlx::query(&format!("SELECT {} FROM mentors WHERE id = $1", MENTOR_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get mentor")?;

    Ok(row.map(|row| row_to_mentor_postgres(&row)))
}

async fn get_mentor_by_user_postgres(pool: &PgPool, user_id: i64) -> Result<Option<Mentor>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM mentors WHERE user_id = $1",
        MENTOR_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get mentor by user")?;

    Ok(row.map(|row| row_to_mentor_postgres(&row)))
}

async fn create_mentor_postgres(pool: &PgPool, mentor: &Mentor) -> Result<Mentor> {
    let now = Utc::now();
    let availability =
        serde_json::to_string(&mentor.availability).unwrap_or_else(|_| "{}".to_string());

    let row = sqlx::query(
        r#"
        INSERT INTO mentors (user_id, name, title, bio, expertise, hourly_rate, currency,
                             rating, review_count, badges, languages, availability, image_url,
                             created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING id
        "#,
    )
    .bind(mentor.user_id)
    .bind(&mentor.name)
    .bind(&mentor.title)
    .bind(&mentor.bio)
    .bind(json_list(&mentor.expertise))
    .bind(mentor.hourly_rate)
    .bind(&mentor.currency)
    .bind(mentor.rating)
    .bind(mentor.review_count)
    .bind(json_list(&mentor.badges))
    .bind(json_list(&mentor.languages))
    .bind(availability)
    .bind(&mentor.image_url)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create mentor")?;

    Ok(Mentor {
        id: row.get("id"),
        created_at: now,
        updated_at: now,
        ..mentor.clone()
    })
}

async fn set_rating_postgres(pool: &PgPool, id: i64, rating: f64, review_count: i64) -> Result<()> {
    sqlx::query("UPDATE mentors SET rating = $1, review_count = $2, updated_at = $3 WHERE id = $4")
        .bind(rating)
        .bind(review_count)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update mentor rating")?;

    Ok(())
}

fn row_to_mentor_postgres(row: &sqlx::postgres::PgRow) -> Mentor {
    Mentor {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        title: row.get("title"),
        bio: row.get("bio"),
        expertise: parse_json_list(row.get("expertise")),
        hourly_rate: row.get("hourly_rate"),
        currency: row.get("currency"),
        rating: row.get("rating"),
        review_count: row.get("review_count"),
        badges: parse_json_list(row.get("badges")),
        languages: parse_json_list(row.get("languages")),
        availability: parse_availability(row.get("availability")),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{User, UserRole};
    use std::collections::BTreeMap;

    async fn setup() -> (SqlxMentorRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new(
                "mentor@example.com".to_string(),
                "hash".to_string(),
                UserRole::Abroad,
            ))
            .await
            .expect("Failed to create user");

        (SqlxMentorRepository::new(pool), user.id)
    }

    fn make_mentor(user_id: i64, name: &str) -> Mentor {
        let mut days = BTreeMap::new();
        days.insert("monday".to_string(), vec!["09:00".to_string(), "14:00".to_string()]);

        Mentor {
            id: 0,
            user_id,
            name: name.to_string(),
            title: "Software Engineer".to_string(),
            bio: "Full-stack engineer, five years in".to_string(),
            expertise: vec!["React".to_string(), "Rust".to_string()],
            hourly_rate: 45.0,
            currency: "USD".to_string(),
            rating: 0.0,
            review_count: 0,
            badges: vec![],
            languages: vec!["English".to_string()],
            availability: Availability(days),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trips_json_fields() {
        let (repo, user_id) = setup().await;

        let created = repo
            .create(&make_mentor(user_id, "Akhil"))
            .await
            .expect("Failed to create mentor");
        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get mentor")
            .expect("Mentor not found");

        assert_eq!(found.expertise, vec!["React", "Rust"]);
        assert_eq!(found.languages, vec!["English"]);
        assert!(found.availability.offers("monday", "14:00"));
        assert_eq!(found.hourly_rate, 45.0);
    }

    #[tokio::test]
    async fn test_get_by_user() {
        let (repo, user_id) = setup().await;
        repo.create(&make_mentor(user_id, "Akhil")).await.unwrap();

        let found = repo
            .get_by_user(user_id)
            .await
            .expect("Failed to get by user")
            .expect("Mentor not found");
        assert_eq!(found.user_id, user_id);

        assert!(repo.get_by_user(user_id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_one_mentor_row_per_user() {
        let (repo, user_id) = setup().await;
        repo.create(&make_mentor(user_id, "Akhil")).await.unwrap();

        let duplicate = repo.create(&make_mentor(user_id, "Akhil again")).await;
        assert!(duplicate.is_err(), "user_id is unique across mentors");
    }

    #[tokio::test]
    async fn test_set_rating() {
        let (repo, user_id) = setup().await;
        let mentor = repo.create(&make_mentor(user_id, "Akhil")).await.unwrap();

        repo.set_rating(mentor.id, 4.5, 2)
            .await
            .expect("Failed to set rating");

        let found = repo.get_by_id(mentor.id).await.unwrap().unwrap();
        assert_eq!(found.rating, 4.5);
        assert_eq!(found.review_count, 2);
    }
}
