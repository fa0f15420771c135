//! Profile repository
//!
//! Database operations for user profiles. Locations are stored in their
//! string form (`"lat,lng"` or freeform text) and parsed back on read.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Location, Profile};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Profile repository trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create a profile row
    async fn create(&self, profile: &Profile) -> Result<Profile>;

    /// Get the profile belonging to a user
    async fn get_by_user(&self, user_id: i64) -> Result<Option<Profile>>;

    /// Update a profile
    async fn update(&self, profile: &Profile) -> Result<Profile>;

    /// List profiles that have a location set (the community directory)
    async fn list_located(&self) -> Result<Vec<Profile>>;
}

/// SQLx-based profile repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxProfileRepository {
    pool: DynDatabasePool,
}

impl SqlxProfileRepository {
    /// Create a new SQLx profile repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ProfileRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<Profile> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_profile_sqlite(self.pool.as_sqlite().unwrap(), profile).await
            }
            DatabaseDriver::Postgres => {
                create_profile_postgres(self.pool.as_postgres().unwrap(), profile).await
            }
        }
    }

    async fn get_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_profile_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Postgres => {
                get_profile_postgres(self.pool.as_postgres().unwrap(), user_id).await
            }
        }
    }

    async fn update(&self, profile: &Profile) -> Result<Profile> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_profile_sqlite(self.pool.as_sqlite().unwrap(), profile).await
            }
            DatabaseDriver::Postgres => {
                update_profile_postgres(self.pool.as_postgres().unwrap(), profile).await
            }
        }
    }

    async fn list_located(&self) -> Result<Vec<Profile>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_located_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Postgres => {
                list_located_postgres(self.pool.as_postgres().unwrap()).await
            }
        }
    }
}

const PROFILE_COLUMNS: &str =
    "user_id, name, university, field_of_study, bio, image_url, location, created_at, updated_at";

fn location_to_column(location: &Option<Location>) -> Option<String> {
    location.as_ref().map(|l| l.to_storage())
}

fn location_from_column(value: Option<String>) -> Option<Location> {
    // Location parsing is infallible; empty strings stay unset
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| Location::from_str(&s).unwrap())
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_profile_sqlite(pool: &SqlitePool, profile: &Profile) -> Result<Profile> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, name, university, field_of_study, bio, image_url, location, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(profile.user_id)
    .bind(&profile.name)
    .bind(&profile.university)
    .bind(&profile.field_of_study)
    .bind(&profile.bio)
    .bind(&profile.image_url)
    .bind(location_to_column(&profile.location))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create profile")?;

    Ok(Profile {
        created_at: now,
        updated_at: now,
        ..profile.clone()
    })
}

async fn get_profile_sqlite(pool: &SqlitePool, user_id: i64) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM profiles WHERE user_id = ?",
        PROFILE_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get profile")?;

    Ok(row.map(|row| row_to_profile_sqlite(&row)))
}

async fn update_profile_sqlite(pool: &SqlitePool, profile: &Profile) -> Result<Profile> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE profiles
        SET name = ?, university = ?, field_of_study = ?, bio = ?, image_url = ?, location = ?, updated_at = ?
        WHERE user_id = ?
        "#,
    )
    .bind(&profile.name)
    .bind(&profile.university)
    .bind(&profile.field_of_study)
    .bind(&profile.bio)
    .bind(&profile.image_url)
    .bind(location_to_column(&profile.location))
    .bind(now)
    .bind(profile.user_id)
    .execute(pool)
    .await
    .context("Failed to update profile")?;

    get_profile_sqlite(pool, profile.user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Profile not found after update"))
}

async fn list_located_sqlite(pool: &SqlitePool) -> Result<Vec<Profile>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM profiles WHERE location IS NOT NULL ORDER BY name",
        PROFILE_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list located profiles")?;

    Ok(rows.iter().map(row_to_profile_sqlite).collect())
}

fn row_to_profile_sqlite(row: &sqlx::sqlite::SqliteRow) -> Profile {
    Profile {
        user_id: row.get("user_id"),
        name: row.get("name"),
        university: row.get("university"),
        field_of_study: row.get("field_of_study"),
        bio: row.get("bio"),
        image_url: row.get("image_url"),
        location: location_from_column(row.get("location")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn create_profile_postgres(pool: &PgPool, profile: &Profile) -> Result<Profile> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, name, university, field_of_study, bio, image_url, location, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(profile.user_id)
    .bind(&profile.name)
    .bind(&profile.university)
    .bind(&profile.field_of_study)
    .bind(&profile.bio)
    .bind(&profile.image_url)
    .bind(location_to_column(&profile.location))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create profile")?;

    Ok(Profile {
        created_at: now,
        updated_at: now,
        ..profile.clone()
    })
}

async fn get_profile_postgres(pool: &PgPool, user_id: i64) -> Result<Option<Profile>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM profiles WHERE user_id = $1",
        PROFILE_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get profile")?;

    Ok(row.map(|row| row_to_profile_postgres(&row)))
}

async fn update_profile_postgres(pool: &PgPool, profile: &Profile) -> Result<Profile> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE profiles
        SET name = $1, university = $2, field_of_study = $3, bio = $4, image_url = $5, location = $6, updated_at = $7
        WHERE user_id = $8
        "#,
    )
    .bind(&profile.name)
    .bind(&profile.university)
    .bind(&profile.field_of_study)
    .bind(&profile.bio)
    .bind(&profile.image_url)
    .bind(location_to_column(&profile.location))
    .bind(now)
    .bind(profile.user_id)
    .execute(pool)
    .await
    .context("Failed to update profile")?;

    get_profile_postgres(pool, profile.user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Profile not found after update"))
}

async fn list_located_postgres(pool: &PgPool) -> Result<Vec<Profile>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM profiles WHERE location IS NOT NULL ORDER BY name",
        PROFILE_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list located profiles")?;

    Ok(rows.iter().map(row_to_profile_postgres).collect())
}

fn row_to_profile_postgres(row: &sqlx::postgres::PgRow) -> Profile {
    Profile {
        user_id: row.get("user_id"),
        name: row.get("name"),
        university: row.get("university"),
        field_of_study: row.get("field_of_study"),
        bio: row.get("bio"),
        image_url: row.get("image_url"),
        location: location_from_column(row.get("location")),
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

    async fn setup() -> (DynDatabasePool, SqlxProfileRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new(
                "profile@example.com".to_string(),
                "hash".to_string(),
                UserRole::Planning,
            ))
            .await
            .expect("Failed to create user");

        let repo = SqlxProfileRepository::new(pool.clone());
        (pool, repo, user.id)
    }

    #[tokio::test]
    async fn test_create_and_get_profile() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&Profile::empty(user_id))
            .await
            .expect("Failed to create profile");
        assert_eq!(created.user_id, user_id);

        let found = repo
            .get_by_user(user_id)
            .await
            .expect("Failed to get profile")
            .expect("Profile not found");
        assert!(found.name.is_empty());
        assert!(found.location.is_none());
    }

    #[tokio::test]
    async fn test_update_profile_with_coordinates() {
        let (_pool, repo, user_id) = setup().await;
        repo.create(&Profile::empty(user_id)).await.unwrap();

        let mut profile = repo.get_by_user(user_id).await.unwrap().unwrap();
        profile.name = "Ada".to_string();
        profile.university = "Stanford University".to_string();
        profile.location = Some(Location::Coordinates { lat: 37.42, lng: -122.16 });

        let updated = repo.update(&profile).await.expect("Failed to update profile");

        assert_eq!(updated.name, "Ada");
        assert_eq!(
            updated.location,
            Some(Location::Coordinates { lat: 37.42, lng: -122.16 })
        );
    }

    #[tokio::test]
    async fn test_update_profile_with_text_location() {
        let (_pool, repo, user_id) = setup().await;
        repo.create(&Profile::empty(user_id)).await.unwrap();

        let mut profile = repo.get_by_user(user_id).await.unwrap().unwrap();
        profile.location = Some(Location::Text("Berlin, Germany".to_string()));
        let updated = repo.update(&profile).await.unwrap();

        assert_eq!(updated.location, Some(Location::Text("Berlin, Germany".to_string())));
    }

    #[tokio::test]
    async fn test_list_located_skips_unlocated() {
        let (pool, repo, user_id) = setup().await;
        repo.create(&Profile::empty(user_id)).await.unwrap();

        let users = SqlxUserRepository::new(pool.clone());
        let other = users
            .create(&User::new(
                "located@example.com".to_string(),
                "hash".to_string(),
                UserRole::Abroad,
            ))
            .await
            .unwrap();
        let mut located = Profile::empty(other.id);
        located.name = "Grace".to_string();
        located.location = Some(Location::Coordinates { lat: 52.2, lng: 0.12 });
        repo.create(&located).await.unwrap();

        let result = repo.list_located().await.expect("Failed to list");

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Grace");
    }
}
