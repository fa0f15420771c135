//! Housing listing repository
//!
//! Database operations for housing listings. The list endpoint loads the
//! whole table, newest first; filtering happens in memory afterwards.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{HousingListing, Location};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Housing repository trait
#[async_trait]
pub trait HousingRepository: Send + Sync {
    /// List all housing listings, newest first
    async fn list(&self) -> Result<Vec<HousingListing>>;

    /// Get a listing by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<HousingListing>>;

    /// Create a listing
    async fn create(&self, listing: &HousingListing) -> Result<HousingListing>;

    /// Update a listing
    async fn update(&self, listing: &HousingListing) -> Result<HousingListing>;

    /// Delete a listing
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based housing repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxHousingRepository {
    pool: DynDatabasePool,
}

impl SqlxHousingRepository {
    /// Create a new SQLx housing repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn HousingRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl HousingRepository for SqlxHousingRepository {
    async fn list(&self) -> Result<Vec<HousingListing>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_housing_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Postgres => {
                list_housing_postgres(self.pool.as_postgres().unwrap()).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<HousingListing>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_housing_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Postgres => {
                get_housing_by_id_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }

    async fn create(&self, listing: &HousingListing) -> Result<HousingListing> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_housing_sqlite(self.pool.as_sqlite().unwrap(), listing).await
            }
            DatabaseDriver::Postgres => {
                create_housing_postgres(self.pool.as_postgres().unwrap(), listing).await
            }
        }
    }

    async fn update(&self, listing: &HousingListing) -> Result<HousingListing> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_housing_sqlite(self.pool.as_sqlite().unwrap(), listing).await
            }
            DatabaseDriver::Postgres => {
                update_housing_postgres(self.pool.as_postgres().unwrap(), listing).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_housing_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Postgres => {
                delete_housing_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }
}

const HOUSING_COLUMNS: &str = "id, user_id, title, description, price, location, available_from, \
     available_until, contact_email, contact_phone, created_at, updated_at";

fn location_column(location: &Option<Location>) -> Option<String> {
    location.as_ref().map(|l| l.to_storage())
}

fn parse_location(value: Option<String>) -> Option<Location> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| Location::from_str(&s).unwrap())
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn list_housing_sqlite(pool: &SqlitePool) -> Result<Vec<HousingListing>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM housing ORDER BY created_at DESC",
        HOUSING_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list housing listings")?;

    Ok(rows.iter().map(row_to_housing_sqlite).collect())
}

async fn get_housing_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<HousingListing>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM housing WHERE id = ?",
        HOUSING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get housing listing")?;

    Ok(row.map(|row| row_to_housing_sqlite(&row)))
}

async fn create_housing_sqlite(
    pool: &SqlitePool,
    listing: &HousingListing,
) -> Result<HousingListing> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO housing (user_id, title, description, price, location, available_from,
                             available_until, contact_email, contact_phone, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(listing.user_id)
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(location_column(&listing.location))
    .bind(listing.available_from)
    .bind(listing.available_until)
    .bind(&listing.contact_email)
    .bind(&listing.contact_phone)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create housing listing")?;

    Ok(HousingListing {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..listing.clone()
    })
}

async fn update_housing_sqlite(
    pool: &SqlitePool,
    listing: &HousingListing,
) -> Result<HousingListing> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE housing
        SET title = ?, description = ?, price = ?, location = ?, available_from = ?,
            available_until = ?, contact_email = ?, contact_phone = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(location_column(&listing.location))
    .bind(listing.available_from)
    .bind(listing.available_until)
    .bind(&listing.contact_email)
    .bind(&listing.contact_phone)
    .bind(now)
    .bind(listing.id)
    .execute(pool)
    .await
    .context("Failed to update housing listing")?;

    get_housing_by_id_sqlite(pool, listing.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Housing listing not found after update"))
}

async fn delete_housing_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM housing WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete housing listing")?;

    Ok(())
}

fn row_to_housing_sqlite(row: &sqlx::sqlite::SqliteRow) -> HousingListing {
    HousingListing {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        location: parse_location(row.get("location")),
        available_from: row.get("available_from"),
        available_until: row.get("available_until"),
        contact_email: row.get("contact_email"),
        contact_phone: row.get("contact_phone"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn list_housing_postgres(pool: &PgPool) -> Result<Vec<HousingListing>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM housing ORDER BY created_at DESC",
        HOUSING_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list housing listings")?;

    Ok(rows.iter().map(row_to_housing_postgres).collect())
}

async fn get_housing_by_id_postgres(pool: &PgPool, id: i64) -> Result<Option<HousingListing>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM housing WHERE id = $1",
        HOUSING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get housing listing")?;

    Ok(row.map(|row| row_to_housing_postgres(&row)))
}

async fn create_housing_postgres(
    pool: &PgPool,
    listing: &HousingListing,
) -> Result<HousingListing> {
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO housing (user_id, title, description, price, location, available_from,
                             available_until, contact_email, contact_phone, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(listing.user_id)
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(location_column(&listing.location))
    .bind(listing.available_from)
    .bind(listing.available_until)
    .bind(&listing.contact_email)
    .bind(&listing.contact_phone)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create housing listing")?;

    Ok(HousingListing {
        id: row.get("id"),
        created_at: now,
        updated_at: now,
        ..listing.clone()
    })
}

async fn update_housing_postgres(
    pool: &PgPool,
    listing: &HousingListing,
) -> Result<HousingListing> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE housing
        SET title = $1, description = $2, price = $3, location = $4, available_from = $5,
            available_until = $6, contact_email = $7, contact_phone = $8, updated_at = $9
        WHERE id = $10
        "#,
    )
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(location_column(&listing.location))
    .bind(listing.available_from)
    .bind(listing.available_until)
    .bind(&listing.contact_email)
    .bind(&listing.contact_phone)
    .bind(now)
    .bind(listing.id)
    .execute(pool)
    .await
    .context("Failed to update housing listing")?;

    get_housing_by_id_postgres(pool, listing.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Housing listing not found after update"))
}

async fn delete_housing_postgres(pool: &PgPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM housing WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete housing listing")?;

    Ok(())
}

fn row_to_housing_postgres(row: &sqlx::postgres::PgRow) -> HousingListing {
    HousingListing {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get("price"),
        location: parse_location(row.get("location")),
        available_from: row.get("available_from"),
        available_until: row.get("available_until"),
        contact_email: row.get("contact_email"),
        contact_phone: row.get("contact_phone"),
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
    use chrono::NaiveDate;

    async fn setup() -> (SqlxHousingRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new(
                "landlord@example.com".to_string(),
                "hash".to_string(),
                UserRole::Abroad,
            ))
            .await
            .expect("Failed to create user");

        (SqlxHousingRepository::new(pool), user.id)
    }

    fn make_listing(user_id: i64, title: &str, price: f64) -> HousingListing {
        HousingListing {
            id: 0,
            user_id,
            title: title.to_string(),
            description: "Bright room near campus".to_string(),
            price,
            location: Some(Location::Text("Palo Alto, CA".to_string())),
            available_from: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            available_until: None,
            contact_email: Some("landlord@example.com".to_string()),
            contact_phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (repo, user_id) = setup().await;

        let created = repo
            .create(&make_listing(user_id, "Cozy studio", 750.0))
            .await
            .expect("Failed to create listing");
        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get listing")
            .expect("Listing not found");
        assert_eq!(found.title, "Cozy studio");
        assert_eq!(found.price, 750.0);
        assert_eq!(found.location, Some(Location::Text("Palo Alto, CA".to_string())));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (repo, user_id) = setup().await;

        repo.create(&make_listing(user_id, "First", 500.0)).await.unwrap();
        repo.create(&make_listing(user_id, "Second", 600.0)).await.unwrap();

        let listings = repo.list().await.expect("Failed to list");
        assert_eq!(listings.len(), 2);
        // Same-timestamp rows may tie; both must be present
        let titles: Vec<&str> = listings.iter().map(|l| l.title.as_str()).collect();
        assert!(titles.contains(&"First"));
        assert!(titles.contains(&"Second"));
    }

    #[tokio::test]
    async fn test_update() {
        let (repo, user_id) = setup().await;
        let mut listing = repo
            .create(&make_listing(user_id, "Old title", 500.0))
            .await
            .unwrap();

        listing.title = "New title".to_string();
        listing.price = 550.0;

        let updated = repo.update(&listing).await.expect("Failed to update");
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.price, 550.0);
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, user_id) = setup().await;
        let listing = repo
            .create(&make_listing(user_id, "Doomed", 500.0))
            .await
            .unwrap();

        repo.delete(listing.id).await.expect("Failed to delete");

        assert!(repo.get_by_id(listing.id).await.unwrap().is_none());
    }
}
