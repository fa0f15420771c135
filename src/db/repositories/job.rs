//! Job listing repository
//!
//! Database operations for job listings.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{JobListing, JobType, Location};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Job repository trait
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// List all job listings, newest first
    async fn list(&self) -> Result<Vec<JobListing>>;

    /// Get a listing by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<JobListing>>;

    /// Create a listing
    async fn create(&self, listing: &JobListing) -> Result<JobListing>;

    /// Update a listing
    async fn update(&self, listing: &JobListing) -> Result<JobListing>;

    /// Delete a listing
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based job repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxJobRepository {
    pool: DynDatabasePool,
}

impl SqlxJobRepository {
    /// Create a new SQLx job repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn JobRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl JobRepository for SqlxJobRepository {
    async fn list(&self) -> Result<Vec<JobListing>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_jobs_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Postgres => list_jobs_postgres(self.pool.as_postgres().unwrap()).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<JobListing>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_job_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Postgres => {
                get_job_by_id_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }

    async fn create(&self, listing: &JobListing) -> Result<JobListing> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_job_sqlite(self.pool.as_sqlite().unwrap(), listing).await
            }
            DatabaseDriver::Postgres => {
                create_job_postgres(self.pool.as_postgres().unwrap(), listing).await
            }
        }
    }

    async fn update(&self, listing: &JobListing) -> Result<JobListing> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_job_sqlite(self.pool.as_sqlite().unwrap(), listing).await
            }
            DatabaseDriver::Postgres => {
                update_job_postgres(self.pool.as_postgres().unwrap(), listing).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_job_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Postgres => {
                delete_job_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }
}

const JOB_COLUMNS: &str = "id, user_id, title, company, description, salary, job_type, location, \
     contact_email, created_at, updated_at";

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

async fn list_jobs_sqlite(pool: &SqlitePool) -> Result<Vec<JobListing>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM jobs ORDER BY created_at DESC",
        JOB_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list job listings")?;

    rows.iter().map(row_to_job_sqlite).collect()
}

async fn get_job_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<JobListing>> {
    let row = sqlx::query(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get job listing")?;

    match row {
        Some(row) => Ok(Some(row_to_job_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn create_job_sqlite(pool: &SqlitePool, listing: &JobListing) -> Result<JobListing> {
    let now = Utc::now();
    let job_type = listing.job_type.to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO jobs (user_id, title, company, description, salary, job_type, location,
                          contact_email, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(listing.user_id)
    .bind(&listing.title)
    .bind(&listing.company)
    .bind(&listing.description)
    .bind(&listing.salary)
    .bind(&job_type)
    .bind(location_column(&listing.location))
    .bind(&listing.contact_email)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create job listing")?;

    Ok(JobListing {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..listing.clone()
    })
}

async fn update_job_sqlite(pool: &SqlitePool, listing: &JobListing) -> Result<JobListing> {
    let now = Utc::now();
    let job_type = listing.job_type.to_string();

    sqlx::query(
        r#"
        UPDATE jobs
        SET title = ?, company = ?, description = ?, salary = ?, job_type = ?, location = ?,
            contact_email = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&listing.title)
    .bind(&listing.company)
    .bind(&listing.description)
    .bind(&listing.salary)
    .bind(&job_type)
    .bind(location_column(&listing.location))
    .bind(&listing.contact_email)
    .bind(now)
    .bind(listing.id)
    .execute(pool)
    .await
    .context("Failed to update job listing")?;

    get_job_by_id_sqlite(pool, listing.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Job listing not found after update"))
}

async fn delete_job_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete job listing")?;

    Ok(())
}

fn row_to_job_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<JobListing> {
    let job_type_str: String = row.get("job_type");
    let job_type = JobType::from_str(&job_type_str)
        .with_context(|| format!("Invalid job type in database: {}", job_type_str))?;

    Ok(JobListing {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        company: row.get("company"),
        description: row.get("description"),
        salary: row.get("salary"),
        job_type,
        location: parse_location(row.get("location")),
        contact_email: row.get("contact_email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn list_jobs_postgres(pool: &PgPool) -> Result<Vec<JobListing>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM jobs ORDER BY created_at DESC",
        JOB_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list job listings")?;

    rows.iter().map(row_to_job_postgres).collect()
}

async fn get_job_by_id_postgres(pool: &PgPool, id: i64) -> Result<Option<JobListing>> {
    let row = sqlx::query(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get job listing")?;

    match row {
        Some(row) => Ok(Some(row_to_job_postgres(&row)?)),
        None => Ok(None),
    }
}

async fn create_job_postgres(pool: &PgPool, listing: &JobListing) -> Result<JobListing> {
    let now = Utc::now();
    let job_type = listing.job_type.to_string();

    let row = sqlx::query(
        r#"
        INSERT INTO jobs (user_id, title, company, description, salary, job_type, location,
                          contact_email, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
        "#,
    )
    .bind(listing.user_id)
    .bind(&listing.title)
    .bind(&listing.company)
    .bind(&listing.description)
    .bind(&listing.salary)
    .bind(&job_type)
    .bind(location_column(&listing.location))
    .bind(&listing.contact_email)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create job listing")?;

    Ok(JobListing {
        id: row.get("id"),
        created_at: now,
        updated_at: now,
        ..listing.clone()
    })
}

async fn update_job_postgres(pool: &PgPool, listing: &JobListing) -> Result<JobListing> {
    let now = Utc::now();
    let job_type = listing.job_type.to_string();

    sqlx::query(
        r#"
        UPDATE jobs
        SET title = $1, company = $2, description = $3, salary = $4, job_type = $5, location = $6,
            contact_email = $7, updated_at = $8
        WHERE id = $9
        "#,
    )
    .bind(&listing.title)
    .bind(&listing.company)
    .bind(&listing.description)
    .bind(&listing.salary)
    .bind(&job_type)
    .bind(location_column(&listing.location))
    .bind(&listing.contact_email)
    .bind(now)
    .bind(listing.id)
    .execute(pool)
    .await
    .context("Failed to update job listing")?;

    get_job_by_id_postgres(pool, listing.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Job listing not found after update"))
}

async fn delete_job_postgres(pool: &PgPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete job listing")?;

    Ok(())
}

fn row_to_job_postgres(row: &sqlx::postgres::PgRow) -> Result<JobListing> {
    let job_type_str: String = row.get("job_type");
    let job_type = JobType::from_str(&job_type_str)
        .with_context(|| format!("Invalid job type in database: {}", job_type_str))?;

    Ok(JobListing {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        company: row.get("company"),
        description: row.get("description"),
        salary: row.get("salary"),
        job_type,
        location: parse_location(row.get("location")),
        contact_email: row.get("contact_email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{User, UserRole};

    async fn setup() -> (SqlxJobRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let user = users
            .create(&User::new(
                "poster@example.com".to_string(),
                "hash".to_string(),
                UserRole::Abroad,
            ))
            .await
            .expect("Failed to create user");

        (SqlxJobRepository::new(pool), user.id)
    }

    fn make_job(user_id: i64, title: &str) -> JobListing {
        JobListing {
            id: 0,
            user_id,
            title: title.to_string(),
            company: "Acme Corp".to_string(),
            description: "Campus ambassador role".to_string(),
            salary: "$20/hour".to_string(),
            job_type: JobType::PartTime,
            location: Some(Location::Text("Remote".to_string())),
            contact_email: Some("jobs@acme.example".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (repo, user_id) = setup().await;

        let created = repo
            .create(&make_job(user_id, "Campus ambassador"))
            .await
            .expect("Failed to create job");
        assert!(created.id > 0);

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get job")
            .expect("Job not found");
        assert_eq!(found.company, "Acme Corp");
        assert_eq!(found.job_type, JobType::PartTime);
    }

    #[tokio::test]
    async fn test_update_changes_job_type() {
        let (repo, user_id) = setup().await;
        let mut job = repo.create(&make_job(user_id, "Intern")).await.unwrap();

        job.job_type = JobType::Internship;
        job.salary = "$3000/month".to_string();

        let updated = repo.update(&job).await.expect("Failed to update");
        assert_eq!(updated.job_type, JobType::Internship);
        assert_eq!(updated.salary, "$3000/month");
    }

    #[tokio::test]
    async fn test_delete() {
        let (repo, user_id) = setup().await;
        let job = repo.create(&make_job(user_id, "Doomed")).await.unwrap();

        repo.delete(job.id).await.expect("Failed to delete");

        assert!(repo.get_by_id(job.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
