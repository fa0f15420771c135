//! University directory repository
//!
//! Read operations for the seeded university directory and its students.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Student, StudentStatus, University};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// University repository trait
#[async_trait]
pub trait UniversityRepository: Send + Sync {
    /// List all universities in directory order
    async fn list(&self) -> Result<Vec<University>>;

    /// Get a university by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<University>>;

    /// List students of a university
    async fn list_students(&self, university_id: i64) -> Result<Vec<Student>>;
}

/// SQLx-based university repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxUniversityRepository {
    pool: DynDatabasePool,
}

impl SqlxUniversityRepository {
    /// Create a new SQLx university repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UniversityRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UniversityRepository for SqlxUniversityRepository {
    async fn list(&self) -> Result<Vec<University>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_universities_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Postgres => {
                list_universities_postgres(self.pool.as_postgres().unwrap()).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<University>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_university_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Postgres => {
                get_university_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }

    async fn list_students(&self, university_id: i64) -> Result<Vec<Student>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_students_sqlite(self.pool.as_sqlite().unwrap(), university_id).await
            }
            DatabaseDriver::Postgres => {
                list_students_postgres(self.pool.as_postgres().unwrap(), university_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn list_universities_sqlite(pool: &SqlitePool) -> Result<Vec<University>> {
    let rows = sqlx::query(
        "SELECT id, name, location, acceptance_rate, annual_fees, description
         FROM universities ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list universities")?;

    Ok(rows.iter().map(row_to_university_sqlite).collect())
}

async fn get_university_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<University>> {
    let row = sqlx::query(
        "SELECT id, name, location, acceptance_rate, annual_fees, description
         FROM universities WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get university")?;

    Ok(row.map(|row| row_to_university_sqlite(&row)))
}

async fn list_students_sqlite(pool: &SqlitePool, university_id: i64) -> Result<Vec<Student>> {
    let rows = sqlx::query(
        "SELECT id, university_id, name, roll_number, degree, batch_year, course, status, profile_picture
         FROM university_students WHERE university_id = ? ORDER BY batch_year DESC, name",
    )
    .bind(university_id)
    .fetch_all(pool)
    .await
    .context("Failed to list students")?;

    rows.iter().map(row_to_student_sqlite).collect()
}

fn row_to_university_sqlite(row: &sqlx::sqlite::SqliteRow) -> University {
    University {
        id: row.get("id"),
        name: row.get("name"),
        location: row.get("location"),
        acceptance_rate: row.get("acceptance_rate"),
        annual_fees: row.get("annual_fees"),
        description: row.get("description"),
    }
}

fn row_to_student_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Student> {
    let status_str: String = row.get("status");

    Ok(Student {
        id: row.get("id"),
        university_id: row.get("university_id"),
        name: row.get("name"),
        roll_number: row.get("roll_number"),
        degree: row.get("degree"),
        batch_year: row.get("batch_year"),
        course: row.get("course"),
        status: StudentStatus::from_str(&status_str)
            .with_context(|| format!("Invalid student status in database: {}", status_str))?,
        profile_picture: row.get("profile_picture"),
    })
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn list_universities_postgres(pool: &PgPool) -> Result<Vec<University>> {
    let rows = sqlx::query(
        "SELECT id, name, location, acceptance_rate, annual_fees, description
         FROM universities ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list universities")?;

    Ok(rows.iter().map(row_to_university_postgres).collect())
}

async fn get_university_postgres(pool: &PgPool, id: i64) -> Result<Option<University>> {
    let row = sqlx::query(
        "SELECT id, name, location, acceptance_rate, annual_fees, description
         FROM universities WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get university")?;

    Ok(row.map(|row| row_to_university_postgres(&row)))
}

async fn list_students_postgres(pool: &PgPool, university_id: i64) -> Result<Vec<Student>> {
    let rows = sqlx::query(
        "SELECT id, university_id, name, roll_number, degree, batch_year, course, status, profile_picture
         FROM university_students WHERE university_id = $1 ORDER BY batch_year DESC, name",
    )
    .bind(university_id)
    .fetch_all(pool)
    .await
    .context("Failed to list students")?;

    rows.iter().map(row_to_student_postgres).collect()
}

fn row_to_university_postgres(row: &sqlx::postgres::PgRow) -> University {
    University {
        id: row.get("id"),
        name: row.get("name"),
        location: row.get("location"),
        acceptance_rate: row.get("acceptance_rate"),
        annual_fees: row.get("annual_fees"),
        description: row.get("description"),
    }
}

fn row_to_student_postgres(row: &sqlx::postgres::PgRow) -> Result<Student> {
    let status_str: String = row.get("status");

    Ok(Student {
        id: row.get("id"),
        university_id: row.get("university_id"),
        name: row.get("name"),
        roll_number: row.get("roll_number"),
        degree: row.get("degree"),
        batch_year: row.get("batch_year"),
        course: row.get("course"),
        status: StudentStatus::from_str(&status_str)
            .with_context(|| format!("Invalid student status in database: {}", status_str))?,
        profile_picture: row.get("profile_picture"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxUniversityRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUniversityRepository::new(pool)
    }

    #[tokio::test]
    async fn test_list_seeded_directory() {
        let repo = setup().await;

        let universities = repo.list().await.expect("Failed to list universities");

        assert_eq!(universities.len(), 7);
        assert_eq!(universities[0].name, "Stanford University");
        assert_eq!(universities[0].acceptance_rate, 4.3);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = setup().await;
        let universities = repo.list().await.unwrap();

        let found = repo
            .get_by_id(universities[0].id)
            .await
            .expect("Failed to get university")
            .expect("University not found");
        assert_eq!(found.name, universities[0].name);

        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_students_empty_by_default() {
        let repo = setup().await;
        let universities = repo.list().await.unwrap();

        let students = repo
            .list_students(universities[0].id)
            .await
            .expect("Failed to list students");
        assert!(students.is_empty());
    }
}
