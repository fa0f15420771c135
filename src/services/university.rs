//! University directory service
//!
//! Read-only access to the seeded university directory and its students,
//! with the same inline search policy the other directories use:
//! case-insensitive substring match, empty criteria pass through.

use crate::db::repositories::UniversityRepository;
use crate::models::{Student, StudentStatus, University};
use anyhow::Context;
use std::sync::Arc;

/// Filter criteria for the student directory
#[derive(Debug, Clone, Default)]
pub struct StudentFilters {
    /// Search across name, roll number and course
    pub search: Option<String>,
    pub degree: Option<String>,
    pub batch_year: Option<i32>,
    pub status: Option<StudentStatus>,
}

/// Error types for directory operations
#[derive(Debug, thiserror::Error)]
pub enum UniversityServiceError {
    /// University does not exist
    #[error("University not found")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// University directory service
pub struct UniversityService {
    repo: Arc<dyn UniversityRepository>,
}

impl UniversityService {
    /// Create a new university service
    pub fn new(repo: Arc<dyn UniversityRepository>) -> Self {
        Self { repo }
    }

    /// List universities, optionally narrowed by a search term over name
    /// and location.
    pub async fn list(&self, search: &str) -> Result<Vec<University>, UniversityServiceError> {
        let universities = self
            .repo
            .list()
            .await
            .context("Failed to load universities")?;

        if search.is_empty() {
            return Ok(universities);
        }

        let needle = search.to_lowercase();
        Ok(universities
            .into_iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.location.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Get a university by ID
    pub async fn get(&self, id: i64) -> Result<University, UniversityServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to load university")?
            .ok_or(UniversityServiceError::NotFound)
    }

    /// List a university's students with the directory filters applied
    pub async fn students(
        &self,
        university_id: i64,
        filters: &StudentFilters,
    ) -> Result<Vec<Student>, UniversityServiceError> {
        // 404 on unknown university rather than an empty student list
        self.get(university_id).await?;

        let students = self
            .repo
            .list_students(university_id)
            .await
            .context("Failed to load students")?;

        let needle = filters.search.as_deref().unwrap_or("").to_lowercase();

        Ok(students
            .into_iter()
            .filter(|s| {
                let search_match = needle.is_empty()
                    || s.name.to_lowercase().contains(&needle)
                    || s.roll_number.to_lowercase().contains(&needle)
                    || s.course.to_lowercase().contains(&needle);

                let degree_match = filters
                    .degree
                    .as_deref()
                    .map_or(true, |d| s.degree.eq_ignore_ascii_case(d));

                let year_match = filters.batch_year.map_or(true, |y| s.batch_year == y);

                let status_match = filters.status.map_or(true, |st| s.status == st);

                search_match && degree_match && year_match && status_match
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxUniversityRepository;
    use crate::db::{create_test_pool, migrations, DynDatabasePool};
    use sqlx::Row;

    async fn setup() -> (DynDatabasePool, UniversityService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let service = UniversityService::new(SqlxUniversityRepository::boxed(pool.clone()));
        (pool, service)
    }

    async fn seed_student(
        pool: &DynDatabasePool,
        university_id: i64,
        name: &str,
        degree: &str,
        batch_year: i32,
        status: &str,
    ) {
        sqlx::query(
            "INSERT INTO university_students (university_id, name, roll_number, degree, batch_year, course, status)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(university_id)
        .bind(name)
        .bind(format!("R-{}", name))
        .bind(degree)
        .bind(batch_year)
        .bind("Computer Science")
        .bind(status)
        .execute(pool.as_sqlite().unwrap())
        .await
        .expect("Failed to seed student");
    }

    async fn first_university_id(pool: &DynDatabasePool) -> i64 {
        let row = sqlx::query("SELECT id FROM universities ORDER BY id LIMIT 1")
            .fetch_one(pool.as_sqlite().unwrap())
            .await
            .unwrap();
        row.get("id")
    }

    #[tokio::test]
    async fn test_list_search_by_location() {
        let (_pool, service) = setup().await;

        let uk = service.list("uk").await.expect("Failed to list");

        assert_eq!(uk.len(), 2);
        assert!(uk.iter().all(|u| u.location.contains("UK")));
    }

    #[tokio::test]
    async fn test_students_filters() {
        let (pool, service) = setup().await;
        let uni = first_university_id(&pool).await;

        seed_student(&pool, uni, "Asha", "BSc", 2024, "current").await;
        seed_student(&pool, uni, "Ben", "MSc", 2022, "passed").await;
        seed_student(&pool, uni, "Chiara", "BSc", 2022, "current").await;

        let all = service.students(uni, &StudentFilters::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let bsc_2022 = service
            .students(
                uni,
                &StudentFilters {
                    degree: Some("bsc".to_string()),
                    batch_year: Some(2022),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(bsc_2022.len(), 1);
        assert_eq!(bsc_2022[0].name, "Chiara");

        let passed = service
            .students(
                uni,
                &StudentFilters {
                    status: Some(StudentStatus::Passed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(passed.len(), 1);
        assert_eq!(passed[0].name, "Ben");
    }

    #[tokio::test]
    async fn test_students_search_case_insensitive() {
        let (pool, service) = setup().await;
        let uni = first_university_id(&pool).await;
        seed_student(&pool, uni, "Asha", "BSc", 2024, "current").await;

        let found = service
            .students(
                uni,
                &StudentFilters {
                    search: Some("ASHA".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_students_of_unknown_university() {
        let (_pool, service) = setup().await;

        let result = service.students(9999, &StudentFilters::default()).await;
        assert!(matches!(result, Err(UniversityServiceError::NotFound)));
    }
}
