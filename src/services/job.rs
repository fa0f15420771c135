//! Job listing service
//!
//! Business logic for job listings, mirroring the housing flow: full-table
//! load with in-memory filtering, owner-checked mutations.

use crate::db::repositories::JobRepository;
use crate::models::{CreateJobInput, JobListing, UpdateJobInput, User};
use crate::services::filters::{filter_job_listings, JobFilters};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for job listing operations
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    /// Listing does not exist
    #[error("Job listing not found")]
    NotFound,

    /// Caller does not own the listing
    #[error("Only the listing owner may do that")]
    Forbidden,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Job listing service
pub struct JobService {
    repo: Arc<dyn JobRepository>,
}

impl JobService {
    /// Create a new job service
    pub fn new(repo: Arc<dyn JobRepository>) -> Self {
        Self { repo }
    }

    /// Load every listing and apply the search and filter criteria to the
    /// loaded collection.
    pub async fn list(
        &self,
        search_term: &str,
        filters: &JobFilters,
    ) -> Result<Vec<JobListing>, JobServiceError> {
        let listings = self.repo.list().await.context("Failed to load job listings")?;

        Ok(filter_job_listings(&listings, search_term, filters))
    }

    /// Create a listing owned by the given user
    pub async fn create(
        &self,
        user: &User,
        input: CreateJobInput,
    ) -> Result<JobListing, JobServiceError> {
        let now = Utc::now();
        let listing = JobListing {
            id: 0,
            user_id: user.id,
            title: input.title,
            company: input.company,
            description: input.description,
            salary: input.salary,
            job_type: input.job_type,
            location: input.location,
            contact_email: input.contact_email,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&listing)
            .await
            .context("Failed to create job listing")?;

        Ok(created)
    }

    /// Update a listing. Only the owner may update it.
    pub async fn update(
        &self,
        user: &User,
        id: i64,
        input: UpdateJobInput,
    ) -> Result<JobListing, JobServiceError> {
        let mut listing = self.get_owned(user, id).await?;

        if let Some(title) = input.title {
            listing.title = title;
        }
        if let Some(company) = input.company {
            listing.company = company;
        }
        if let Some(description) = input.description {
            listing.description = description;
        }
        if let Some(salary) = input.salary {
            listing.salary = salary;
        }
        if let Some(job_type) = input.job_type {
            listing.job_type = job_type;
        }
        if let Some(location) = input.location {
            listing.location = Some(location);
        }
        if let Some(contact_email) = input.contact_email {
            listing.contact_email = Some(contact_email);
        }

        let updated = self
            .repo
            .update(&listing)
            .await
            .context("Failed to update job listing")?;

        Ok(updated)
    }

    /// Delete a listing. Only the owner may delete it.
    pub async fn delete(&self, user: &User, id: i64) -> Result<(), JobServiceError> {
        self.get_owned(user, id).await?;

        self.repo
            .delete(id)
            .await
            .context("Failed to delete job listing")?;

        Ok(())
    }

    async fn get_owned(&self, user: &User, id: i64) -> Result<JobListing, JobServiceError> {
        let listing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to load job listing")?
            .ok_or(JobServiceError::NotFound)?;

        if !user.owns(listing.user_id) {
            return Err(JobServiceError::Forbidden);
        }

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxJobRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{JobType, UserRole};

    async fn setup() -> (JobService, User, User) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let owner = users
            .create(&User::new("owner@example.com".to_string(), "hash".to_string(), UserRole::Abroad))
            .await
            .unwrap();
        let other = users
            .create(&User::new("other@example.com".to_string(), "hash".to_string(), UserRole::Planning))
            .await
            .unwrap();

        (JobService::new(SqlxJobRepository::boxed(pool)), owner, other)
    }

    fn make_input(title: &str, job_type: JobType, salary: &str) -> CreateJobInput {
        CreateJobInput {
            title: title.to_string(),
            company: "Acme".to_string(),
            description: "Student-friendly role".to_string(),
            salary: salary.to_string(),
            job_type,
            location: None,
            contact_email: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_list_with_type_filter() {
        let (service, owner, _) = setup().await;

        service
            .create(&owner, make_input("Dev", JobType::FullTime, "$60,000"))
            .await
            .unwrap();
        service
            .create(&owner, make_input("Intern", JobType::Internship, "$3,000/month"))
            .await
            .unwrap();

        let filters = JobFilters {
            job_type: Some(JobType::Internship),
            salary_range: None,
        };
        let listings = service.list("", &filters).await.expect("Failed to list");

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Intern");
    }

    #[tokio::test]
    async fn test_non_owner_cannot_mutate() {
        let (service, owner, other) = setup().await;
        let listing = service
            .create(&owner, make_input("Dev", JobType::FullTime, ""))
            .await
            .unwrap();

        let update = service
            .update(&other, listing.id, UpdateJobInput::default())
            .await;
        assert!(matches!(update, Err(JobServiceError::Forbidden)));

        let delete = service.delete(&other, listing.id).await;
        assert!(matches!(delete, Err(JobServiceError::Forbidden)));
    }

    #[tokio::test]
    async fn test_owner_update_and_delete() {
        let (service, owner, _) = setup().await;
        let listing = service
            .create(&owner, make_input("Dev", JobType::FullTime, ""))
            .await
            .unwrap();

        let updated = service
            .update(
                &owner,
                listing.id,
                UpdateJobInput {
                    job_type: Some(JobType::Contract),
                    ..Default::default()
                },
            )
            .await
            .expect("Update failed");
        assert_eq!(updated.job_type, JobType::Contract);

        service.delete(&owner, listing.id).await.expect("Delete failed");
        assert!(service.list("", &JobFilters::default()).await.unwrap().is_empty());
    }
}
