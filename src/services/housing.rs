//! Housing listing service
//!
//! Business logic for housing listings: loading the full collection and
//! filtering it in memory, plus owner-checked create/update/delete.

use crate::db::repositories::HousingRepository;
use crate::models::{CreateHousingInput, HousingListing, UpdateHousingInput, User};
use crate::services::filters::{filter_housing_listings, HousingFilters};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for housing operations
#[derive(Debug, thiserror::Error)]
pub enum HousingServiceError {
    /// Listing does not exist
    #[error("Housing listing not found")]
    NotFound,

    /// Caller does not own the listing
    #[error("Only the listing owner may do that")]
    Forbidden,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Housing listing service
pub struct HousingService {
    repo: Arc<dyn HousingRepository>,
}

impl HousingService {
    /// Create a new housing service
    pub fn new(repo: Arc<dyn HousingRepository>) -> Self {
        Self { repo }
    }

    /// Load every listing and apply the search and filter criteria to the
    /// loaded collection.
    pub async fn list(
        &self,
        search_term: &str,
        filters: &HousingFilters,
    ) -> Result<Vec<HousingListing>, HousingServiceError> {
        let listings = self
            .repo
            .list()
            .await
            .context("Failed to load housing listings")?;

        Ok(filter_housing_listings(&listings, search_term, filters))
    }

    /// Create a listing owned by the given user
    pub async fn create(
        &self,
        user: &User,
        input: CreateHousingInput,
    ) -> Result<HousingListing, HousingServiceError> {
        let now = Utc::now();
        let listing = HousingListing {
            id: 0,
            user_id: user.id,
            title: input.title,
            description: input.description,
            price: input.price,
            location: input.location,
            available_from: input.available_from,
            available_until: input.available_until,
            contact_email: input.contact_email,
            contact_phone: input.contact_phone,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&listing)
            .await
            .context("Failed to create housing listing")?;

        Ok(created)
    }

    /// Update a listing. Only the owner may update it.
    pub async fn update(
        &self,
        user: &User,
        id: i64,
        input: UpdateHousingInput,
    ) -> Result<HousingListing, HousingServiceError> {
        let mut listing = self.get_owned(user, id).await?;

        if let Some(title) = input.title {
            listing.title = title;
        }
        if let Some(description) = input.description {
            listing.description = description;
        }
        if let Some(price) = input.price {
            listing.price = price;
        }
        if let Some(location) = input.location {
            listing.location = Some(location);
        }
        if let Some(available_from) = input.available_from {
            listing.available_from = available_from;
        }
        if let Some(available_until) = input.available_until {
            listing.available_until = Some(available_until);
        }
        if let Some(contact_email) = input.contact_email {
            listing.contact_email = Some(contact_email);
        }
        if let Some(contact_phone) = input.contact_phone {
            listing.contact_phone = Some(contact_phone);
        }

        let updated = self
            .repo
            .update(&listing)
            .await
            .context("Failed to update housing listing")?;

        Ok(updated)
    }

    /// Delete a listing. Only the owner may delete it.
    pub async fn delete(&self, user: &User, id: i64) -> Result<(), HousingServiceError> {
        self.get_owned(user, id).await?;

        self.repo
            .delete(id)
            .await
            .context("Failed to delete housing listing")?;

        Ok(())
    }

    async fn get_owned(&self, user: &User, id: i64) -> Result<HousingListing, HousingServiceError> {
        let listing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to load housing listing")?
            .ok_or(HousingServiceError::NotFound)?;

        if !user.owns(listing.user_id) {
            return Err(HousingServiceError::Forbidden);
        }

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxHousingRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::UserRole;
    use chrono::NaiveDate;

    async fn setup() -> (HousingService, User, User) {
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

        (
            HousingService::new(SqlxHousingRepository::boxed(pool)),
            owner,
            other,
        )
    }

    fn make_input(title: &str, price: f64) -> CreateHousingInput {
        CreateHousingInput {
            title: title.to_string(),
            description: "Room with a view".to_string(),
            price,
            location: None,
            available_from: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            available_until: None,
            contact_email: None,
            contact_phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (service, owner, _) = setup().await;

        service.create(&owner, make_input("Studio", 700.0)).await.unwrap();

        let listings = service
            .list("", &HousingFilters::default())
            .await
            .expect("Failed to list");
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].user_id, owner.id);
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let (service, owner, _) = setup().await;
        service.create(&owner, make_input("Cheap room", 300.0)).await.unwrap();
        service.create(&owner, make_input("Fancy loft", 1500.0)).await.unwrap();

        let filters = HousingFilters {
            price_range: Some("1000+".to_string()),
            available_from: None,
        };
        let listings = service.list("", &filters).await.unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "Fancy loft");
    }

    #[tokio::test]
    async fn test_owner_can_update() {
        let (service, owner, _) = setup().await;
        let listing = service.create(&owner, make_input("Old", 500.0)).await.unwrap();

        let updated = service
            .update(
                &owner,
                listing.id,
                UpdateHousingInput {
                    title: Some("New".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("Owner update failed");

        assert_eq!(updated.title, "New");
        assert_eq!(updated.price, 500.0);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update() {
        let (service, owner, other) = setup().await;
        let listing = service.create(&owner, make_input("Mine", 500.0)).await.unwrap();

        let result = service
            .update(
                &other,
                listing.id,
                UpdateHousingInput {
                    title: Some("Stolen".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(HousingServiceError::Forbidden)));
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete() {
        let (service, owner, other) = setup().await;
        let listing = service.create(&owner, make_input("Mine", 500.0)).await.unwrap();

        let result = service.delete(&other, listing.id).await;
        assert!(matches!(result, Err(HousingServiceError::Forbidden)));

        // Owner still can
        service.delete(&owner, listing.id).await.expect("Owner delete failed");
        assert!(service.list("", &HousingFilters::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_listing() {
        let (service, owner, _) = setup().await;

        let result = service
            .update(&owner, 9999, UpdateHousingInput::default())
            .await;

        assert!(matches!(result, Err(HousingServiceError::NotFound)));
    }
}
