//! Profile service
//!
//! Business logic for the profile editor: reading and updating the current
//! user's profile and replacing their profile image.

use crate::db::repositories::ProfileRepository;
use crate::models::{Profile, UpdateProfileInput};
use crate::services::storage::{ImageStorage, StorageError};
use anyhow::Context;
use std::sync::Arc;

/// Error types for profile operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    /// Profile row missing (should only happen for accounts created
    /// before the implicit-profile sign-up flow)
    #[error("Profile not found")]
    NotFound,

    /// Image upload rejected
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Profile service
pub struct ProfileService {
    profile_repo: Arc<dyn ProfileRepository>,
    storage: Arc<ImageStorage>,
}

impl ProfileService {
    /// Create a new profile service
    pub fn new(profile_repo: Arc<dyn ProfileRepository>, storage: Arc<ImageStorage>) -> Self {
        Self {
            profile_repo,
            storage,
        }
    }

    /// Get a user's profile
    pub async fn get(&self, user_id: i64) -> Result<Profile, ProfileServiceError> {
        self.profile_repo
            .get_by_user(user_id)
            .await
            .context("Failed to load profile")?
            .ok_or(ProfileServiceError::NotFound)
    }

    /// Update the fields present in the input, leaving the rest untouched.
    ///
    /// A missing location means geolocation was unavailable on the client;
    /// the stored location is left as it was, never treated as an error.
    pub async fn update(
        &self,
        user_id: i64,
        input: UpdateProfileInput,
    ) -> Result<Profile, ProfileServiceError> {
        let mut profile = self.get(user_id).await?;

        if let Some(name) = input.name {
            profile.name = name;
        }
        if let Some(university) = input.university {
            profile.university = university;
        }
        if let Some(field_of_study) = input.field_of_study {
            profile.field_of_study = field_of_study;
        }
        if let Some(bio) = input.bio {
            profile.bio = bio;
        }
        if let Some(location) = input.location {
            profile.location = Some(location);
        }

        let updated = self
            .profile_repo
            .update(&profile)
            .await
            .context("Failed to update profile")?;

        Ok(updated)
    }

    /// Replace the user's profile image and record its new URL.
    ///
    /// The previous image is deleted best-effort inside the storage layer;
    /// a failed delete never blocks the new upload.
    pub async fn update_image(
        &self,
        user_id: i64,
        content_type: &str,
        data: &[u8],
    ) -> Result<Profile, ProfileServiceError> {
        let mut profile = self.get(user_id).await?;

        let url = self
            .storage
            .store_profile_image(user_id, content_type, data, profile.image_url.as_deref())
            .await?;

        profile.image_url = Some(url);
        let updated = self
            .profile_repo
            .update(&profile)
            .await
            .context("Failed to record profile image")?;

        Ok(updated)
    }

    /// Profiles with a location set, for the community directory
    pub async fn community(&self) -> Result<Vec<Profile>, ProfileServiceError> {
        let profiles = self
            .profile_repo
            .list_located()
            .await
            .context("Failed to load community profiles")?;

        Ok(profiles)
    }
}
