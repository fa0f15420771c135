//! User model
//!
//! This module defines the User entity for the GlobalNest service. A user is
//! the authentication identity; everything the user shows to other people
//! lives on their `Profile`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User entity representing a registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Email address (unique)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Where the user is in their study-abroad journey
    pub role: UserRole,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this
    /// function. Use `services::password::hash_password()` to hash it.
    pub fn new(email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user owns the given row
    pub fn owns(&self, owner_id: i64) -> bool {
        self.id == owner_id
    }
}

/// Study-abroad stage chosen at sign-up.
///
/// The role only affects which dashboard content is emphasised; it grants
/// no extra permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Planning to study abroad
    #[default]
    Planning,
    /// Already studying abroad
    Abroad,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Planning => write!(f, "planning"),
            UserRole::Abroad => write!(f, "abroad"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" => Ok(UserRole::Planning),
            "abroad" => Ok(UserRole::Abroad),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}
