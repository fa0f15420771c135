//! Housing listing model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// A housing listing posted by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousingListing {
    pub id: i64,
    /// Owning user; only the owner may edit or delete the listing
    pub user_id: i64,
    pub title: String,
    pub description: String,
    /// Monthly price in the poster's currency
    pub price: f64,
    pub location: Option<Location>,
    pub available_from: NaiveDate,
    pub available_until: Option<NaiveDate>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a housing listing
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHousingInput {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: Option<Location>,
    pub available_from: NaiveDate,
    pub available_until: Option<NaiveDate>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Input for updating a housing listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHousingInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<Location>,
    pub available_from: Option<NaiveDate>,
    pub available_until: Option<NaiveDate>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}
