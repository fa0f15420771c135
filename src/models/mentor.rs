//! Mentor model
//!
//! A mentor is a user profile augmented with bookable-session attributes:
//! hourly rate, expertise tags, weekly availability and the review
//! aggregate maintained by the review flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mentor entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mentor {
    pub id: i64,
    /// The user behind this mentor profile (one mentor row per user)
    pub user_id: i64,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub expertise: Vec<String>,
    pub hourly_rate: f64,
    pub currency: String,
    /// Average of all review ratings, 0.0 when unreviewed
    pub rating: f64,
    pub review_count: i64,
    pub badges: Vec<String>,
    pub languages: Vec<String>,
    pub availability: Availability,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Weekly availability: time-slot strings ("14:00") keyed by lowercase
/// weekday name ("monday").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(pub BTreeMap<String, Vec<String>>);

impl Availability {
    /// Slots offered on the given weekday, empty when the day is off
    pub fn slots_for(&self, weekday: &str) -> &[String] {
        self.0
            .get(&weekday.to_lowercase())
            .map(|slots| slots.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the mentor offers any slot on the given weekday and time
    pub fn offers(&self, weekday: &str, time_slot: &str) -> bool {
        self.slots_for(weekday).iter().any(|s| s == time_slot)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|slots| slots.is_empty())
    }
}

/// Input for registering as a mentor
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMentorInput {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    pub hourly_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub availability: Availability,
    pub image_url: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}
