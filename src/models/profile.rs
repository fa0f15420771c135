//! Profile model
//!
//! One profile row per user, created empty at sign-up and filled in through
//! the profile editor. The profile also carries the coarse geolocation shown
//! on the community map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Profile entity, one-to-one with a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    pub name: String,
    pub university: String,
    pub field_of_study: String,
    pub bio: String,
    pub image_url: Option<String>,
    pub location: Option<Location>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create an empty profile for a freshly registered user
    pub fn empty(user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            name: String::new(),
            university: String::new(),
            field_of_study: String::new(),
            bio: String::new(),
            image_url: None,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A place, either as coordinates or as freeform text.
///
/// Listings and profiles historically stored either shape in the same
/// column; the tagged union makes the two cases explicit. The storage form
/// is a single string: `"lat,lng"` for coordinates, anything else is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    /// Geographic coordinates
    Coordinates { lat: f64, lng: f64 },
    /// Freeform text such as "Berlin, Germany"
    Text(String),
}

impl Location {
    /// Full-precision storage form: `"lat,lng"` or the raw text
    pub fn to_storage(&self) -> String {
        match self {
            Location::Coordinates { lat, lng } => format!("{},{}", lat, lng),
            Location::Text(text) => text.clone(),
        }
    }

    /// The freeform text, if this is a text location
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Location::Text(text) => Some(text),
            Location::Coordinates { .. } => None,
        }
    }
}

impl fmt::Display for Location {
    /// Human-readable form; coordinates render with two decimals
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates { lat, lng } => write!(f, "{:.2}, {:.2}", lat, lng),
            Location::Text(text) => write!(f, "{}", text),
        }
    }
}

impl FromStr for Location {
    type Err = std::convert::Infallible;

    /// Parse the storage form. Two comma-separated numbers become
    /// coordinates; anything else is freeform text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((lat, lng)) = s.split_once(',') {
            if let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
                return Ok(Location::Coordinates { lat, lng });
            }
        }
        Ok(Location::Text(s.to_string()))
    }
}

/// Input for updating a profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub university: Option<String>,
    pub field_of_study: Option<String>,
    pub bio: Option<String>,
    /// Client-reported coordinates; absent when geolocation was unavailable
    pub location: Option<Location>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_coordinates_round_trip() {
        let loc = Location::Coordinates { lat: 52.52, lng: 13.405 };
        let stored = loc.to_storage();
        assert_eq!(stored, "52.52,13.405");
        assert_eq!(Location::from_str(&stored).unwrap(), loc);
    }

    #[test]
    fn test_location_text_round_trip() {
        let loc = Location::Text("Berlin, Germany".to_string());
        let stored = loc.to_storage();
        assert_eq!(Location::from_str(&stored).unwrap(), loc);
    }

    #[test]
    fn test_location_parse_with_spaces() {
        let loc = Location::from_str("52.52, 13.405").unwrap();
        assert_eq!(loc, Location::Coordinates { lat: 52.52, lng: 13.405 });
    }

    #[test]
    fn test_location_display_two_decimals() {
        let loc = Location::Coordinates { lat: 52.520008, lng: 13.404954 };
        assert_eq!(loc.to_string(), "52.52, 13.40");
    }

    #[test]
    fn test_location_text_display() {
        let loc = Location::Text("Stanford, CA".to_string());
        assert_eq!(loc.to_string(), "Stanford, CA");
    }

    #[test]
    fn test_location_json_shapes() {
        let coords: Location = serde_json::from_str(r#"{"lat": 1.5, "lng": -2.0}"#).unwrap();
        assert_eq!(coords, Location::Coordinates { lat: 1.5, lng: -2.0 });

        let text: Location = serde_json::from_str(r#""Oxford, UK""#).unwrap();
        assert_eq!(text, Location::Text("Oxford, UK".to_string()));
    }

    #[test]
    fn test_empty_profile() {
        let profile = Profile::empty(42);
        assert_eq!(profile.user_id, 42);
        assert!(profile.name.is_empty());
        assert!(profile.location.is_none());
        assert!(profile.image_url.is_none());
    }
}
