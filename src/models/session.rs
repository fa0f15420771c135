//! Auth session model
//!
//! The authentication session, not to be confused with a mentoring
//! `Booking` (the original product called those "sessions" too).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated session. The `id` is the opaque token handed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Check whether this session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
