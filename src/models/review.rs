//! Mentor review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum comment length accepted by the review form
pub const MIN_COMMENT_LENGTH: usize = 10;

/// Rating a reviewer gives when they have not picked anything yet
pub const DEFAULT_RATING: i32 = 5;

/// A review left by a user on a mentor. Each (mentor, user) pair holds at
/// most one review; resubmitting updates the existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub mentor_id: i64,
    pub user_id: i64,
    /// Star rating, 1 to 5
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for submitting (inserting or updating) a review
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReviewInput {
    pub rating: i32,
    pub comment: String,
}
