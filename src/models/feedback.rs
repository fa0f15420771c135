//! Feedback model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact-form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Input for submitting feedback
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedbackInput {
    pub subject: String,
    pub message: String,
}
