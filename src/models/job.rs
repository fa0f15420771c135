//! Job listing model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Location;

/// A job listing posted by a user.
///
/// `salary` is intentionally free text ("$50,000 - $70,000 per year",
/// "€15/hour"); the salary range filter extracts digits from it rather
/// than forcing posters into a structured field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub id: i64,
    /// Owning user; only the owner may edit or delete the listing
    pub user_id: i64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub salary: String,
    pub job_type: JobType,
    pub location: Option<Location>,
    pub contact_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Employment category used for equality filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobType::FullTime => write!(f, "full-time"),
            JobType::PartTime => write!(f, "part-time"),
            JobType::Internship => write!(f, "internship"),
            JobType::Contract => write!(f, "contract"),
        }
    }
}

impl FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full-time" | "fulltime" => Ok(JobType::FullTime),
            "part-time" | "parttime" => Ok(JobType::PartTime),
            "internship" => Ok(JobType::Internship),
            "contract" => Ok(JobType::Contract),
            _ => Err(anyhow::anyhow!("Invalid job type: {}", s)),
        }
    }
}

/// Input for creating a job listing
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobInput {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub job_type: JobType,
    pub location: Option<Location>,
    pub contact_email: Option<String>,
}

/// Input for updating a job listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateJobInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<Location>,
    pub contact_email: Option<String>,
}
