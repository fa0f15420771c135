//! University directory models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A university in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct University {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Acceptance rate in percent
    pub acceptance_rate: f64,
    /// Annual fees in USD
    pub annual_fees: i64,
    pub description: String,
}

/// A student enrolled at (or graduated from) a university.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub university_id: i64,
    pub name: String,
    pub roll_number: String,
    pub degree: String,
    pub batch_year: i32,
    pub course: String,
    pub status: StudentStatus,
    pub profile_picture: Option<String>,
}

/// Enrollment state of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    /// Currently enrolled
    #[default]
    Current,
    /// Graduated
    Passed,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentStatus::Current => write!(f, "current"),
            StudentStatus::Passed => write!(f, "passed"),
        }
    }
}

impl FromStr for StudentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current" => Ok(StudentStatus::Current),
            "passed" => Ok(StudentStatus::Passed),
            _ => Err(anyhow::anyhow!("Invalid student status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_status_round_trip() {
        assert_eq!(StudentStatus::from_str("current").unwrap(), StudentStatus::Current);
        assert_eq!(StudentStatus::from_str("Passed").unwrap(), StudentStatus::Passed);
        assert!(StudentStatus::from_str("alumni").is_err());
        assert_eq!(StudentStatus::Current.to_string(), "current");
    }
}
