//! Booking model
//!
//! A booking is a scheduled mentoring appointment between a user and a
//! mentor, distinct from the authentication `Session`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub mentor_id: i64,
    /// The user who booked the appointment
    pub user_id: i64,
    pub date: NaiveDate,
    /// Starting time, "HH:MM"
    pub time_slot: String,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// hourly_rate x duration / 60, fixed at booking time
    pub amount: f64,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Compute the amount charged for a session of the given length
    pub fn compute_amount(hourly_rate: f64, duration_minutes: i32) -> f64 {
        hourly_rate * duration_minutes as f64 / 60.0
    }

    /// Whether this booking belongs on the "past" tab: the date has gone
    /// by, or the booking reached a terminal status.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
            || matches!(self.status, BookingStatus::Completed | BookingStatus::Canceled)
    }
}

/// Booking lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Upcoming,
    Completed,
    Canceled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Upcoming => write!(f, "upcoming"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Canceled => write!(f, "canceled"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(BookingStatus::Upcoming),
            "completed" => Ok(BookingStatus::Completed),
            "canceled" | "cancelled" => Ok(BookingStatus::Canceled),
            _ => Err(anyhow::anyhow!("Invalid booking status: {}", s)),
        }
    }
}

/// Payment state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Refunded,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Refunded => write!(f, "refunded"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "refunded" => Ok(PaymentStatus::Refunded),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid payment status: {}", s)),
        }
    }
}

/// Input for creating a booking
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingInput {
    pub mentor_id: i64,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_amount() {
        // rate 45/h for 90 minutes = 45 * 1.5
        assert_eq!(Booking::compute_amount(45.0, 90), 67.5);
        assert_eq!(Booking::compute_amount(25.0, 30), 12.5);
        assert_eq!(Booking::compute_amount(80.0, 120), 160.0);
        assert_eq!(Booking::compute_amount(60.0, 60), 60.0);
    }

    #[test]
    fn test_booking_status_round_trip() {
        for status in [BookingStatus::Upcoming, BookingStatus::Completed, BookingStatus::Canceled] {
            assert_eq!(BookingStatus::from_str(&status.to_string()).unwrap(), status);
        }
        assert_eq!(
            BookingStatus::from_str("cancelled").unwrap(),
            BookingStatus::Canceled
        );
    }

    #[test]
    fn test_payment_status_round_trip() {
        for status in [
            PaymentStatus::Paid,
            PaymentStatus::Pending,
            PaymentStatus::Refunded,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from_str(&status.to_string()).unwrap(), status);
        }
    }

    #[test]
    fn test_is_past() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut booking = Booking {
            id: 1,
            mentor_id: 1,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            time_slot: "14:00".to_string(),
            duration_minutes: 60,
            status: BookingStatus::Upcoming,
            payment_status: PaymentStatus::Pending,
            amount: 45.0,
            currency: "USD".to_string(),
            notes: None,
            created_at: Utc::now(),
        };

        assert!(!booking.is_past(today));

        booking.status = BookingStatus::Canceled;
        assert!(booking.is_past(today));

        booking.status = BookingStatus::Upcoming;
        booking.date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(booking.is_past(today));
    }
}
