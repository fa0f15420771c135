//! Booking service
//!
//! Business logic for mentoring bookings: creating a booking from a chosen
//! date, time slot and duration, listing a user's upcoming and past
//! bookings, and the cancel/complete transitions with their payment-status
//! side effects.

use crate::db::repositories::{BookingRepository, MentorRepository};
use crate::models::{Booking, BookingStatus, CreateBookingInput, PaymentStatus, User};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// Which tab of the sessions page is being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingTab {
    /// Dated today or later and not canceled
    #[default]
    Upcoming,
    /// Gone by, completed, or canceled
    Past,
}

/// Error types for booking operations
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    /// Booking or mentor does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Caller does not own the booking
    #[error("Only the booking owner may do that")]
    Forbidden,

    /// Missing or invalid booking fields
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Booking service
pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    mentor_repo: Arc<dyn MentorRepository>,
}

impl BookingService {
    /// Create a new booking service
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        mentor_repo: Arc<dyn MentorRepository>,
    ) -> Self {
        Self {
            booking_repo,
            mentor_repo,
        }
    }

    /// Book a session with a mentor.
    ///
    /// Requires a date and a non-empty time slot; the amount is fixed at
    /// booking time as `hourly_rate x duration / 60`. New bookings start
    /// `upcoming` with payment `pending`.
    pub async fn book(
        &self,
        user: &User,
        input: CreateBookingInput,
    ) -> Result<Booking, BookingServiceError> {
        let date = input.date.ok_or_else(|| {
            BookingServiceError::ValidationError("Please select a date".to_string())
        })?;
        let time_slot = input
            .time_slot
            .filter(|slot| !slot.trim().is_empty())
            .ok_or_else(|| {
                BookingServiceError::ValidationError("Please select a time slot".to_string())
            })?;
        if input.duration_minutes <= 0 {
            return Err(BookingServiceError::ValidationError(
                "Duration must be positive".to_string(),
            ));
        }

        let mentor = self
            .mentor_repo
            .get_by_id(input.mentor_id)
            .await
            .context("Failed to load mentor")?
            .ok_or(BookingServiceError::NotFound("Mentor"))?;

        let booking = Booking {
            id: 0,
            mentor_id: mentor.id,
            user_id: user.id,
            date,
            time_slot,
            duration_minutes: input.duration_minutes,
            status: BookingStatus::Upcoming,
            payment_status: PaymentStatus::Pending,
            amount: Booking::compute_amount(mentor.hourly_rate, input.duration_minutes),
            currency: mentor.currency.clone(),
            notes: input.notes,
            created_at: Utc::now(),
        };

        let created = self
            .booking_repo
            .create(&booking)
            .await
            .context("Failed to create booking")?;

        Ok(created)
    }

    /// List the user's bookings for one tab, optionally narrowed to a
    /// single status. Upcoming bookings come soonest first, past bookings
    /// most recent first.
    pub async fn list(
        &self,
        user: &User,
        tab: BookingTab,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, BookingServiceError> {
        let today = Utc::now().date_naive();
        self.list_as_of(user, tab, status, today).await
    }

    /// `list` with an explicit "today", so the split is testable
    pub async fn list_as_of(
        &self,
        user: &User,
        tab: BookingTab,
        status: Option<BookingStatus>,
        today: NaiveDate,
    ) -> Result<Vec<Booking>, BookingServiceError> {
        let all = self
            .booking_repo
            .list_by_user(user.id)
            .await
            .context("Failed to load bookings")?;

        let mut bookings: Vec<Booking> = all
            .into_iter()
            .filter(|booking| match tab {
                BookingTab::Upcoming => !booking.is_past(today),
                BookingTab::Past => booking.is_past(today),
            })
            .filter(|booking| status.map_or(true, |s| booking.status == s))
            .collect();

        if tab == BookingTab::Past {
            bookings.reverse();
        }

        Ok(bookings)
    }

    /// Cancel a booking: status `canceled`, payment `refunded`
    pub async fn cancel(&self, user: &User, id: i64) -> Result<Booking, BookingServiceError> {
        let booking = self.get_owned(user, id).await?;

        if booking.status != BookingStatus::Upcoming {
            return Err(BookingServiceError::ValidationError(
                "Only upcoming sessions can be canceled".to_string(),
            ));
        }

        self.booking_repo
            .set_status(id, BookingStatus::Canceled, PaymentStatus::Refunded)
            .await
            .context("Failed to cancel booking")?;

        self.reload(id).await
    }

    /// Mark a booking completed: status `completed`, payment `paid`
    pub async fn complete(&self, user: &User, id: i64) -> Result<Booking, BookingServiceError> {
        let booking = self.get_owned(user, id).await?;

        if booking.status != BookingStatus::Upcoming {
            return Err(BookingServiceError::ValidationError(
                "Only upcoming sessions can be completed".to_string(),
            ));
        }

        self.booking_repo
            .set_status(id, BookingStatus::Completed, PaymentStatus::Paid)
            .await
            .context("Failed to complete booking")?;

        self.reload(id).await
    }

    async fn get_owned(&self, user: &User, id: i64) -> Result<Booking, BookingServiceError> {
        let booking = self
            .booking_repo
            .get_by_id(id)
            .await
            .context("Failed to load booking")?
            .ok_or(BookingServiceError::NotFound("Booking"))?;

        if !user.owns(booking.user_id) {
            return Err(BookingServiceError::Forbidden);
        }

        Ok(booking)
    }

    async fn reload(&self, id: i64) -> Result<Booking, BookingServiceError> {
        self.booking_repo
            .get_by_id(id)
            .await
            .context("Failed to reload booking")?
            .ok_or(BookingServiceError::NotFound("Booking"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        MentorRepository, SqlxBookingRepository, SqlxMentorRepository, SqlxUserRepository,
        UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Availability, Mentor, UserRole};

    async fn setup() -> (BookingService, i64, User, User) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::new(pool.clone());
        let mentor_user = users
            .create(&User::new("mentor@example.com".to_string(), "hash".to_string(), UserRole::Abroad))
            .await
            .unwrap();
        let student = users
            .create(&User::new("student@example.com".to_string(), "hash".to_string(), UserRole::Planning))
            .await
            .unwrap();

        let mentor_repo = SqlxMentorRepository::boxed(pool.clone());
        let mentor = mentor_repo
            .create(&Mentor {
                id: 0,
                user_id: mentor_user.id,
                name: "Akhil".to_string(),
                title: String::new(),
                bio: String::new(),
                expertise: vec![],
                hourly_rate: 45.0,
                currency: "USD".to_string(),
                rating: 0.0,
                review_count: 0,
                badges: vec![],
                languages: vec![],
                availability: Availability::default(),
                image_url: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let service = BookingService::new(SqlxBookingRepository::boxed(pool), mentor_repo);
        (service, mentor.id, student, mentor_user)
    }

    fn booking_input(mentor_id: i64, date: Option<NaiveDate>, slot: Option<&str>) -> CreateBookingInput {
        CreateBookingInput {
            mentor_id,
            date,
            time_slot: slot.map(String::from),
            duration_minutes: 90,
            notes: None,
        }
    }

    fn future_date() -> NaiveDate {
        Utc::now().date_naive() + chrono::Duration::days(14)
    }

    #[tokio::test]
    async fn test_book_computes_amount_from_rate_and_duration() {
        let (service, mentor_id, student, _) = setup().await;

        let booking = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("14:00")))
            .await
            .expect("Booking failed");

        // 45/h for 90 minutes
        assert_eq!(booking.amount, 67.5);
        assert_eq!(booking.status, BookingStatus::Upcoming);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.currency, "USD");
    }

    #[tokio::test]
    async fn test_book_requires_date_and_slot() {
        let (service, mentor_id, student, _) = setup().await;

        let no_date = service
            .book(&student, booking_input(mentor_id, None, Some("14:00")))
            .await;
        assert!(matches!(no_date, Err(BookingServiceError::ValidationError(_))));

        let no_slot = service
            .book(&student, booking_input(mentor_id, Some(future_date()), None))
            .await;
        assert!(matches!(no_slot, Err(BookingServiceError::ValidationError(_))));

        let blank_slot = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("  ")))
            .await;
        assert!(matches!(blank_slot, Err(BookingServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_book_unknown_mentor() {
        let (service, _, student, _) = setup().await;

        let result = service
            .book(&student, booking_input(9999, Some(future_date()), Some("14:00")))
            .await;

        assert!(matches!(result, Err(BookingServiceError::NotFound("Mentor"))));
    }

    #[tokio::test]
    async fn test_cancel_refunds() {
        let (service, mentor_id, student, _) = setup().await;
        let booking = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("14:00")))
            .await
            .unwrap();

        let canceled = service.cancel(&student, booking.id).await.expect("Cancel failed");

        assert_eq!(canceled.status, BookingStatus::Canceled);
        assert_eq!(canceled.payment_status, PaymentStatus::Refunded);

        // A canceled booking cannot be canceled again
        let again = service.cancel(&student, booking.id).await;
        assert!(matches!(again, Err(BookingServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_complete_marks_paid() {
        let (service, mentor_id, student, _) = setup().await;
        let booking = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("14:00")))
            .await
            .unwrap();

        let completed = service.complete(&student, booking.id).await.expect("Complete failed");

        assert_eq!(completed.status, BookingStatus::Completed);
        assert_eq!(completed.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_only_owner_can_cancel() {
        let (service, mentor_id, student, mentor_user) = setup().await;
        let booking = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("14:00")))
            .await
            .unwrap();

        let result = service.cancel(&mentor_user, booking.id).await;
        assert!(matches!(result, Err(BookingServiceError::Forbidden)));
    }

    #[tokio::test]
    async fn test_tabs_split_upcoming_and_past() {
        let (service, mentor_id, student, _) = setup().await;
        let today = Utc::now().date_naive();

        let upcoming = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("14:00")))
            .await
            .unwrap();
        let canceled = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("15:00")))
            .await
            .unwrap();
        service.cancel(&student, canceled.id).await.unwrap();

        let upcoming_tab = service
            .list_as_of(&student, BookingTab::Upcoming, None, today)
            .await
            .unwrap();
        assert_eq!(upcoming_tab.len(), 1);
        assert_eq!(upcoming_tab[0].id, upcoming.id);

        let past_tab = service
            .list_as_of(&student, BookingTab::Past, None, today)
            .await
            .unwrap();
        assert_eq!(past_tab.len(), 1);
        assert_eq!(past_tab[0].id, canceled.id);
    }

    #[tokio::test]
    async fn test_status_filter_narrows_tab() {
        let (service, mentor_id, student, _) = setup().await;
        let today = Utc::now().date_naive();

        let completed = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("14:00")))
            .await
            .unwrap();
        service.complete(&student, completed.id).await.unwrap();
        let canceled = service
            .book(&student, booking_input(mentor_id, Some(future_date()), Some("15:00")))
            .await
            .unwrap();
        service.cancel(&student, canceled.id).await.unwrap();

        let only_completed = service
            .list_as_of(&student, BookingTab::Past, Some(BookingStatus::Completed), today)
            .await
            .unwrap();

        assert_eq!(only_completed.len(), 1);
        assert_eq!(only_completed[0].id, completed.id);
    }
}
