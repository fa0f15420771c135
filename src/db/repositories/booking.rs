//! Booking repository
//!
//! Database operations for mentoring bookings.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Booking, BookingStatus, PaymentStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Booking repository trait
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Create a booking
    async fn create(&self, booking: &Booking) -> Result<Booking>;

    /// Get a booking by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Booking>>;

    /// List all bookings made by a user, soonest date first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>>;

    /// Move a booking to a new lifecycle and payment state
    async fn set_status(
        &self,
        id: i64,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<()>;
}

/// SQLx-based booking repository implementation
///
/// Supports both SQLite and PostgreSQL databases.
pub struct SqlxBookingRepository {
    pool: DynDatabasePool,
}

impl SqlxBookingRepository {
    /// Create a new SQLx booking repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BookingRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BookingRepository for SqlxBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<Booking> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_booking_sqlite(self.pool.as_sqlite().unwrap(), booking).await
            }
            DatabaseDriver::Postgres => {
                create_booking_postgres(self.pool.as_postgres().unwrap(), booking).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Booking>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_booking_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Postgres => {
                get_booking_by_id_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_bookings_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Postgres => {
                list_bookings_postgres(self.pool.as_postgres().unwrap(), user_id).await
            }
        }
    }

    async fn set_status(
        &self,
        id: i64,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_status_sqlite(self.pool.as_sqlite().unwrap(), id, status, payment_status).await
            }
            DatabaseDriver::Postgres => {
                set_status_postgres(self.pool.as_postgres().unwrap(), id, status, payment_status)
                    .await
            }
        }
    }
}

const BOOKING_COLUMNS: &str = "id, mentor_id, user_id, date, time_slot, duration_minutes, status, \
     payment_status, amount, currency, notes, created_at";

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_booking_sqlite(pool: &SqlitePool, booking: &Booking) -> Result<Booking> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO bookings (mentor_id, user_id, date, time_slot, duration_minutes, status,
                              payment_status, amount, currency, notes, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(booking.mentor_id)
    .bind(booking.user_id)
    .bind(booking.date)
    .bind(&booking.time_slot)
    .bind(booking.duration_minutes)
    .bind(booking.status.to_string())
    .bind(booking.payment_status.to_string())
    .bind(booking.amount)
    .bind(&booking.currency)
    .bind(&booking.notes)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create booking")?;

    Ok(Booking {
        id: result.last_insert_rowid(),
        created_at: now,
        ..booking.clone()
    })
}

async fn get_booking_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Booking>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM bookings WHERE id = ?",
        BOOKING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get booking")?;

    match row {
        Some(row) => Ok(Some(row_to_booking_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_bookings_sqlite(pool: &SqlitePool, user_id: i64) -> Result<Vec<Booking>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM bookings WHERE user_id = ? ORDER BY date, time_slot",
        BOOKING_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list bookings")?;

    rows.iter().map(row_to_booking_sqlite).collect()
}

async fn set_status_sqlite(
    pool: &SqlitePool,
    id: i64,
    status: BookingStatus,
    payment_status: PaymentStatus,
) -> Result<()> {
    sqlx::query("UPDATE bookings SET status = ?, payment_status = ? WHERE id = ?")
        .bind(status.to_string())
        .bind(payment_status.to_string())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update booking status")?;

    Ok(())
}

fn row_to_booking_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Booking> {
    let status_str: String = row.get("status");
    let payment_str: String = row.get("payment_status");

    Ok(Booking {
        id: row.get("id"),
        mentor_id: row.get("mentor_id"),
        user_id: row.get("user_id"),
        date: row.get("date"),
        time_slot: row.get("time_slot"),
        duration_minutes: row.get("duration_minutes"),
        status: BookingStatus::from_str(&status_str)
            .with_context(|| format!("Invalid booking status in database: {}", status_str))?,
        payment_status: PaymentStatus::from_str(&payment_str)
            .with_context(|| format!("Invalid payment status in database: {}", payment_str))?,
        amount: row.get("amount"),
        currency: row.get("currency"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn create_booking_postgres(pool: &PgPool, booking: &Booking) -> Result<Booking> {
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO bookings (mentor_id, user_id, date, time_slot, duration_minutes, status,
                              payment_status, amount, currency, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(booking.mentor_id)
    .bind(booking.user_id)
    .bind(booking.date)
    .bind(&booking.time_slot)
    .bind(booking.duration_minutes)
    .bind(booking.status.to_string())
    .bind(booking.payment_status.to_string())
    .bind(booking.amount)
    .bind(&booking.currency)
    .bind(&booking.notes)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create booking")?;

    Ok(Booking {
        id: row.get("id"),
        created_at: now,
        ..booking.clone()
    })
}

async fn get_booking_by_id_postgres(pool: &PgPool, id: i64) -> Result<Option<Booking>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM bookings WHERE id = $1",
        BOOKING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get booking")?;

    match row {
        Some(row) => Ok(Some(row_to_booking_postgres(&row)?)),
        None => Ok(None),
    }
}

async fn list_bookings_postgres(pool: &PgPool, user_id: i64) -> Result<Vec<Booking>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY date, time_slot",
        BOOKING_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list bookings")?;

    rows.iter().map(row_to_booking_postgres).collect()
}

async fn set_status_postgres(
    pool: &PgPool,
    id: i64,
    status: BookingStatus,
    payment_status: PaymentStatus,
) -> Result<()> {
    sqlx::query("UPDATE bookings SET status = $1, payment_status = $2 WHERE id = $3")
        .bind(status.to_string())
        .bind(payment_status.to_string())
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update booking status")?;

    Ok(())
}

fn row_to_booking_postgres(row: &sqlx::postgres::PgRow) -> Result<Booking> {
    let status_str: String = row.get("status");
    let payment_str: String = row.get("payment_status");

    Ok(Booking {
        id: row.get("id"),
        mentor_id: row.get("mentor_id"),
        user_id: row.get("user_id"),
        date: row.get("date"),
        time_slot: row.get("time_slot"),
        duration_minutes: row.get("duration_minutes"),
        status: BookingStatus::from_str(&status_str)
            .with_context(|| format!("Invalid booking status in database: {}", status_str))?,
        payment_status: PaymentStatus::from_str(&payment_str)
            .with_context(|| format!("Invalid payment status in database: {}", payment_str))?,
        amount: row.get("amount"),
        currency: row.get("currency"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    })
}
