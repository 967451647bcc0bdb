//! Repository for the `bookings` table.
//!
//! The two transition updates are conditional writes: they only match
//! rows still in the expected state, so a concurrent double-start or
//! double-stop loses the race at the database instead of silently
//! overwriting.

use sqlx::PgPool;

use cyclebook_core::booking::NewBooking;
use cyclebook_core::types::{DbId, Timestamp};

use crate::models::booking::{ActiveBookingRow, BookingRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, place, cycle_id, unlock_code, started, stopped, \
                        start_time, end_time, duration_minutes, cost, drop_location, created_at";

/// Provides operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking in `Reserved` state, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewBooking) -> Result<BookingRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (owner_id, place, cycle_id, unlock_code)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(input.owner_id)
            .bind(&input.place)
            .bind(&input.cycle_id)
            .bind(&input.unlock_code)
            .fetch_one(pool)
            .await
    }

    /// Find a booking by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BookingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a booking started, only if it is not started yet.
    ///
    /// Returns `None` when the conditional write matched no row.
    pub async fn begin_ride(
        pool: &PgPool,
        id: DbId,
        start_time: Timestamp,
    ) -> Result<Option<BookingRow>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings
             SET started = TRUE, start_time = $2
             WHERE id = $1 AND started = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .bind(start_time)
            .fetch_optional(pool)
            .await
    }

    /// Mark a booking stopped with its final duration, cost, and drop
    /// location, only if it is started and not yet stopped.
    ///
    /// Returns `None` when the conditional write matched no row.
    pub async fn finish_ride(
        pool: &PgPool,
        id: DbId,
        end_time: Timestamp,
        duration_minutes: i64,
        cost: i64,
        drop_location: &str,
    ) -> Result<Option<BookingRow>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings
             SET stopped = TRUE, end_time = $2, duration_minutes = $3,
                 cost = $4, drop_location = $5
             WHERE id = $1 AND started = TRUE AND stopped = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .bind(end_time)
            .bind(duration_minutes)
            .bind(cost)
            .bind(drop_location)
            .fetch_optional(pool)
            .await
    }

    /// All bookings not yet stopped, joined with the owner's email,
    /// in insertion order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ActiveBookingRow>, sqlx::Error> {
        sqlx::query_as::<_, ActiveBookingRow>(
            "SELECT b.id, b.owner_id, b.place, b.cycle_id, b.unlock_code,
                    b.started, b.stopped, b.start_time, b.end_time,
                    b.duration_minutes, b.cost, b.drop_location, b.created_at,
                    u.email AS owner_email
             FROM bookings b
             JOIN users u ON u.id = b.owner_id
             WHERE b.stopped = FALSE
             ORDER BY b.id",
        )
        .fetch_all(pool)
        .await
    }
}
