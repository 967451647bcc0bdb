//! Booking row model.

use sqlx::FromRow;

use cyclebook_core::booking::{ActiveBooking, Booking};
use cyclebook_core::types::{DbId, Timestamp};

/// Full booking row from the `bookings` table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub place: String,
    pub cycle_id: String,
    pub unlock_code: String,
    pub started: bool,
    pub stopped: bool,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub duration_minutes: Option<i64>,
    pub cost: Option<i64>,
    pub drop_location: Option<String>,
    pub created_at: Timestamp,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            owner_id: row.owner_id,
            place: row.place,
            cycle_id: row.cycle_id,
            unlock_code: row.unlock_code,
            started: row.started,
            stopped: row.stopped,
            start_time: row.start_time,
            end_time: row.end_time,
            duration_minutes: row.duration_minutes,
            cost: row.cost,
            drop_location: row.drop_location,
            created_at: row.created_at,
        }
    }
}

/// Booking row joined with the owner's email, produced by the
/// active-bookings listing query.
#[derive(Debug, Clone, FromRow)]
pub struct ActiveBookingRow {
    #[sqlx(flatten)]
    pub booking: BookingRow,
    pub owner_email: String,
}

impl From<ActiveBookingRow> for ActiveBooking {
    fn from(row: ActiveBookingRow) -> Self {
        ActiveBooking {
            booking: row.booking.into(),
            owner_email: row.owner_email,
        }
    }
}
