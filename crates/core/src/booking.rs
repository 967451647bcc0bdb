//! Booking entity and its lifecycle state machine.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Lifecycle state of a booking.
///
/// Storage keeps the legacy two-boolean representation (`started`,
/// `stopped`); this enum is derived from those flags. The only legal
/// transitions are Reserved -> Started -> Stopped, each exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingState {
    Reserved,
    Started,
    Stopped,
}

impl BookingState {
    /// Derive the state from the stored flags.
    ///
    /// `stopped` implies `started`; a row with `stopped = true` and
    /// `started = false` violates that invariant and is rejected.
    pub fn from_flags(started: bool, stopped: bool) -> Result<Self, CoreError> {
        match (started, stopped) {
            (false, false) => Ok(BookingState::Reserved),
            (true, false) => Ok(BookingState::Started),
            (true, true) => Ok(BookingState::Stopped),
            (false, true) => Err(CoreError::Internal(
                "booking marked stopped but never started".into(),
            )),
        }
    }
}

/// One reservation-to-completion ride cycle.
///
/// `owner_id`, `place` and `cycle_id` are immutable after creation.
/// The time, duration, cost and drop-location fields are `None` until
/// the corresponding transition sets them, exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
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

impl Booking {
    /// Current lifecycle state derived from the stored flags.
    pub fn state(&self) -> Result<BookingState, CoreError> {
        BookingState::from_flags(self.started, self.stopped)
    }
}

/// Input for creating a booking in `Reserved` state.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub owner_id: DbId,
    pub place: String,
    pub cycle_id: String,
    pub unlock_code: String,
}

/// An unfinished booking joined with its owner's display identifier,
/// as returned to hosts by the active-bookings listing.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub owner_email: String,
}
