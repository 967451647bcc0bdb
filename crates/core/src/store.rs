//! Persistence seam for the booking lifecycle.
//!
//! The lifecycle manager is written against this trait so the state
//! machine can be exercised without a database. The production
//! implementation lives in `cyclebook-db` (`PgBookingStore`); tests use
//! an in-memory store.

use async_trait::async_trait;

use crate::booking::{ActiveBooking, Booking, NewBooking};
use crate::error::CoreError;
use crate::history::{NewRideHistoryEntry, RideHistoryEntry};
use crate::types::{DbId, Timestamp};

/// Durable storage for bookings and ride history.
///
/// The two transition writes are conditional: they must only apply when
/// the row is still in the expected state, so that concurrent callers
/// racing on the same booking cannot double-start or double-stop it.
/// The loser of such a race observes `None` and maps it to the
/// appropriate state error.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a new booking in `Reserved` state, returning the stored row.
    async fn insert_booking(&self, new: NewBooking) -> Result<Booking, CoreError>;

    /// Fetch a booking by id.
    async fn find_booking(&self, id: DbId) -> Result<Option<Booking>, CoreError>;

    /// Mark a booking started, only if it has not started yet.
    ///
    /// Returns the updated row, or `None` when no row was in `Reserved`
    /// state under that id (absent, already started, or lost a race).
    async fn begin_ride(
        &self,
        id: DbId,
        start_time: Timestamp,
    ) -> Result<Option<Booking>, CoreError>;

    /// Mark a booking stopped, only if it is started and not yet stopped.
    ///
    /// Returns the updated row, or `None` when the conditional write
    /// matched no row.
    async fn finish_ride(
        &self,
        id: DbId,
        end_time: Timestamp,
        duration_minutes: i64,
        cost: i64,
        drop_location: &str,
    ) -> Result<Option<Booking>, CoreError>;

    /// All bookings not yet stopped, joined with the owner's email,
    /// in storage (insertion) order.
    async fn list_active(&self) -> Result<Vec<ActiveBooking>, CoreError>;

    /// Append an immutable ride-history entry.
    async fn append_history(
        &self,
        entry: NewRideHistoryEntry,
    ) -> Result<RideHistoryEntry, CoreError>;

    /// All history entries for an owner, newest first.
    async fn history_for_owner(
        &self,
        owner_id: DbId,
    ) -> Result<Vec<RideHistoryEntry>, CoreError>;
}
