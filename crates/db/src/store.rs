//! PostgreSQL implementation of the core booking-store seam.

use async_trait::async_trait;

use cyclebook_core::booking::{ActiveBooking, Booking, NewBooking};
use cyclebook_core::error::CoreError;
use cyclebook_core::history::{NewRideHistoryEntry, RideHistoryEntry};
use cyclebook_core::store::BookingStore;
use cyclebook_core::types::{DbId, Timestamp};

use crate::repositories::{BookingRepo, RideHistoryRepo};
use crate::DbPool;

/// [`BookingStore`] backed by the `bookings` and `ride_history` tables.
///
/// Cheap to clone; wraps the shared connection pool.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: DbPool,
}

impl PgBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a storage failure into the domain taxonomy.
///
/// Detail is logged here; callers only see a sanitized internal error.
fn storage_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Booking store query failed");
    CoreError::Internal("storage failure".into())
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert_booking(&self, new: NewBooking) -> Result<Booking, CoreError> {
        let row = BookingRepo::create(&self.pool, &new)
            .await
            .map_err(storage_error)?;
        Ok(row.into())
    }

    async fn find_booking(&self, id: DbId) -> Result<Option<Booking>, CoreError> {
        let row = BookingRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Into::into))
    }

    async fn begin_ride(
        &self,
        id: DbId,
        start_time: Timestamp,
    ) -> Result<Option<Booking>, CoreError> {
        let row = BookingRepo::begin_ride(&self.pool, id, start_time)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Into::into))
    }

    async fn finish_ride(
        &self,
        id: DbId,
        end_time: Timestamp,
        duration_minutes: i64,
        cost: i64,
        drop_location: &str,
    ) -> Result<Option<Booking>, CoreError> {
        let row =
            BookingRepo::finish_ride(&self.pool, id, end_time, duration_minutes, cost, drop_location)
                .await
                .map_err(storage_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_active(&self) -> Result<Vec<ActiveBooking>, CoreError> {
        let rows = BookingRepo::list_active(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn append_history(
        &self,
        entry: NewRideHistoryEntry,
    ) -> Result<RideHistoryEntry, CoreError> {
        let row = RideHistoryRepo::create(&self.pool, &entry)
            .await
            .map_err(storage_error)?;
        Ok(row.into())
    }

    async fn history_for_owner(&self, owner_id: DbId) -> Result<Vec<RideHistoryEntry>, CoreError> {
        let rows = RideHistoryRepo::list_for_owner(&self.pool, owner_id)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
