//! Ride-history row model.

use sqlx::FromRow;

use cyclebook_core::history::RideHistoryEntry;
use cyclebook_core::types::{DbId, Timestamp};

/// Full row from the `ride_history` table.
#[derive(Debug, Clone, FromRow)]
pub struct RideHistoryRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub duration_minutes: i64,
    pub cost: i64,
    pub drop_location: String,
    pub created_at: Timestamp,
}

impl From<RideHistoryRow> for RideHistoryEntry {
    fn from(row: RideHistoryRow) -> Self {
        RideHistoryEntry {
            id: row.id,
            owner_id: row.owner_id,
            duration_minutes: row.duration_minutes,
            cost: row.cost,
            drop_location: row.drop_location,
            created_at: row.created_at,
        }
    }
}
