//! Immutable ride-history records.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Record of a completed ride, written exactly once at the
/// Started -> Stopped transition. Never mutated or deleted.
#[derive(Debug, Clone, Serialize)]
pub struct RideHistoryEntry {
    pub id: DbId,
    pub owner_id: DbId,
    pub duration_minutes: i64,
    pub cost: i64,
    pub drop_location: String,
    pub created_at: Timestamp,
}

/// Input for appending a history entry.
#[derive(Debug, Clone)]
pub struct NewRideHistoryEntry {
    pub owner_id: DbId,
    pub duration_minutes: i64,
    pub cost: i64,
    pub drop_location: String,
}
