//! Repository for the `ride_history` table.
//!
//! Rows are append-only: no update or delete operations exist here.

use sqlx::PgPool;

use cyclebook_core::history::NewRideHistoryEntry;
use cyclebook_core::types::DbId;

use crate::models::ride_history::RideHistoryRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, duration_minutes, cost, drop_location, created_at";

/// Provides append and read operations for ride history.
pub struct RideHistoryRepo;

impl RideHistoryRepo {
    /// Append a history entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewRideHistoryEntry,
    ) -> Result<RideHistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO ride_history (owner_id, duration_minutes, cost, drop_location)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RideHistoryRow>(&query)
            .bind(input.owner_id)
            .bind(input.duration_minutes)
            .bind(input.cost)
            .bind(&input.drop_location)
            .fetch_one(pool)
            .await
    }

    /// All history entries for an owner, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<RideHistoryRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM ride_history WHERE owner_id = $1 ORDER BY id DESC");
        sqlx::query_as::<_, RideHistoryRow>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
