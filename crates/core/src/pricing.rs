//! Ride cost policy.
//!
//! Pricing is tiered and discontinuous: a flat base for short rides,
//! a second flat tier up to half an hour, then a per-half-hour
//! surcharge. Amounts are whole monetary units.

/// Flat cost for rides up to 15 minutes.
const BASE_TIER_COST: i64 = 10;

/// Flat cost for rides over 15 and up to 30 minutes.
const SECOND_TIER_COST: i64 = 20;

/// Surcharge per started half hour beyond the first 30 minutes.
const OVERTIME_BLOCK_COST: i64 = 39;

/// Minutes per overtime block.
const OVERTIME_BLOCK_MINS: i64 = 30;

/// Compute the total cost of a ride from its duration in whole minutes.
///
/// Pure and deterministic. Callers must pass a non-negative duration;
/// the lifecycle manager guarantees `end_time >= start_time` before
/// this is reached.
pub fn ride_cost(duration_minutes: i64) -> i64 {
    if duration_minutes <= 15 {
        BASE_TIER_COST
    } else if duration_minutes <= 30 {
        SECOND_TIER_COST
    } else {
        let overtime = duration_minutes - OVERTIME_BLOCK_MINS;
        // Ceiling division: every started block is billed in full.
        let blocks = (overtime + OVERTIME_BLOCK_MINS - 1) / OVERTIME_BLOCK_MINS;
        SECOND_TIER_COST + blocks * OVERTIME_BLOCK_COST
    }
}
