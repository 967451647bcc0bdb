//! Handlers for the booking lifecycle: reserve, start, stop, listings.

use axum::extract::State;
use axum::Json;
use cyclebook_core::booking::{ActiveBooking, Booking};
use cyclebook_core::history::RideHistoryEntry;
use cyclebook_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::{RequireHost, RequireRider};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/book`.
///
/// The wire field is `cycle`; internally the identifier travels as
/// `cycle_id`.
#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub place: String,
    pub cycle: String,
}

/// Response for a successful reservation.
///
/// The unlock code is surfaced at the top level so the rider's client
/// can display it prominently.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub booking: Booking,
    pub unique_code: String,
}

/// Request body for `POST /api/v1/start-ride`.
#[derive(Debug, Deserialize)]
pub struct StartRideRequest {
    pub booking_id: DbId,
    pub unique_code: String,
}

/// Request body for `POST /api/v1/stop-ride`.
#[derive(Debug, Deserialize)]
pub struct StopRideRequest {
    pub booking_id: DbId,
    pub drop_location: String,
}

/// Response for a successful ride stop: the final bill.
#[derive(Debug, Serialize)]
pub struct StopRideResponse {
    pub booking_id: DbId,
    pub duration_minutes: i64,
    pub cost: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/book
///
/// Reserve a cycle for the authenticated rider. Returns 200 with the
/// created booking and its unlock code.
pub async fn book(
    RequireRider(user): RequireRider,
    State(state): State<AppState>,
    Json(input): Json<BookRequest>,
) -> AppResult<Json<BookResponse>> {
    let booking = state
        .lifecycle
        .reserve(&user.role, user.user_id, input.place, input.cycle)
        .await?;

    tracing::info!(booking_id = booking.id, user_id = user.user_id, "Cycle booked");

    let unique_code = booking.unlock_code.clone();
    Ok(Json(BookResponse {
        booking,
        unique_code,
    }))
}

/// GET /api/v1/bookings
///
/// List all bookings that have not been stopped, with owner contact
/// email, for the host dashboard.
pub async fn list_bookings(
    RequireHost(user): RequireHost,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ActiveBooking>>> {
    let bookings = state.lifecycle.list_active(&user.role).await?;
    Ok(Json(bookings))
}

/// POST /api/v1/start-ride
///
/// Start the ride for a booking after the host validates the rider's
/// unlock code.
pub async fn start_ride(
    RequireHost(user): RequireHost,
    State(state): State<AppState>,
    Json(input): Json<StartRideRequest>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .lifecycle
        .start_ride(&user.role, input.booking_id, &input.unique_code)
        .await?;

    tracing::info!(booking_id = booking.id, "Ride started");

    Ok(Json(booking))
}

/// POST /api/v1/stop-ride
///
/// Stop an in-progress ride, computing duration and cost and recording
/// the ride in history. Returns the final bill.
pub async fn stop_ride(
    RequireHost(user): RequireHost,
    State(state): State<AppState>,
    Json(input): Json<StopRideRequest>,
) -> AppResult<Json<StopRideResponse>> {
    let receipt = state
        .lifecycle
        .stop_ride(&user.role, input.booking_id, input.drop_location)
        .await?;

    tracing::info!(
        booking_id = input.booking_id,
        duration_minutes = receipt.duration_minutes,
        cost = receipt.cost,
        "Ride stopped"
    );

    Ok(Json(StopRideResponse {
        booking_id: input.booking_id,
        duration_minutes: receipt.duration_minutes,
        cost: receipt.cost,
    }))
}

/// GET /api/v1/ride-history
///
/// List the authenticated rider's completed rides, newest first.
pub async fn ride_history(
    RequireRider(user): RequireRider,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RideHistoryEntry>>> {
    let entries = state
        .lifecycle
        .list_history(&user.role, user.user_id)
        .await?;
    Ok(Json(entries))
}
