use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Mount booking lifecycle routes. Authorization is enforced per-handler
/// via the RBAC extractors.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/book", post(booking::book))
        .route("/bookings", get(booking::list_bookings))
        .route("/start-ride", post(booking::start_ride))
        .route("/stop-ride", post(booking::stop_ride))
        .route("/ride-history", get(booking::ride_history))
}
