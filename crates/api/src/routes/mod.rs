pub mod auth;
pub mod booking;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                WebSocket (booking update rooms)
///
/// /register          create account (public)
/// /login             authenticate (public)
///
/// /book              reserve a cycle (rider only)
/// /ride-history      completed rides (rider only)
///
/// /bookings          active bookings (host only)
/// /start-ride        begin a ride (host only)
/// /stop-ride         finish a ride (host only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(booking::router())
        .route("/ws", get(ws::ws_handler))
}
