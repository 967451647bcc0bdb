use std::sync::Arc;

use cyclebook_core::lifecycle::Lifecycle;
use cyclebook_db::store::PgBookingStore;
use cyclebook_events::EventBus;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: cyclebook_db::DbPool,
    /// Server configuration (JWT settings, timeouts, CORS).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing booking events.
    pub event_bus: Arc<EventBus>,
    /// Booking lifecycle manager backed by Postgres.
    pub lifecycle: Lifecycle<PgBookingStore>,
}
