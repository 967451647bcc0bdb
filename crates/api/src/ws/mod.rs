//! WebSocket infrastructure for real-time booking updates.
//!
//! Provides connection management with per-booking rooms, a keepalive
//! task, and the HTTP upgrade handler used by Axum routes.

mod handler;
pub mod manager;

pub use handler::ws_handler;
pub use manager::WsManager;
