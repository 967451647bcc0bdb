//! Event-to-WebSocket notification routing.
//!
//! The [`NotificationRouter`] subscribes to the event bus and forwards
//! booking events to the WebSocket room of the affected booking.

pub mod router;

pub use router::NotificationRouter;
