//! Cyclebook event fan-out.
//!
//! Provides the in-process [`EventBus`] over which booking lifecycle
//! events reach live subscribers (currently the WebSocket fan-out in
//! the API crate). The bus is best-effort only; persisted booking
//! state is always authoritative.

pub mod bus;

pub use bus::EventBus;
pub use cyclebook_core::notify::BookingEvent;
