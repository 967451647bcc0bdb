//! Cyclebook domain core.
//!
//! Pure booking-lifecycle logic with no HTTP or database dependencies.
//! The API and persistence crates plug into this crate through the
//! [`store::BookingStore`] and [`notify::Notifier`] seams.

pub mod booking;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod notify;
pub mod pricing;
pub mod roles;
pub mod store;
pub mod types;
pub mod unlock_code;
