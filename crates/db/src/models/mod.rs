//! Row models mapping table rows to domain types.

pub mod booking;
pub mod ride_history;
pub mod user;

pub use booking::{ActiveBookingRow, BookingRow};
pub use ride_history::RideHistoryRow;
pub use user::{CreateUser, User, UserResponse};
