//! Table repositories.
//!
//! Each repository is a unit struct with associated async functions
//! taking the pool explicitly, so callers control transaction scope.

pub mod booking_repo;
pub mod ride_history_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use ride_history_repo::RideHistoryRepo;
pub use user_repo::UserRepo;
