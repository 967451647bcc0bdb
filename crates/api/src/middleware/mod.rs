//! Request middleware: authentication and role-based access control.

pub mod auth;
pub mod rbac;

pub use auth::AuthUser;
pub use rbac::{RequireHost, RequireRider};
