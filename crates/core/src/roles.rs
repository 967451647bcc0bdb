//! Well-known role name constants and the role authorization gate.
//!
//! These must match the CHECK constraint on `users.role` in the
//! `create_users_table` migration.

use crate::error::CoreError;

/// A renting customer. May reserve cycles and view their own ride history.
pub const ROLE_USER: &str = "user";

/// A rental host. May start/stop rides and list active bookings.
pub const ROLE_HOST: &str = "host";

/// Role-based authorization gate for lifecycle operations.
///
/// Roles are flat (no hierarchy): a `host` is not a superset of a
/// `user`, so the check is strict equality.
pub fn authorize(requester_role: &str, required_role: &str) -> Result<(), CoreError> {
    if requester_role == required_role {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "{required_role} role required"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn matching_role_is_authorized() {
        assert!(authorize(ROLE_HOST, ROLE_HOST).is_ok());
        assert!(authorize(ROLE_USER, ROLE_USER).is_ok());
    }

    #[test]
    fn mismatched_role_is_forbidden() {
        assert_matches!(authorize(ROLE_USER, ROLE_HOST), Err(CoreError::Forbidden(_)));
        assert_matches!(authorize(ROLE_HOST, ROLE_USER), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn unknown_role_is_forbidden() {
        assert_matches!(authorize("admin", ROLE_HOST), Err(CoreError::Forbidden(_)));
    }
}
