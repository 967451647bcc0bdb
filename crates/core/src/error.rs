use crate::types::DbId;

/// Domain error taxonomy.
///
/// The state-machine variants (`InvalidCode`, `AlreadyStarted`,
/// `AlreadyStopped`, `NotStarted`) cover every way a lifecycle
/// transition can be rejected; the HTTP layer maps them all to 400.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid unlock code for booking {0}")]
    InvalidCode(DbId),

    #[error("Ride already started for booking {0}")]
    AlreadyStarted(DbId),

    #[error("Ride already stopped for booking {0}")]
    AlreadyStopped(DbId),

    #[error("Ride not started for booking {0}")]
    NotStarted(DbId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
