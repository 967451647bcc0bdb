//! Lifecycle event envelope and the notifier seam.
//!
//! Notification is best-effort fan-out for live updates only; the
//! persisted booking state stays authoritative whether or not an
//! event is delivered.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Emitted when a booking is reserved.
pub const EVENT_BOOKING_CREATED: &str = "booking.created";

/// Emitted when a ride starts.
pub const EVENT_RIDE_STARTED: &str = "ride.started";

/// Emitted when a ride stops.
pub const EVENT_RIDE_STOPPED: &str = "ride.stopped";

/// A booking lifecycle event.
///
/// Constructed via [`BookingEvent::new`] and enriched with the builder
/// methods [`with_booking`](BookingEvent::with_booking),
/// [`with_actor`](BookingEvent::with_actor), and
/// [`with_payload`](BookingEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Dot-separated event name, e.g. `"ride.started"`.
    pub event_type: String,

    /// Id of the booking the event concerns.
    pub booking_id: Option<DbId>,

    /// Id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl BookingEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            booking_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the subject booking to the event.
    pub fn with_booking(mut self, booking_id: DbId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Fire-and-forget event sink used by the lifecycle manager.
///
/// At-most-once delivery, no retry, no backpressure; with zero
/// subscribers the event is silently dropped.
pub trait Notifier: Send + Sync {
    fn publish(&self, event: BookingEvent);
}

/// Notifier that discards every event. Used in tests and tooling that
/// does not care about live updates.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn publish(&self, _event: BookingEvent) {}
}
