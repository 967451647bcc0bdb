//! Booking lifecycle manager.
//!
//! Owns the Reserved -> Started -> Stopped state machine: every
//! transition is validated here, persisted through the injected
//! [`BookingStore`], and announced through the injected [`Notifier`].
//! HTTP handlers are thin adapters over these methods.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::booking::{ActiveBooking, Booking, BookingState, NewBooking};
use crate::error::CoreError;
use crate::history::{NewRideHistoryEntry, RideHistoryEntry};
use crate::notify::{
    BookingEvent, Notifier, EVENT_BOOKING_CREATED, EVENT_RIDE_STARTED, EVENT_RIDE_STOPPED,
};
use crate::pricing::ride_cost;
use crate::roles::{authorize, ROLE_HOST, ROLE_USER};
use crate::store::BookingStore;
use crate::types::{DbId, Timestamp};
use crate::unlock_code::generate_unlock_code;

/// Time source for transition timestamps. Injectable so tests can
/// simulate ride durations.
pub type Clock = Arc<dyn Fn() -> Timestamp + Send + Sync>;

/// Duration and cost returned to the caller when a ride stops.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RideReceipt {
    pub duration_minutes: i64,
    pub cost: i64,
}

/// The booking lifecycle state machine over an injected store and
/// notifier.
#[derive(Clone)]
pub struct Lifecycle<S> {
    store: S,
    notifier: Arc<dyn Notifier>,
    clock: Clock,
}

impl<S: BookingStore> Lifecycle<S> {
    /// Create a manager using the real wall clock.
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the time source. Intended for tests.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Reserve a cycle for `owner_id`, generating a fresh unlock code.
    ///
    /// Requires the `user` role. Emits `booking.created` with the full
    /// booking record.
    pub async fn reserve(
        &self,
        requester_role: &str,
        owner_id: DbId,
        place: String,
        cycle_id: String,
    ) -> Result<Booking, CoreError> {
        authorize(requester_role, ROLE_USER)?;

        let booking = self
            .store
            .insert_booking(NewBooking {
                owner_id,
                place,
                cycle_id,
                unlock_code: generate_unlock_code(),
            })
            .await?;

        self.notifier.publish(
            BookingEvent::new(EVENT_BOOKING_CREATED)
                .with_booking(booking.id)
                .with_actor(owner_id)
                .with_payload(serde_json::to_value(&booking).unwrap_or_default()),
        );

        Ok(booking)
    }

    /// Start the ride for a reserved booking.
    ///
    /// Requires the `host` role and the booking's unlock code. The state
    /// check takes precedence over the code check: a booking that has
    /// already started reports `AlreadyStarted` regardless of the code
    /// supplied. Emits `ride.started`.
    pub async fn start_ride(
        &self,
        requester_role: &str,
        booking_id: DbId,
        supplied_code: &str,
    ) -> Result<Booking, CoreError> {
        authorize(requester_role, ROLE_HOST)?;

        let booking = self
            .store
            .find_booking(booking_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })?;

        if booking.state()? != BookingState::Reserved {
            return Err(CoreError::AlreadyStarted(booking_id));
        }
        if booking.unlock_code != supplied_code {
            return Err(CoreError::InvalidCode(booking_id));
        }

        let start_time = (self.clock)();
        let updated = self
            .store
            .begin_ride(booking_id, start_time)
            .await?
            // The conditional write matched nothing: a concurrent caller
            // started the ride between our read and this write.
            .ok_or(CoreError::AlreadyStarted(booking_id))?;

        self.notifier.publish(
            BookingEvent::new(EVENT_RIDE_STARTED)
                .with_booking(booking_id)
                .with_payload(json!({
                    "booking_id": booking_id,
                    "start_time": start_time,
                })),
        );

        Ok(updated)
    }

    /// Stop a started ride, computing duration and cost and recording
    /// an immutable history entry.
    ///
    /// Requires the `host` role. If the history insert fails after the
    /// booking update committed, the booking stays `Stopped` and the
    /// error surfaces as `Internal` (accepted partial-failure mode; no
    /// rollback). Emits `ride.stopped`.
    pub async fn stop_ride(
        &self,
        requester_role: &str,
        booking_id: DbId,
        drop_location: String,
    ) -> Result<RideReceipt, CoreError> {
        authorize(requester_role, ROLE_HOST)?;

        let booking = self
            .store
            .find_booking(booking_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "booking",
                id: booking_id,
            })?;

        match booking.state()? {
            BookingState::Stopped => return Err(CoreError::AlreadyStopped(booking_id)),
            BookingState::Reserved => return Err(CoreError::NotStarted(booking_id)),
            BookingState::Started => {}
        }

        let start_time = booking.start_time.ok_or_else(|| {
            CoreError::Internal(format!("started booking {booking_id} has no start_time"))
        })?;

        let end_time = (self.clock)();
        let elapsed_secs = (end_time - start_time).num_seconds();
        if elapsed_secs < 0 {
            return Err(CoreError::Internal(format!(
                "booking {booking_id} end time precedes start time"
            )));
        }
        let duration_minutes = elapsed_secs / 60;
        let cost = ride_cost(duration_minutes);

        let updated = self
            .store
            .finish_ride(booking_id, end_time, duration_minutes, cost, &drop_location)
            .await?
            .ok_or(CoreError::AlreadyStopped(booking_id))?;

        // The booking is committed as Stopped at this point; a history
        // failure surfaces to the caller but is not rolled back.
        self.store
            .append_history(NewRideHistoryEntry {
                owner_id: updated.owner_id,
                duration_minutes,
                cost,
                drop_location: drop_location.clone(),
            })
            .await?;

        self.notifier.publish(
            BookingEvent::new(EVENT_RIDE_STOPPED)
                .with_booking(booking_id)
                .with_payload(json!({
                    "booking_id": booking_id,
                    "duration_minutes": duration_minutes,
                    "cost": cost,
                    "drop_location": drop_location,
                })),
        );

        Ok(RideReceipt {
            duration_minutes,
            cost,
        })
    }

    /// All bookings not yet stopped, joined with owner emails.
    /// Requires the `host` role.
    pub async fn list_active(
        &self,
        requester_role: &str,
    ) -> Result<Vec<ActiveBooking>, CoreError> {
        authorize(requester_role, ROLE_HOST)?;
        self.store.list_active().await
    }

    /// All completed rides for `owner_id`. Requires the `user` role;
    /// callers must pass the authenticated requester's own id.
    pub async fn list_history(
        &self,
        requester_role: &str,
        owner_id: DbId,
    ) -> Result<Vec<RideHistoryEntry>, CoreError> {
        authorize(requester_role, ROLE_USER)?;
        self.store.history_for_owner(owner_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // In-memory store
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct MemoryState {
        bookings: HashMap<DbId, Booking>,
        history: Vec<RideHistoryEntry>,
        next_booking_id: DbId,
        next_history_id: DbId,
    }

    #[derive(Default)]
    struct MemoryStore {
        inner: Mutex<MemoryState>,
    }

    #[async_trait]
    impl BookingStore for &MemoryStore {
        async fn insert_booking(&self, new: NewBooking) -> Result<Booking, CoreError> {
            let mut state = self.inner.lock().unwrap();
            state.next_booking_id += 1;
            let booking = Booking {
                id: state.next_booking_id,
                owner_id: new.owner_id,
                place: new.place,
                cycle_id: new.cycle_id,
                unlock_code: new.unlock_code,
                started: false,
                stopped: false,
                start_time: None,
                end_time: None,
                duration_minutes: None,
                cost: None,
                drop_location: None,
                created_at: Utc::now(),
            };
            state.bookings.insert(booking.id, booking.clone());
            Ok(booking)
        }

        async fn find_booking(&self, id: DbId) -> Result<Option<Booking>, CoreError> {
            Ok(self.inner.lock().unwrap().bookings.get(&id).cloned())
        }

        async fn begin_ride(
            &self,
            id: DbId,
            start_time: Timestamp,
        ) -> Result<Option<Booking>, CoreError> {
            let mut state = self.inner.lock().unwrap();
            match state.bookings.get_mut(&id) {
                Some(b) if !b.started => {
                    b.started = true;
                    b.start_time = Some(start_time);
                    Ok(Some(b.clone()))
                }
                _ => Ok(None),
            }
        }

        async fn finish_ride(
            &self,
            id: DbId,
            end_time: Timestamp,
            duration_minutes: i64,
            cost: i64,
            drop_location: &str,
        ) -> Result<Option<Booking>, CoreError> {
            let mut state = self.inner.lock().unwrap();
            match state.bookings.get_mut(&id) {
                Some(b) if b.started && !b.stopped => {
                    b.stopped = true;
                    b.end_time = Some(end_time);
                    b.duration_minutes = Some(duration_minutes);
                    b.cost = Some(cost);
                    b.drop_location = Some(drop_location.to_string());
                    Ok(Some(b.clone()))
                }
                _ => Ok(None),
            }
        }

        async fn list_active(&self) -> Result<Vec<ActiveBooking>, CoreError> {
            let state = self.inner.lock().unwrap();
            let mut active: Vec<_> = state
                .bookings
                .values()
                .filter(|b| !b.stopped)
                .cloned()
                .collect();
            active.sort_by_key(|b| b.id);
            Ok(active
                .into_iter()
                .map(|booking| ActiveBooking {
                    owner_email: format!("owner{}@example.com", booking.owner_id),
                    booking,
                })
                .collect())
        }

        async fn append_history(
            &self,
            entry: NewRideHistoryEntry,
        ) -> Result<RideHistoryEntry, CoreError> {
            let mut state = self.inner.lock().unwrap();
            state.next_history_id += 1;
            let row = RideHistoryEntry {
                id: state.next_history_id,
                owner_id: entry.owner_id,
                duration_minutes: entry.duration_minutes,
                cost: entry.cost,
                drop_location: entry.drop_location,
                created_at: Utc::now(),
            };
            state.history.push(row.clone());
            Ok(row)
        }

        async fn history_for_owner(
            &self,
            owner_id: DbId,
        ) -> Result<Vec<RideHistoryEntry>, CoreError> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .history
                .iter()
                .rev()
                .filter(|e| e.owner_id == owner_id)
                .cloned()
                .collect())
        }
    }

    // -----------------------------------------------------------------------
    // Recording notifier and manual clock
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<BookingEvent>>,
    }

    impl Notifier for RecordingNotifier {
        fn publish(&self, event: BookingEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    /// Clock whose current time is set explicitly by the test.
    fn manual_clock(now: Timestamp) -> (Arc<Mutex<Timestamp>>, Clock) {
        let current = Arc::new(Mutex::new(now));
        let handle = Arc::clone(&current);
        let clock: Clock = Arc::new(move || *handle.lock().unwrap());
        (current, clock)
    }

    struct Fixture {
        store: &'static MemoryStore,
        notifier: Arc<RecordingNotifier>,
        clock_handle: Arc<Mutex<Timestamp>>,
        lifecycle: Lifecycle<&'static MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store: &'static MemoryStore = Box::leak(Box::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let (clock_handle, clock) = manual_clock(Utc::now());
        let lifecycle =
            Lifecycle::new(store, notifier.clone() as Arc<dyn Notifier>).with_clock(clock);
        Fixture {
            store,
            notifier,
            clock_handle,
            lifecycle,
        }
    }

    impl Fixture {
        fn advance(&self, by: Duration) {
            let mut now = self.clock_handle.lock().unwrap();
            *now += by;
        }

        fn event_types(&self) -> Vec<String> {
            self.notifier
                .events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type.clone())
                .collect()
        }
    }

    const OWNER: DbId = 7;

    async fn reserve(fx: &Fixture) -> Booking {
        fx.lifecycle
            .reserve(ROLE_USER, OWNER, "Central Station".into(), "C1".into())
            .await
            .expect("reserve should succeed")
    }

    // -----------------------------------------------------------------------
    // Reserve
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn fresh_booking_is_reserved_with_code_and_no_cost() {
        let fx = fixture();
        let booking = reserve(&fx).await;

        assert_eq!(booking.state().unwrap(), BookingState::Reserved);
        assert!(!booking.started);
        assert!(!booking.stopped);
        assert!(booking.cost.is_none());
        assert!(booking.start_time.is_none());
        assert_eq!(booking.unlock_code.len(), 6);
        assert_eq!(fx.event_types(), vec!["booking.created"]);
    }

    #[tokio::test]
    async fn host_cannot_reserve() {
        let fx = fixture();
        let result = fx
            .lifecycle
            .reserve(ROLE_HOST, OWNER, "A".into(), "C1".into())
            .await;
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    // -----------------------------------------------------------------------
    // Start
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn correct_code_starts_the_ride_exactly_once() {
        let fx = fixture();
        let booking = reserve(&fx).await;

        let started = fx
            .lifecycle
            .start_ride(ROLE_HOST, booking.id, &booking.unlock_code)
            .await
            .expect("start should succeed");
        assert_eq!(started.state().unwrap(), BookingState::Started);
        assert!(started.start_time.is_some());

        // A second start fails regardless of code correctness.
        let again = fx
            .lifecycle
            .start_ride(ROLE_HOST, booking.id, &booking.unlock_code)
            .await;
        assert_matches!(again, Err(CoreError::AlreadyStarted(_)));

        let wrong = fx.lifecycle.start_ride(ROLE_HOST, booking.id, "XXXXXX").await;
        assert_matches!(wrong, Err(CoreError::AlreadyStarted(_)));
    }

    #[tokio::test]
    async fn wrong_code_never_mutates_state() {
        let fx = fixture();
        let booking = reserve(&fx).await;

        let result = fx.lifecycle.start_ride(ROLE_HOST, booking.id, "WRONG1").await;
        assert_matches!(result, Err(CoreError::InvalidCode(_)));

        let reread = fx
            .store
            .find_booking(booking.id)
            .await
            .unwrap()
            .expect("booking should still exist");
        assert_eq!(reread.state().unwrap(), BookingState::Reserved);
        assert!(reread.start_time.is_none());
    }

    #[tokio::test]
    async fn start_unknown_booking_is_not_found() {
        let fx = fixture();
        let result = fx.lifecycle.start_ride(ROLE_HOST, 999, "ABCDEF").await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn non_host_cannot_start() {
        let fx = fixture();
        let booking = reserve(&fx).await;
        let result = fx
            .lifecycle
            .start_ride(ROLE_USER, booking.id, &booking.unlock_code)
            .await;
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn stop_before_start_is_not_started() {
        let fx = fixture();
        let booking = reserve(&fx).await;
        let result = fx
            .lifecycle
            .stop_ride(ROLE_HOST, booking.id, "DropX".into())
            .await;
        assert_matches!(result, Err(CoreError::NotStarted(_)));
    }

    #[tokio::test]
    async fn second_stop_is_already_stopped() {
        let fx = fixture();
        let booking = reserve(&fx).await;
        fx.lifecycle
            .start_ride(ROLE_HOST, booking.id, &booking.unlock_code)
            .await
            .unwrap();
        fx.lifecycle
            .stop_ride(ROLE_HOST, booking.id, "DropX".into())
            .await
            .unwrap();

        let again = fx
            .lifecycle
            .stop_ride(ROLE_HOST, booking.id, "DropY".into())
            .await;
        assert_matches!(again, Err(CoreError::AlreadyStopped(_)));
    }

    #[tokio::test]
    async fn stop_unknown_booking_is_not_found() {
        let fx = fixture();
        let result = fx.lifecycle.stop_ride(ROLE_HOST, 42, "DropX".into()).await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn non_host_cannot_stop() {
        let fx = fixture();
        let booking = reserve(&fx).await;
        let result = fx
            .lifecycle
            .stop_ride(ROLE_USER, booking.id, "DropX".into())
            .await;
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[tokio::test]
    async fn partial_minutes_are_floored() {
        let fx = fixture();
        let booking = reserve(&fx).await;
        fx.lifecycle
            .start_ride(ROLE_HOST, booking.id, &booking.unlock_code)
            .await
            .unwrap();

        fx.advance(Duration::seconds(90));
        let receipt = fx
            .lifecycle
            .stop_ride(ROLE_HOST, booking.id, "DropX".into())
            .await
            .unwrap();
        assert_eq!(receipt.duration_minutes, 1);
        assert_eq!(receipt.cost, 10);
    }

    #[tokio::test]
    async fn clock_regression_is_an_invariant_violation() {
        let fx = fixture();
        let booking = reserve(&fx).await;
        fx.lifecycle
            .start_ride(ROLE_HOST, booking.id, &booking.unlock_code)
            .await
            .unwrap();

        fx.advance(Duration::minutes(-5));
        let result = fx
            .lifecycle
            .stop_ride(ROLE_HOST, booking.id, "DropX".into())
            .await;
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn list_active_requires_host_and_excludes_stopped() {
        let fx = fixture();
        let first = reserve(&fx).await;
        let second = reserve(&fx).await;

        assert_matches!(
            fx.lifecycle.list_active(ROLE_USER).await,
            Err(CoreError::Forbidden(_))
        );

        fx.lifecycle
            .start_ride(ROLE_HOST, first.id, &first.unlock_code)
            .await
            .unwrap();
        fx.lifecycle
            .stop_ride(ROLE_HOST, first.id, "DropX".into())
            .await
            .unwrap();

        let active = fx.lifecycle.list_active(ROLE_HOST).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].booking.id, second.id);
        assert_eq!(active[0].owner_email, format!("owner{OWNER}@example.com"));
    }

    #[tokio::test]
    async fn list_history_requires_user_role() {
        let fx = fixture();
        assert_matches!(
            fx.lifecycle.list_history(ROLE_HOST, OWNER).await,
            Err(CoreError::Forbidden(_))
        );
    }

    // -----------------------------------------------------------------------
    // End-to-end
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn full_ride_produces_receipt_history_and_events() {
        let fx = fixture();
        let booking = fx
            .lifecycle
            .reserve(ROLE_USER, OWNER, "A".into(), "C1".into())
            .await
            .unwrap();
        let code = booking.unlock_code.clone();

        fx.lifecycle
            .start_ride(ROLE_HOST, booking.id, &code)
            .await
            .unwrap();

        // A wrong code after start fails without disturbing the ride.
        let wrong = fx.lifecycle.start_ride(ROLE_HOST, booking.id, "ZZZZZZ").await;
        assert_matches!(wrong, Err(CoreError::AlreadyStarted(_)));

        fx.advance(Duration::minutes(45));
        let receipt = fx
            .lifecycle
            .stop_ride(ROLE_HOST, booking.id, "DropX".into())
            .await
            .unwrap();
        assert_eq!(receipt.duration_minutes, 45);
        assert_eq!(receipt.cost, 59);

        let history = fx.lifecycle.list_history(ROLE_USER, OWNER).await.unwrap();
        assert_eq!(history.len(), 1, "exactly one history entry per ride");
        assert_eq!(history[0].owner_id, OWNER);
        assert_eq!(history[0].duration_minutes, 45);
        assert_eq!(history[0].cost, 59);
        assert_eq!(history[0].drop_location, "DropX");

        assert_eq!(
            fx.event_types(),
            vec!["booking.created", "ride.started", "ride.stopped"]
        );

        let events = fx.notifier.events.lock().unwrap();
        let stopped = events.last().unwrap();
        assert_eq!(stopped.booking_id, Some(booking.id));
        assert_eq!(stopped.payload["duration_minutes"], 45);
        assert_eq!(stopped.payload["cost"], 59);
        assert_eq!(stopped.payload["drop_location"], "DropX");
    }
}
