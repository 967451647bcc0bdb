//! Booking event to WebSocket routing.

use std::sync::Arc;

use axum::extract::ws::Message;
use cyclebook_core::notify::BookingEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Routes booking events to WebSocket clients.
///
/// Consumes events from the broadcast channel and forwards each one, as a
/// JSON text frame, to the room of the booking it concerns. Events without
/// a booking id are dropped.
pub struct NotificationRouter {
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    /// Create a new router with the given WebSocket manager.
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](cyclebook_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<BookingEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.route_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Forward a single event to the room of its booking.
    async fn route_event(&self, event: &BookingEvent) {
        let Some(booking_id) = event.booking_id else {
            tracing::debug!(event_type = %event.event_type, "Event without booking id, skipping");
            return;
        };

        let msg = serde_json::json!({
            "type": "booking_update",
            "event_type": event.event_type,
            "booking_id": booking_id,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });

        let delivered = self
            .ws_manager
            .send_to_room(booking_id, Message::Text(msg.to_string().into()))
            .await;
        tracing::debug!(
            event_type = %event.event_type,
            booking_id,
            delivered,
            "Routed booking event"
        );
    }
}
