use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use cyclebook_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Authenticated user ID, if the connection has been authenticated.
    pub user_id: Option<DbId>,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Manages all active WebSocket connections and their booking rooms.
///
/// A room is keyed by booking id; clients join a room to receive updates
/// for that booking only. Thread-safe via interior `RwLock`; designed to
/// be wrapped in `Arc` and shared across the application.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
    rooms: RwLock<HashMap<DbId, HashSet<String>>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: Option<DbId>,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID, leaving any rooms it joined.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);

        let mut rooms = self.rooms.write().await;
        rooms.retain(|_, members| {
            members.remove(conn_id);
            !members.is_empty()
        });
    }

    /// Add a connection to the room for the given booking.
    pub async fn join_room(&self, booking_id: DbId, conn_id: &str) {
        self.rooms
            .write()
            .await
            .entry(booking_id)
            .or_default()
            .insert(conn_id.to_string());
    }

    /// Remove a connection from the room for the given booking.
    pub async fn leave_room(&self, booking_id: DbId, conn_id: &str) {
        let mut rooms = self.rooms.write().await;
        if let Some(members) = rooms.get_mut(&booking_id) {
            members.remove(conn_id);
            if members.is_empty() {
                rooms.remove(&booking_id);
            }
        }
    }

    /// Send a message to every connection in the given booking's room.
    ///
    /// Returns the number of connections the message was sent to.
    pub async fn send_to_room(&self, booking_id: DbId, message: Message) -> usize {
        let rooms = self.rooms.read().await;
        let Some(members) = rooms.get(&booking_id) else {
            return 0;
        };

        let conns = self.connections.read().await;
        let mut count = 0;
        for conn_id in members {
            if let Some(conn) = conns.get(conn_id) {
                let _ = conn.sender.send(message.clone());
                count += 1;
            }
        }
        count
    }

    /// Broadcast a message to all connected clients.
    ///
    /// Connections whose send channels are closed are silently skipped
    /// (they will be cleaned up on their next receive loop iteration).
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(message.clone());
        }
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the maps.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        // Release the connections guard before touching rooms:
        // send_to_room acquires rooms then connections, so holding
        // connections across the rooms lock can deadlock with an
        // in-flight delivery.
        let count = {
            let mut conns = self.connections.write().await;
            let count = conns.len();
            for conn in conns.values() {
                let _ = conn.sender.send(Message::Close(None));
            }
            conns.clear();
            count
        };
        self.rooms.write().await.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Spawn the keepalive task for this manager.
    ///
    /// Booking-watch connections sit idle between lifecycle events, so
    /// the task pings every connection at a fixed interval to keep
    /// proxies from cutting them and to surface dead sockets. Runs
    /// until the returned handle is aborted at shutdown.
    pub fn spawn_keepalive(self: &std::sync::Arc<Self>) -> tokio::task::JoinHandle<()> {
        let manager = std::sync::Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(KEEPALIVE_INTERVAL);
            loop {
                interval.tick().await;
                let count = manager.connection_count().await;
                tracing::debug!(count, "Pinging WebSocket connections");
                manager.ping_all().await;
            }
        })
    }
}

/// How often the keepalive task pings every connection.
const KEEPALIVE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
