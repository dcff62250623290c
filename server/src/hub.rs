//! Room hub — membership registry and per-room fan-out.
//!
//! DESIGN
//! ======
//! The hub maps `room id -> live member senders`. Rooms are created
//! implicitly by the first join and evicted when the last member leaves, so
//! the table never grows with dead rooms. Rooms partition independently: the
//! registry lock is held only to snapshot or mutate membership, never across
//! a member's transport, so no room can stall another.
//!
//! ERROR HANDLING
//! ==============
//! Delivery to one member is isolated. A member whose channel is full or
//! closed is logged and evicted after the fan-out; the remaining members
//! still receive the payload. Protocol misuse (`AlreadyJoined` / `NotJoined`)
//! is surfaced to the dispatch layer, which rejects the offending message
//! and keeps the connection open.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{info, warn};
use uuid::Uuid;

use shapes::{Envelope, RoomEvent, RoomId, encode_envelope};

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;

/// Identifier for one live connection.
pub type ConnId = Uuid;

/// Protocol misuse detected while applying an inbound message.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The session sent a second `joinRoom`; a session's room is set exactly
    /// once and is immutable afterwards.
    #[error("session already joined room {0}")]
    AlreadyJoined(RoomId),
    /// The session addressed a room it is not a member of (including any
    /// drawing traffic sent before its join).
    #[error("session has not joined room {0}")]
    NotJoined(RoomId),
}

/// Per-room live state: member connections and their outbound senders.
#[derive(Default)]
struct RoomState {
    members: HashMap<ConnId, mpsc::Sender<String>>,
}

/// Registry of rooms and their members.
///
/// Payloads are opaque to the hub: it delivers pre-encoded envelope text and
/// never inspects shape content.
#[derive(Clone, Default)]
pub struct RoomHub {
    rooms: Arc<RwLock<HashMap<RoomId, RoomState>>>,
}

impl RoomHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // JOIN / LEAVE
    // =========================================================================

    /// Register a connection under a room, creating the room if this is its
    /// first member. Join-once enforcement happens in the dispatch layer,
    /// which owns the session's room slot.
    pub async fn join(&self, room: &str, conn: ConnId, tx: mpsc::Sender<String>) {
        let mut rooms = self.rooms.write().await;
        let state = rooms.entry(room.to_owned()).or_default();
        state.members.insert(conn, tx);
        info!(%room, %conn, members = state.members.len(), "session joined room");
    }

    /// Remove a connection from a room's member set. A no-op if the session
    /// never joined. Evicts the room entry when the last member leaves.
    pub async fn leave(&self, room: &str, conn: ConnId) {
        let mut rooms = self.rooms.write().await;
        let Some(state) = rooms.get_mut(room) else {
            return;
        };

        if state.members.remove(&conn).is_some() {
            info!(%room, %conn, remaining = state.members.len(), "session left room");
        }
        if state.members.is_empty() {
            rooms.remove(room);
            info!(%room, "evicted empty room");
        }
    }

    /// Number of live members in a room. Zero for unknown rooms.
    pub async fn member_count(&self, room: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room).map_or(0, |state| state.members.len())
    }

    // =========================================================================
    // FAN-OUT
    // =========================================================================

    /// Deliver `payload` to every current member of `room` except `exclude`.
    /// Returns the number of members delivered to.
    ///
    /// Delivery is non-blocking: a member whose channel is full or closed is
    /// marked stale and evicted after the fan-out, without affecting the
    /// rest of the room.
    pub async fn broadcast(&self, room: &str, payload: &str, exclude: Option<ConnId>) -> usize {
        let mut delivered = 0;
        let mut stale = Vec::new();
        {
            let rooms = self.rooms.read().await;
            let Some(state) = rooms.get(room) else {
                return 0;
            };

            for (conn, tx) in &state.members {
                if exclude == Some(*conn) {
                    continue;
                }
                match tx.try_send(payload.to_owned()) {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        warn!(%room, %conn, error = %e, "peer delivery failed; evicting member");
                        stale.push(*conn);
                    }
                }
            }
        }

        for conn in stale {
            self.leave(room, conn).await;
        }
        delivered
    }

    /// Broadcast the clear sentinel to every member of `room`. The hub has
    /// no durable-state responsibility; wiping persisted history belongs to
    /// the persistence collaborator.
    pub async fn clear(&self, room: &str) -> usize {
        let payload = encode_envelope(&Envelope::message(room, &RoomEvent::Clear));
        self.broadcast(room, &payload, None).await
    }
}
