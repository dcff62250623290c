//! WebSocket handler — the session loop and inbound dispatch.
//!
//! DESIGN
//! ======
//! On upgrade, each connection gets an id and a bounded outbound channel,
//! then enters a `select!` loop:
//! - Inbound text → decode envelope + dispatch (join or relay)
//! - Deliveries from room peers → forward to the socket
//!
//! The hub never writes to sockets directly; it fills the outbound channels
//! and this loop drains them, so a slow socket only ever backs up its own
//! channel.
//!
//! ERROR POLICY (deterministic, documented here)
//! =============================================
//! - Malformed envelopes are dropped and counted; the count is logged at
//!   disconnect. Never fatal.
//! - A second `joinRoom` is rejected (`AlreadyJoined`); the session keeps
//!   its original room. A session's room is set exactly once.
//! - `messageRoom` before a join, or addressed to a room the session is not
//!   a member of, is rejected (`NotJoined`) and not relayed. The wire
//!   protocol has no error envelope, so rejection is a warn log plus a drop.
//! - Membership cleanup runs on every exit path of the loop.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use shapes::{Envelope, RoomId, decode_envelope};

use crate::hub::{ConnId, HubError};
use crate::state::AppState;

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;

/// Outbound queue depth per connection. A member that falls this far behind
/// is treated as dead by the next broadcast.
const OUTBOUND_BUFFER: usize = 256;

/// One live connection's dispatch state.
struct Session {
    conn_id: ConnId,
    /// Set exactly once by the first successful `joinRoom`.
    room: Option<RoomId>,
    /// Sender handed to the hub at join time.
    tx: mpsc::Sender<String>,
    /// Malformed inbound envelopes dropped so far.
    malformed: u64,
}

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);
    let mut session = Session { conn_id, room: None, tx, malformed: 0 };

    info!(%conn_id, "ws: session connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        if let Err(e) = dispatch_text(&state, &mut session, &text).await {
                            warn!(%conn_id, error = %e, "ws: rejected inbound message");
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            delivery = rx.recv() => {
                let Some(payload) = delivery else { break };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    // Cleanup must run on every exit path, or the room keeps a stale member.
    if let Some(room) = session.room.take() {
        state.hub.leave(&room, conn_id).await;
    }
    info!(%conn_id, malformed = session.malformed, "ws: session disconnected");
}

/// Decode and apply one inbound text message.
///
/// Relayed payloads are forwarded byte-for-byte: the hub treats the message
/// content as opaque, so peers receive exactly what the sender wrote.
///
/// # Errors
///
/// Returns [`HubError`] on protocol misuse; the caller logs and keeps the
/// connection open. Malformed envelopes are not errors here — they are
/// counted on the session and dropped.
async fn dispatch_text(
    state: &AppState,
    session: &mut Session,
    text: &str,
) -> Result<(), HubError> {
    let envelope = match decode_envelope(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            session.malformed += 1;
            warn!(conn = %session.conn_id, error = %e, "ws: dropping malformed envelope");
            return Ok(());
        }
    };

    match envelope {
        Envelope::JoinRoom { room } => {
            if let Some(current) = &session.room {
                return Err(HubError::AlreadyJoined(current.clone()));
            }
            state
                .hub
                .join(&room, session.conn_id, session.tx.clone())
                .await;
            session.room = Some(room);
            Ok(())
        }
        Envelope::MessageRoom { room, .. } => {
            if session.room.as_deref() != Some(room.as_str()) {
                return Err(HubError::NotJoined(room));
            }
            state
                .hub
                .broadcast(&room, text, Some(session.conn_id))
                .await;
            Ok(())
        }
    }
}
