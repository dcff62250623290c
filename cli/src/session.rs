//! Live room session: join, concurrent history fetch, merge loop.
//!
//! The sequence mirrors the browser client. The join goes out as the first
//! message on the socket; the history fetch starts at the same time and
//! races live traffic inside one `select!` loop. Live events append as they
//! arrive; when the fetch resolves its shapes are prepended exactly once
//! (history-first ordering), and a fetch failure degrades to an empty
//! history with a printed notice rather than ending the session.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use canvas::engine::EngineCore;
use futures_util::StreamExt;
use shapes::{Envelope, RoomEvent, Shape, decode_envelope};
use tokio_tungstenite::tungstenite::Message;

use crate::{CliContext, CliError, connect_and_join, history};

pub async fn run(ctx: &CliContext) -> Result<(), CliError> {
    let mut ws = connect_and_join(&ctx.ws_url, &ctx.room).await?;
    println!("joined room {}; reconciling history", ctx.room);

    let mut core = EngineCore::new();
    let fetch = history::fetch_history(&ctx.http_url, &ctx.room);
    tokio::pin!(fetch);
    let mut history_pending = true;

    loop {
        tokio::select! {
            result = &mut fetch, if history_pending => {
                history_pending = false;
                match result {
                    Ok(shapes) => {
                        let fetched = shapes.len();
                        core.load_history(shapes);
                        println!("history loaded: {fetched} shapes ({} on canvas)", core.buffer.len());
                    }
                    Err(e) => {
                        // Degraded sync: cold canvas, session keeps running.
                        eprintln!("history unavailable ({e}); starting with an empty canvas");
                        core.load_history(Vec::new());
                    }
                }
            }
            msg = ws.next() => {
                let Some(msg) = msg else {
                    return Err(CliError::WsClosed);
                };
                let msg = msg.map_err(|e| CliError::WsRead(Box::new(e)))?;
                match msg {
                    Message::Text(text) => {
                        if let Some(line) = apply_inbound(&mut core, text.as_str()) {
                            println!("{line}");
                        }
                    }
                    Message::Close(_) => return Err(CliError::WsClosed),
                    _ => {}
                }
            }
        }
    }
}

/// Apply one inbound wire message to the engine.
///
/// Returns the line to print for it, or `None` when the message was dropped
/// (malformed, or not a room message). Dropping never disturbs the buffer.
fn apply_inbound(core: &mut EngineCore, text: &str) -> Option<String> {
    let event = match decode_envelope(text) {
        Ok(Envelope::MessageRoom { message, .. }) => match RoomEvent::decode(&message) {
            Ok(event) => event,
            Err(e) => {
                eprintln!("dropping malformed room event: {e}");
                return None;
            }
        },
        // The hub never forwards joins; tolerate and ignore.
        Ok(Envelope::JoinRoom { .. }) => return None,
        Err(e) => {
            eprintln!("dropping malformed envelope: {e}");
            return None;
        }
    };

    let line = match &event {
        RoomEvent::Shape(shape) => format!("+ {}", describe(shape)),
        RoomEvent::Clear => "canvas cleared".to_owned(),
    };
    core.apply_remote(event);
    Some(format!("{line} ({} on canvas)", core.buffer.len()))
}

/// Human-readable one-liner for a shape.
pub fn describe(shape: &Shape) -> String {
    match shape {
        Shape::Rect { x, y, width, height, .. } => {
            format!("rect at ({x}, {y}) extent {width}x{height}")
        }
        Shape::Circle { center_x, center_y, radius, .. } => {
            format!("circle at ({center_x}, {center_y}) radius {radius}")
        }
        Shape::Pencil { start_x, start_y, end_x, end_y, .. } => {
            format!("pencil ({start_x}, {start_y}) -> ({end_x}, {end_y})")
        }
    }
}
