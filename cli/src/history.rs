//! Reconciliation fetch: the room's persisted shape history.
//!
//! The persistence service records every room message it sees; replaying the
//! record stream through the event codec rebuilds the canvas a late joiner
//! missed. Any failure — store unreachable, non-2xx status, malformed
//! record — is reported as one [`HistoryError`] and the caller degrades to
//! an empty history, so drawing stays usable on a cold start.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use serde::Deserialize;
use shapes::{RoomEvent, Shape};

/// Failure to produce a usable history. Never fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("history record {index} is malformed: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: shapes::CodecError,
    },
}

/// Response body of `GET /rooms/{room}/history`.
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    chats: Vec<HistoryRecord>,
}

/// One persisted room message, oldest first.
#[derive(Debug, Deserialize)]
pub struct HistoryRecord {
    /// The encoded event payload, exactly as it traveled on the wire.
    pub message: String,
}

/// Fetch and decode a room's persisted history.
///
/// # Errors
///
/// Returns [`HistoryError`] when the store is unreachable or a record fails
/// to decode. Callers log and continue with an empty history.
pub async fn fetch_history(http_url: &str, room: &str) -> Result<Vec<Shape>, HistoryError> {
    let url = format!("{}/rooms/{room}/history", http_url.trim_end_matches('/'));
    let response = reqwest::get(&url).await?.error_for_status()?;
    let body: HistoryResponse = response.json().await?;
    shapes_from_records(&body.chats)
}

/// Replay persisted records into the shape sequence they describe.
pub fn shapes_from_records(records: &[HistoryRecord]) -> Result<Vec<Shape>, HistoryError> {
    let mut shapes = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match RoomEvent::decode(&record.message) {
            Ok(RoomEvent::Shape(shape)) => shapes.push(shape),
            // A persisted clear wiped everything drawn before it.
            Ok(RoomEvent::Clear) => shapes.clear(),
            Err(source) => return Err(HistoryError::MalformedRecord { index, source }),
        }
    }
    Ok(shapes)
}
