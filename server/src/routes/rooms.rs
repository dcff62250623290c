//! Room operations over plain HTTP.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;

use crate::state::AppState;

/// Wipe a room's live canvas: broadcasts the clear sentinel to every member.
/// Durable history is untouched; wiping it belongs to the persistence
/// service.
pub async fn clear_room(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Json<serde_json::Value> {
    let delivered = state.hub.clear(&room).await;
    info!(%room, delivered, "operator cleared room");
    Json(serde_json::json!({ "room": room, "delivered": delivered }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clear_on_empty_room_reports_zero_deliveries() {
        let state = AppState::new();
        let Json(body) = clear_room(State(state), Path("r".to_owned())).await;
        assert_eq!(body["room"], "r");
        assert_eq!(body["delivered"], 0);
    }
}
