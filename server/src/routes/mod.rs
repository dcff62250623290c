//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hub exposes three endpoints: the realtime socket at `/ws`, an
//! operator clear at `/rooms/{room}/clear`, and `/healthz`. Durable history
//! lives behind an external persistence service; nothing here reads or
//! writes it.

pub mod rooms;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/rooms/{room}/clear", post(rooms::clear_room))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
