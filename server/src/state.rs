//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds exactly one thing: the room hub registry. The hub is an explicit
//! object rather than ambient global state, so multiple instances can run
//! side by side in tests.

use crate::hub::RoomHub;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — the hub's registry is Arc-backed.
#[derive(Clone, Default)]
pub struct AppState {
    pub hub: RoomHub,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { hub: RoomHub::new() }
    }
}
