//! Drawing and reconciliation engine for the shared room canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! client half of shape synchronization: translating raw pointer events into
//! committed [`shapes::Shape`] records, keeping the append-only local shape
//! buffer consistent with remote traffic and fetched history, and rendering
//! the scene. The host layer is responsible only for wiring DOM events to the
//! engine and transmitting the [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`buffer`] | Append-only shape buffer and the history merge rule |
//! | [`camera`] | Pan-offset view transform and coordinate conversions |
//! | [`input`] | Tools, session colors, and the gesture state machine |
//! | [`render`] | Full-scene rendering to the 2D context |

pub mod buffer;
pub mod camera;
pub mod engine;
pub mod input;
pub mod render;
