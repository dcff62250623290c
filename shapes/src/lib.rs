//! Shared shape model and JSON codec for realtime room transport.
//!
//! This crate owns the wire representation used by both `server` and `cli`
//! (and by the `canvas` engine's buffer). Two layers travel on the wire:
//! the outer [`Envelope`] (`joinRoom` / `messageRoom`) and, inside a
//! `messageRoom`, a JSON-encoded *string* whose decoded form is
//! `{"shape": <shape>}` or the clear sentinel `{"shape": "clear"}`. Existing
//! clients expect that double encoding; [`RoomEvent`] hides it so neither
//! peer touches the nesting by hand.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque room identifier. Rooms are named broadcast domains; ids are minted
/// by an external collaborator and never interpreted here.
pub type RoomId = String;

/// Error returned by the decode half of the codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The outer envelope is not valid JSON or has an unknown `type`.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),
    /// The inner room-message payload is not valid JSON.
    #[error("malformed room event: {0}")]
    MalformedEvent(#[source] serde_json::Error),
    /// The room-message payload has no `shape` field.
    #[error("room event has no shape field")]
    MissingShape,
    /// The `shape` value has an unknown discriminant or missing fields.
    #[error("malformed shape: {0}")]
    MalformedShape(#[source] serde_json::Error),
}

// =============================================================================
// SHAPE
// =============================================================================

/// An immutable drawable record.
///
/// Coordinates are floating-point room-space values; any pan offset is
/// subtracted before a shape is constructed, so stored shapes are
/// view-independent. `stroke` is a CSS color string; `fill` of `None` means
/// the shape renders stroke-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned rectangle anchored at `(x, y)`. `width` / `height` may be
    /// negative, meaning the rectangle extends left/up of the anchor; that
    /// orientation is observable and must survive the wire.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        stroke: String,
        fill: Option<String>,
    },
    /// Circle by center and radius.
    #[serde(rename_all = "camelCase")]
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
        stroke: String,
        fill: Option<String>,
    },
    /// One straight pencil segment from press point to release point.
    #[serde(rename_all = "camelCase")]
    Pencil {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        stroke: String,
        fill: Option<String>,
    },
}

impl Shape {
    /// Copy of this shape with every stored coordinate displaced by
    /// `(dx, dy)`. Used to move between room space and view space.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match self.clone() {
            Self::Rect { x, y, width, height, stroke, fill } => {
                Self::Rect { x: x + dx, y: y + dy, width, height, stroke, fill }
            }
            Self::Circle { center_x, center_y, radius, stroke, fill } => Self::Circle {
                center_x: center_x + dx,
                center_y: center_y + dy,
                radius,
                stroke,
                fill,
            },
            Self::Pencil { start_x, start_y, end_x, end_y, stroke, fill } => Self::Pencil {
                start_x: start_x + dx,
                start_y: start_y + dy,
                end_x: end_x + dx,
                end_y: end_y + dy,
                stroke,
                fill,
            },
        }
    }

    /// Stroke color of any variant.
    #[must_use]
    pub fn stroke(&self) -> &str {
        match self {
            Self::Rect { stroke, .. } | Self::Circle { stroke, .. } | Self::Pencil { stroke, .. } => stroke,
        }
    }

    /// Fill color of any variant, if one is set.
    #[must_use]
    pub fn fill(&self) -> Option<&str> {
        match self {
            Self::Rect { fill, .. } | Self::Circle { fill, .. } | Self::Pencil { fill, .. } => fill.as_deref(),
        }
    }
}

/// Encode a shape into its self-describing JSON form.
#[must_use]
pub fn encode_shape(shape: &Shape) -> String {
    serde_json::to_string(shape).unwrap_or_default()
}

/// Decode a shape from its JSON form, dispatching on the `type` discriminant.
///
/// # Errors
///
/// Returns [`CodecError::MalformedShape`] for unknown discriminants or
/// missing required fields. Callers drop the single message and continue;
/// this error is never fatal to a session.
pub fn decode_shape(raw: &str) -> Result<Shape, CodecError> {
    serde_json::from_str(raw).map_err(CodecError::MalformedShape)
}

// =============================================================================
// ROOM EVENT
// =============================================================================

/// The payload carried inside a `messageRoom`: a new shape, or the clear
/// sentinel that empties every member's buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Shape(Shape),
    Clear,
}

impl RoomEvent {
    /// Encode into the `{"shape": …}` payload string.
    #[must_use]
    pub fn encode(&self) -> String {
        let payload = match self {
            Self::Shape(shape) => serde_json::json!({ "shape": shape }),
            Self::Clear => serde_json::json!({ "shape": "clear" }),
        };
        payload.to_string()
    }

    /// Decode a `{"shape": …}` payload string.
    ///
    /// The clear sentinel is distinguished before shape decoding so no real
    /// shape can shadow it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedEvent`] for invalid JSON,
    /// [`CodecError::MissingShape`] when the `shape` field is absent, and
    /// [`CodecError::MalformedShape`] when the field holds neither the
    /// sentinel nor a well-formed shape.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(raw).map_err(CodecError::MalformedEvent)?;
        let shape = value.get("shape").ok_or(CodecError::MissingShape)?;

        if shape.as_str() == Some("clear") {
            return Ok(Self::Clear);
        }
        let shape = Shape::deserialize(shape).map_err(CodecError::MalformedShape)?;
        Ok(Self::Shape(shape))
    }
}

// =============================================================================
// ENVELOPE
// =============================================================================

/// A single message on the realtime wire.
///
/// `joinRoom` is the logical first application message on a new connection;
/// `messageRoom` flows both directions (client announces, hub delivers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Envelope {
    #[serde(rename = "joinRoom")]
    JoinRoom { room: RoomId },
    #[serde(rename = "messageRoom")]
    MessageRoom { room: RoomId, message: String },
}

impl Envelope {
    /// Build the join message for a room.
    #[must_use]
    pub fn join(room: impl Into<RoomId>) -> Self {
        Self::JoinRoom { room: room.into() }
    }

    /// Build a room message carrying an encoded event.
    #[must_use]
    pub fn message(room: impl Into<RoomId>, event: &RoomEvent) -> Self {
        Self::MessageRoom { room: room.into(), message: event.encode() }
    }

    /// The room this envelope addresses.
    #[must_use]
    pub fn room(&self) -> &str {
        match self {
            Self::JoinRoom { room } | Self::MessageRoom { room, .. } => room,
        }
    }
}

/// Encode an envelope to its wire JSON.
#[must_use]
pub fn encode_envelope(envelope: &Envelope) -> String {
    serde_json::to_string(envelope).unwrap_or_default()
}

/// Decode an envelope from wire JSON.
///
/// # Errors
///
/// Returns [`CodecError::MalformedEnvelope`] for invalid JSON or an unknown
/// `type` discriminant. The receiving session drops the message and stays up.
pub fn decode_envelope(raw: &str) -> Result<Envelope, CodecError> {
    serde_json::from_str(raw).map_err(CodecError::MalformedEnvelope)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
