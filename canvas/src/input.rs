//! Input model: tools, session colors, and the gesture state machine.
//!
//! `Tool` and `UiState` capture the user's intent at the time of a pointer
//! event. `GestureState` is the active drag being tracked between
//! pointer-down and pointer-up; it carries the anchor needed to derive the
//! final shape geometry on release and the last pointer position needed to
//! compute incremental pan deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Which tool is currently active. Selected by the user, orthogonal to
/// connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// No drawing tool (default). Dragging pans the view.
    #[default]
    Pan,
    /// Draw a rectangle.
    Rect,
    /// Draw a circle.
    Circle,
    /// Draw a straight pencil segment.
    Pencil,
}

impl Tool {
    /// Whether a drag with this tool produces a shape on release.
    #[must_use]
    pub fn draws(self) -> bool {
        !matches!(self, Self::Pan)
    }
}

/// Persistent per-session drawing settings.
///
/// The colors here apply to shapes the session creates (and to the live
/// preview); rendering committed shapes always uses the colors stored on
/// each shape.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Stroke color for newly created shapes, as a CSS color string.
    pub stroke: String,
    /// Fill color for newly created shapes; `None` draws stroke-only.
    pub fill: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Pan,
            stroke: "rgba(255, 255, 255)".to_owned(),
            fill: Some("rgba(0, 0, 0)".to_owned()),
        }
    }
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, Default)]
pub enum GestureState {
    /// No drag in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The pointer is down and moving.
    Dragging {
        /// Screen-space position where the drag started; the geometry anchor.
        anchor: Point,
        /// Screen-space position of the previous pointer event, used to
        /// compute pan deltas.
        last: Point,
    },
}

impl GestureState {
    /// Whether a drag is currently in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}
