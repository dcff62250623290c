use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use shapes::{RoomEvent, Shape};

use crate::buffer::ShapeBuffer;
use crate::camera::{Camera, Point};
use crate::input::{GestureState, Tool, UiState};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
///
/// The engine never talks to the network itself; committing a shape or a
/// clear hands the host something to transmit as a room message.
#[derive(Debug, Clone)]
pub enum Action {
    /// Nothing for the host to do.
    None,
    /// A shape entered the local buffer; transmit it to the room and
    /// re-render.
    ShapeCommitted(Shape),
    /// The local buffer was emptied on user request; transmit the clear
    /// sentinel to the room and re-render.
    ClearCommitted,
    /// Renderer-visible state changed; re-render.
    RenderNeeded,
}

/// Compute the shape a drag from `anchor` to `release` produces under a
/// tool, in the coordinate space of the two points.
///
/// Geometry rules:
/// - rectangle: anchored at the press point; width/height are signed, so a
///   drag up-left yields negative extents that rendering must honor.
/// - circle: `radius = max(|dx|, |dy|) / 2`, center offset from the anchor
///   by the radius on both axes. The center is not the segment midpoint;
///   the asymmetric rule is what peers render, so it must match exactly.
/// - pencil: one straight segment from press to release.
#[must_use]
pub fn shape_between(
    tool: Tool,
    anchor: Point,
    release: Point,
    stroke: &str,
    fill: Option<&str>,
) -> Option<Shape> {
    let width = release.x - anchor.x;
    let height = release.y - anchor.y;
    let stroke = stroke.to_owned();
    let fill = fill.map(str::to_owned);

    match tool {
        Tool::Pan => None,
        Tool::Rect => Some(Shape::Rect { x: anchor.x, y: anchor.y, width, height, stroke, fill }),
        Tool::Circle => {
            let radius = (width.abs().max(height.abs())) / 2.0;
            Some(Shape::Circle {
                center_x: anchor.x + radius,
                center_y: anchor.y + radius,
                radius,
                stroke,
                fill,
            })
        }
        Tool::Pencil => Some(Shape::Pencil {
            start_x: anchor.x,
            start_y: anchor.y,
            end_x: release.x,
            end_y: release.y,
            stroke,
            fill,
        }),
    }
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from [`Engine`] so the gesture machine, geometry, and buffer
/// reconciliation can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub buffer: ShapeBuffer,
    pub camera: Camera,
    pub ui: UiState,
    pub gesture: GestureState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Tool / colors ---

    /// Set the active tool. Does not interrupt a drag in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    /// Set the stroke and fill colors for shapes this session creates.
    pub fn set_colors(&mut self, stroke: impl Into<String>, fill: Option<String>) {
        self.ui.stroke = stroke.into();
        self.ui.fill = fill;
    }

    // --- Pointer events ---

    /// Pointer pressed: anchor a new drag.
    pub fn on_pointer_down(&mut self, screen: Point) -> Action {
        self.gesture = GestureState::Dragging { anchor: screen, last: screen };
        Action::None
    }

    /// Pointer moved. While dragging with a drawing tool this only advances
    /// the preview; with the pan tool it accumulates the view offset.
    pub fn on_pointer_move(&mut self, screen: Point) -> Action {
        let GestureState::Dragging { last, .. } = &mut self.gesture else {
            return Action::None;
        };

        if self.ui.tool == Tool::Pan {
            let (dx, dy) = (screen.x - last.x, screen.y - last.y);
            *last = screen;
            self.camera.pan_by(dx, dy);
        } else {
            *last = screen;
        }
        Action::RenderNeeded
    }

    /// Pointer released: finalize the drag.
    ///
    /// The committed shape uses the release position as its second point and
    /// is translated out of the current pan offset, so it is stored in
    /// room-space coordinates that peers can render under their own view.
    pub fn on_pointer_up(&mut self, screen: Point) -> Action {
        let GestureState::Dragging { anchor, .. } = std::mem::take(&mut self.gesture) else {
            return Action::None;
        };

        let Some(shape) =
            shape_between(self.ui.tool, anchor, screen, &self.ui.stroke, self.ui.fill.as_deref())
        else {
            return Action::None;
        };

        let shape = shape.translated(-self.camera.pan_x, -self.camera.pan_y);
        self.buffer.append(shape.clone());
        Action::ShapeCommitted(shape)
    }

    /// The live preview for the drag in progress, in screen space with the
    /// session's current colors. `None` when idle or panning.
    #[must_use]
    pub fn preview_shape(&self) -> Option<Shape> {
        let GestureState::Dragging { anchor, last } = self.gesture else {
            return None;
        };
        shape_between(self.ui.tool, anchor, last, &self.ui.stroke, self.ui.fill.as_deref())
    }

    // --- Network inputs ---

    /// Apply an event delivered by the hub from a peer.
    pub fn apply_remote(&mut self, event: RoomEvent) -> Action {
        match event {
            RoomEvent::Shape(shape) => self.buffer.append(shape),
            RoomEvent::Clear => self.buffer.clear(),
        }
        Action::RenderNeeded
    }

    /// Empty the canvas on user request and hand the host the clear to
    /// transmit.
    pub fn commit_clear(&mut self) -> Action {
        self.buffer.clear();
        Action::ClearCommitted
    }

    /// Merge the persisted history fetched at join time; see
    /// [`ShapeBuffer::load_history`] for the ordering rule.
    pub fn load_history(&mut self, history: Vec<Shape>) -> Action {
        if self.buffer.load_history(history) {
            Action::RenderNeeded
        } else {
            Action::None
        }
    }
}

/// The full canvas engine. Wraps [`EngineCore`] and owns the browser canvas
/// element; this is the boundary the WASM host drives.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    // --- Delegated inputs ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.core.set_tool(tool);
    }

    pub fn set_colors(&mut self, stroke: impl Into<String>, fill: Option<String>) {
        self.core.set_colors(stroke, fill);
    }

    pub fn on_pointer_down(&mut self, screen: Point) -> Action {
        self.core.on_pointer_down(screen)
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Action {
        self.core.on_pointer_move(screen)
    }

    pub fn on_pointer_up(&mut self, screen: Point) -> Action {
        self.core.on_pointer_up(screen)
    }

    pub fn apply_remote(&mut self, event: RoomEvent) -> Action {
        self.core.apply_remote(event)
    }

    pub fn commit_clear(&mut self) -> Action {
        self.core.commit_clear()
    }

    pub fn load_history(&mut self, history: Vec<Shape>) -> Action {
        self.core.load_history(history)
    }

    // --- Render ---

    /// Draw the current state to the bound canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call
    /// fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx: js_sys::Object = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?;
        let ctx: CanvasRenderingContext2d = ctx.dyn_into().map_err(JsValue::from)?;

        render::draw(
            &ctx,
            &self.core.buffer,
            &self.core.camera,
            self.core.preview_shape().as_ref(),
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }
}
