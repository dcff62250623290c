//! Rendering: draws the full canvas scene to a 2D context.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It receives read-only views of the
//! shape buffer, the camera, and the live preview, and produces pixels — it
//! does not mutate any application state.
//!
//! A redraw is always the full scene: clear to the fixed background, then
//! every committed shape in buffer order displaced by the pan offset, then
//! the in-progress preview on top. Because the walk is complete and ordered,
//! a redraw triggered by a pointer move and one triggered by an inbound
//! broadcast produce the same pixels for the same buffer.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use shapes::Shape;

use crate::buffer::ShapeBuffer;
use crate::camera::Camera;

/// Fixed canvas background.
const BACKGROUND: &str = "rgba(0, 0, 0)";

/// Stroke width for every shape, in pixels.
const LINE_WIDTH: f64 = 5.0;

/// Draw the full scene.
///
/// Committed shapes render with the colors stored on each shape, never the
/// session's current colors; the preview (already built with the session's
/// colors) is the only screen-space overlay.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    buffer: &ShapeBuffer,
    camera: &Camera,
    preview: Option<&Shape>,
    viewport_w: f64,
    viewport_h: f64,
) -> Result<(), JsValue> {
    // Layer 1: background.
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, viewport_w, viewport_h);

    ctx.set_line_cap("round");
    ctx.set_line_width(LINE_WIDTH);

    // Layer 2: committed shapes, displaced into view space.
    for shape in buffer.shapes() {
        draw_shape(ctx, &shape.translated(camera.pan_x, camera.pan_y))?;
    }

    // Layer 3: live preview, already in screen space.
    if let Some(shape) = preview {
        draw_shape(ctx, shape)?;
    }

    Ok(())
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    ctx.set_stroke_style_str(shape.stroke());
    if let Some(fill) = shape.fill() {
        ctx.set_fill_style_str(fill);
    }

    match shape {
        Shape::Rect { x, y, width, height, fill, .. } => {
            // Negative extents draw left/up of the anchor; Canvas2D handles
            // them, so no normalizing here.
            if fill.is_some() {
                ctx.fill_rect(*x, *y, *width, *height);
            }
            ctx.stroke_rect(*x, *y, *width, *height);
        }
        Shape::Circle { center_x, center_y, radius, fill, .. } => {
            ctx.begin_path();
            ctx.arc(*center_x, *center_y, *radius, 0.0, 2.0 * PI)?;
            if fill.is_some() {
                ctx.fill();
            }
            ctx.stroke();
            ctx.close_path();
        }
        Shape::Pencil { start_x, start_y, end_x, end_y, .. } => {
            ctx.begin_path();
            ctx.move_to(*start_x, *start_y);
            ctx.line_to(*end_x, *end_y);
            ctx.stroke();
            ctx.close_path();
        }
    }

    Ok(())
}
