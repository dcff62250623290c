#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

/// A point in either screen or room space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pan-offset view transform for the shared canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels. The offset displaces rendered
/// coordinates only; stored shapes stay in room space, so panning never
/// mutates data that peer sessions also hold.
#[derive(Debug, Clone, Copy, Default)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Camera {
    /// Accumulate a pan delta from a drag gesture.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Convert a screen-space point to room coordinates.
    #[must_use]
    pub fn screen_to_room(&self, screen: Point) -> Point {
        Point { x: screen.x - self.pan_x, y: screen.y - self.pan_y }
    }

    /// Convert a room-space point to screen coordinates.
    #[must_use]
    pub fn room_to_screen(&self, room: Point) -> Point {
        Point { x: room.x + self.pan_x, y: room.y + self.pan_y }
    }
}
