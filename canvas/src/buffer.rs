//! The local shape buffer and its reconciliation merge rule.
//!
//! The buffer is the client's single source of truth for what is on the
//! canvas: an ordered sequence of shapes, append-only in normal operation
//! and reset only by a clear event. Rendering always walks the full buffer
//! in order, so appends from input handlers and from inbound broadcasts can
//! interleave freely without corrupting the view.
//!
//! History reconciliation is the one non-append mutation: the persisted
//! history fetched at join time is prepended exactly once, ahead of any live
//! shapes that arrived while the fetch was in flight. A clear that lands
//! before the fetch resolves disarms the prepend — stale history must not
//! resurrect a canvas the room has wiped.

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;

use shapes::Shape;

/// Ordered, append-only store of the shapes visible to this session.
#[derive(Debug)]
pub struct ShapeBuffer {
    shapes: Vec<Shape>,
    history_armed: bool,
}

impl ShapeBuffer {
    /// Create an empty buffer that still awaits its history prepend.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new(), history_armed: true }
    }

    /// Append one shape (locally committed or received from a peer).
    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Empty the buffer in response to a clear event. Also disarms any
    /// pending history prepend; see the module docs.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.history_armed = false;
    }

    /// Prepend the persisted history fetched at join time.
    ///
    /// Live shapes already appended keep their position after the history,
    /// which fixes the ordering to history-first. Returns `false` (and
    /// leaves the buffer untouched) if history was already loaded or a clear
    /// has raced the fetch.
    pub fn load_history(&mut self, history: Vec<Shape>) -> bool {
        if !self.history_armed {
            return false;
        }
        self.history_armed = false;

        let live = std::mem::replace(&mut self.shapes, history);
        self.shapes.extend(live);
        true
    }

    /// All shapes in draw order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the buffer holds no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Default for ShapeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
