use super::*;

/// A distinguishable pencil segment; `n` makes ordering assertions readable.
fn marker(n: f64) -> Shape {
    Shape::Pencil {
        start_x: n,
        start_y: 0.0,
        end_x: n,
        end_y: 1.0,
        stroke: "#fff".to_owned(),
        fill: None,
    }
}

#[test]
fn new_buffer_is_empty() {
    let buf = ShapeBuffer::new();
    assert!(buf.is_empty());
    assert_eq!(buf.len(), 0);
}

#[test]
fn append_preserves_order() {
    let mut buf = ShapeBuffer::new();
    buf.append(marker(1.0));
    buf.append(marker(2.0));
    buf.append(marker(3.0));
    assert_eq!(buf.shapes(), &[marker(1.0), marker(2.0), marker(3.0)]);
}

#[test]
fn clear_empties_the_buffer() {
    let mut buf = ShapeBuffer::new();
    buf.append(marker(1.0));
    buf.clear();
    assert!(buf.is_empty());
}

#[test]
fn shapes_appended_after_clear_survive() {
    let mut buf = ShapeBuffer::new();
    buf.append(marker(1.0));
    buf.clear();
    buf.append(marker(2.0));
    assert_eq!(buf.shapes(), &[marker(2.0)]);
}

// =============================================================
// History reconciliation
// =============================================================

#[test]
fn history_loads_into_an_empty_buffer() {
    let mut buf = ShapeBuffer::new();
    assert!(buf.load_history(vec![marker(1.0), marker(2.0)]));
    assert_eq!(buf.shapes(), &[marker(1.0), marker(2.0)]);
}

#[test]
fn live_shape_before_fetch_resolves_follows_history() {
    let mut buf = ShapeBuffer::new();

    // C arrives from a peer while the history fetch is still in flight.
    buf.append(marker(3.0));
    assert!(buf.load_history(vec![marker(1.0), marker(2.0)]));

    // History-first: [A, B, C], never [C, A, B], and C is not dropped.
    assert_eq!(buf.shapes(), &[marker(1.0), marker(2.0), marker(3.0)]);
}

#[test]
fn history_loads_at_most_once() {
    let mut buf = ShapeBuffer::new();
    assert!(buf.load_history(vec![marker(1.0)]));
    assert!(!buf.load_history(vec![marker(9.0)]));
    assert_eq!(buf.shapes(), &[marker(1.0)]);
}

#[test]
fn clear_disarms_a_pending_history_load() {
    let mut buf = ShapeBuffer::new();
    buf.append(marker(3.0));
    buf.clear();

    // The fetch resolves after the room was wiped; stale history must not
    // resurrect the canvas.
    assert!(!buf.load_history(vec![marker(1.0), marker(2.0)]));
    assert!(buf.is_empty());
}

#[test]
fn empty_history_still_consumes_the_load() {
    let mut buf = ShapeBuffer::new();
    assert!(buf.load_history(Vec::new()));
    assert!(!buf.load_history(vec![marker(1.0)]));
    assert!(buf.is_empty());
}
