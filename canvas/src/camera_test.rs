use super::*;

#[test]
fn default_camera_has_no_offset() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
}

#[test]
fn pan_by_accumulates_deltas() {
    let mut cam = Camera::default();
    cam.pan_by(10.0, -4.0);
    cam.pan_by(2.5, 1.0);
    assert_eq!(cam.pan_x, 12.5);
    assert_eq!(cam.pan_y, -3.0);
}

#[test]
fn screen_to_room_subtracts_offset() {
    let cam = Camera { pan_x: 30.0, pan_y: -10.0 };
    let room = cam.screen_to_room(Point::new(100.0, 100.0));
    assert_eq!(room, Point::new(70.0, 110.0));
}

#[test]
fn room_to_screen_adds_offset() {
    let cam = Camera { pan_x: 30.0, pan_y: -10.0 };
    let screen = cam.room_to_screen(Point::new(70.0, 110.0));
    assert_eq!(screen, Point::new(100.0, 100.0));
}

#[test]
fn conversions_are_inverse() {
    let cam = Camera { pan_x: -55.5, pan_y: 7.25 };
    let original = Point::new(3.0, -9.0);
    assert_eq!(cam.screen_to_room(cam.room_to_screen(original)), original);
}
