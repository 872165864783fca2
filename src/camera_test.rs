#![allow(clippy::float_cmp)]

use super::*;
use crate::surface::test_helpers::MockSurface;

const EPSILON: f64 = 1e-10;

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

// --- map_device_point ---

#[test]
fn unmounted_surface_maps_to_origin() {
    assert_eq!(map_device_point(None, Point::new(120.0, 40.0)), Point::ORIGIN);
}

#[test]
fn singular_transform_maps_to_origin() {
    let flat = Affine::scale(0.0);
    assert_eq!(map_device_point(Some(flat), Point::new(5.0, 5.0)), Point::ORIGIN);
}

#[test]
fn identity_transform_is_passthrough() {
    let p = map_device_point(Some(Affine::IDENTITY), Point::new(3.0, 4.0));
    assert!(point_approx_eq(p, Point::new(3.0, 4.0)));
}

#[test]
fn pan_and_zoom_are_inverted() {
    let t = Affine::translate(Vec2::new(10.0, 20.0)) * Affine::scale(4.0);
    let p = map_device_point(Some(t), Point::new(50.0, 60.0));
    assert!(point_approx_eq(p, Point::new(10.0, 10.0)));
}

#[test]
fn rotated_surface_is_inverted() {
    let t = Affine::rotate(std::f64::consts::FRAC_PI_2);
    // Board (1, 0) lands on device (0, 1).
    let p = map_device_point(Some(t), Point::new(0.0, 1.0));
    assert!(point_approx_eq(p, Point::new(1.0, 0.0)));
}

// --- to_board_space ---

#[test]
fn to_board_space_unmounted_is_origin() {
    let surface = MockSurface::default();
    assert_eq!(to_board_space(&surface, Point::new(9.0, 9.0)), Point::ORIGIN);
}

#[test]
fn to_board_space_reads_transform_on_every_call() {
    let mut surface = MockSurface::mounted(Affine::scale(10.0));
    let device = Point::new(100.0, 200.0);
    assert!(point_approx_eq(to_board_space(&surface, device), Point::new(10.0, 20.0)));

    surface.transform = Some(Affine::scale(20.0));
    assert!(point_approx_eq(to_board_space(&surface, device), Point::new(5.0, 10.0)));
}

// --- Camera ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
    assert_eq!(cam.zoom, 1.0);
    assert_eq!(cam.board_to_device(), Affine::IDENTITY);
}

#[test]
fn fit_board_tall_viewport_centers_vertically() {
    let cam = Camera::fit_board(Size::new(320.0, 2100.0));
    assert_eq!(cam.zoom, 10.0);
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 525.0);
}

#[test]
fn fit_board_wide_viewport_centers_horizontally() {
    let cam = Camera::fit_board(Size::new(1000.0, 1050.0));
    assert_eq!(cam.zoom, 10.0);
    assert_eq!(cam.pan_x, 340.0);
    assert_eq!(cam.pan_y, 0.0);
}

#[test]
fn fit_board_empty_viewport_is_identity() {
    assert_eq!(Camera::fit_board(Size::ZERO), Camera::default());
    assert_eq!(Camera::fit_board(Size::new(100.0, 0.0)), Camera::default());
}

#[test]
fn board_corners_map_inside_fitted_viewport() {
    let cam = Camera::fit_board(Size::new(1000.0, 1050.0));
    assert!(point_approx_eq(cam.board_to_device_point(Point::ORIGIN), Point::new(340.0, 0.0)));
    assert!(point_approx_eq(
        cam.board_to_device_point(Point::new(BOARD_WIDTH, BOARD_HEIGHT)),
        Point::new(660.0, 1050.0)
    ));
}

#[test]
fn device_to_board_inverts_board_to_device() {
    let cam = Camera { pan_x: -12.0, pan_y: 33.0, zoom: 2.5 };
    let board = Point::new(7.25, 80.0);
    let back = cam.device_to_board(cam.board_to_device_point(board));
    assert!(point_approx_eq(back, board));
}
