use super::*;

#[test]
fn default_export_ratio_covers_board() {
    let request = CaptureRequest::for_pixel_ratio(30.0);
    assert_eq!((request.width_px, request.height_px), (960, 3150));
    assert_eq!(request.format, RasterFormat::Png);
}

#[test]
fn fractional_ratio_rounds_to_nearest_pixel() {
    let request = CaptureRequest::for_pixel_ratio(2.5);
    assert_eq!((request.width_px, request.height_px), (80, 263));
}

#[test]
fn ratio_below_one_is_raised() {
    let request = CaptureRequest::for_pixel_ratio(0.2);
    assert_eq!((request.width_px, request.height_px), (32, 105));
}

#[test]
fn non_finite_ratio_falls_back_to_one() {
    for ratio in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let request = CaptureRequest::for_pixel_ratio(ratio);
        assert_eq!((request.width_px, request.height_px), (32, 105), "ratio {ratio}");
    }
}

#[test]
fn png_mime_type() {
    assert_eq!(RasterFormat::Png.mime_type(), "image/png");
    assert_eq!(RasterFormat::default(), RasterFormat::Png);
}

#[test]
fn capture_error_codes() {
    assert_eq!(CaptureError::NotMounted.error_code(), "E_SURFACE_NOT_MOUNTED");
    assert_eq!(CaptureError::Decode("x".into()).error_code(), "E_IMAGE_DECODE");
    assert_eq!(CaptureError::Encode("x".into()).error_code(), "E_RASTER_ENCODE");
    assert_eq!(CaptureError::Empty.error_code(), "E_EMPTY_RASTER");
}

#[test]
fn only_not_mounted_is_retryable() {
    assert!(CaptureError::NotMounted.retryable());
    assert!(!CaptureError::Decode("x".into()).retryable());
    assert!(!CaptureError::Encode("x".into()).retryable());
    assert!(!CaptureError::Empty.retryable());
}
