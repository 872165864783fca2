//! Shared numeric constants for the board and its elements.

// ── Board ───────────────────────────────────────────────────────

/// Logical board width in board units.
pub const BOARD_WIDTH: f64 = 32.0;

/// Logical board height in board units.
pub const BOARD_HEIGHT: f64 = 105.0;

/// Corner radius of the rounded-rectangle board outline.
pub const BOARD_CORNER_RADIUS: f64 = 16.0;

/// Default background fill for a fresh board.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

// ── Image attributes ────────────────────────────────────────────

pub const SCALE_MIN: f64 = 0.1;
pub const SCALE_MAX: f64 = 10.0;

pub const ROTATION_MIN_DEG: f64 = -180.0;
pub const ROTATION_MAX_DEG: f64 = 180.0;

pub const OPACITY_MIN: f64 = 0.1;
pub const OPACITY_MAX: f64 = 1.0;

// ── Text attributes ─────────────────────────────────────────────

pub const FONT_SIZE_MIN: f64 = 3.0;
pub const FONT_SIZE_MAX: f64 = 16.0;
pub const DEFAULT_FONT_SIZE: f64 = 6.0;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_TEXT_FILL: &str = "#000000";

pub const STROKE_WIDTH_MIN: f64 = 0.0;
pub const STROKE_WIDTH_MAX: f64 = 1.0;

/// Estimated glyph advance as a fraction of the font size.
pub const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// Line height as a multiple of the font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

// ── Export ──────────────────────────────────────────────────────

/// Output pixels per board unit (30 → 960×3150).
pub const DEFAULT_EXPORT_PIXEL_RATIO: f64 = 30.0;

/// Extra wait after the frame boundary before a batch capture, in milliseconds.
pub const DEFAULT_EXPORT_SETTLE_MS: u64 = 50;

/// File extension of exported rasters.
pub const EXPORT_EXTENSION: &str = "png";
