//! Shared constants for the watch face engine

use std::time::Duration;

/// Redraw interval while visible and interactive (~30fps)
pub const FRAME_INTERVAL: Duration = Duration::from_millis(FRAME_INTERVAL_MS);

/// Redraw interval in milliseconds (useful for wall-clock alignment)
pub const FRAME_INTERVAL_MS: u64 = 32;

/// Total sweep of the ranged value ring, degrees
pub const RANGED_ARC_SWEEP_DEG: f64 = 270.0;

/// Gap separating the value tip from the track on each side, degrees
pub const RANGED_ARC_GAP_DEG: f64 = 4.0;

/// Ring starts at the top of the circle
pub const RANGED_ARC_START_DEG: f64 = -90.0;

/// Number of tick marks around the ranged value ring
pub const RANGED_ARC_STEPS: u32 = 10;

/// Alpha of the darken overlay drawn over the background image
pub const DARKEN_OVERLAY_ALPHA: u8 = 128;

/// Blur radius applied after the half-size downsample
pub const BACKGROUND_BLUR_RADIUS: u32 = 10;

/// Icon glyph size as a fraction of the horizontal centre
pub const ICON_SIZE_FACTOR: f64 = 0.15;

// Accent tier multipliers applied to the accent opacity
pub const TERTIARY_ALPHA_FACTOR: f64 = 0.6;
pub const QUATERNARY_ALPHA_FACTOR: f64 = 0.2;

// Interactive stroke widths in pixels
pub const TICK_STROKE: f64 = 4.0;
pub const ARC_STROKE: f64 = 4.0;
pub const BORDER_STROKE: f64 = 3.0;
pub const MINUTE_HAND_STROKE: f64 = 4.0;
pub const SECOND_SWEEP_STROKE: f64 = 6.0;

/// Stroke width used for everything on low-bit or burn-in ambient displays
pub const THIN_STROKE: f64 = 2.0;
