//! Foundational color type used throughout the watch face.
//!
//! Colors are straight (non-premultiplied) RGBA in the 0.0..=1.0 range.
//! Alpha is quantised to 1/255 steps wherever it is derived so palettes
//! compare bit-identically between resolutions.

use serde::{Deserialize, Serialize};

/// RGBA color with alpha channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        )
    }

    /// Parse `#RRGGBB` or `#AARRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self::from_rgba8(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
                255,
            )),
            8 => Some(Self::from_rgba8(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
                (value >> 24) as u8,
            )),
            _ => None,
        }
    }

    /// Same rgb with alpha replaced, quantised to a byte
    pub fn with_alpha(&self, alpha: f64) -> Self {
        let quantised = (alpha.clamp(0.0, 1.0) * 255.0).round() / 255.0;
        Self {
            a: quantised,
            ..*self
        }
    }

    /// Fully opaque variant
    pub fn opaque(&self) -> Self {
        Self { a: 1.0, ..*self }
    }

    /// Source-over blend of `self` on top of an opaque `below`
    pub fn over(&self, below: &Color) -> Color {
        let a = self.a;
        Color::new(
            self.r * a + below.r * (1.0 - a),
            self.g * a + below.g * (1.0 - a),
            self.b * a + below.b * (1.0 - a),
            1.0,
        )
    }

    /// Apply to Cairo context
    #[cfg(feature = "cairo")]
    pub fn apply_to_cairo(&self, cr: &cairo::Context) {
        cr.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn channel_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
