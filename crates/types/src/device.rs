//! Display capabilities reported by the host

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DeviceCapabilities {
    /// Ambient mode can only show a handful of colors
    #[serde(default)]
    pub low_bit_ambient: bool,
    /// Static bright pixels must be avoided in ambient mode
    #[serde(default)]
    pub burn_in_protection: bool,
    #[serde(default = "default_true")]
    pub is_round: bool,
    #[serde(default = "default_center")]
    pub screen_center: Point,
}

fn default_true() -> bool {
    true
}

fn default_center() -> Point {
    Point::new(227.0, 227.0)
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            low_bit_ambient: false,
            burn_in_protection: false,
            is_round: true,
            screen_center: default_center(),
        }
    }
}

impl DeviceCapabilities {
    /// Capabilities for a `width` x `height` surface, keeping the flags
    pub fn with_surface(mut self, width: u32, height: u32) -> Self {
        self.screen_center = Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_surface_recenters() {
        let caps = DeviceCapabilities {
            burn_in_protection: true,
            ..Default::default()
        }
        .with_surface(400, 300);
        assert_eq!(caps.screen_center, Point::new(200.0, 150.0));
        assert!(caps.burn_in_protection);
    }
}
