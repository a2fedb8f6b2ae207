//! User preference snapshot
//!
//! Owned by the configuration layer and handed to the engine as a whole
//! whenever any value changes.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Time display layout variant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StyleMode {
    /// Centred digital hour with a minute hand and second sweep
    #[serde(rename = "digitalog")]
    #[default]
    Digitalog,
    #[serde(rename = "digital")]
    Digital,
    #[serde(rename = "analog")]
    Analog,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NotificationIndicator {
    #[serde(rename = "disabled")]
    #[default]
    Disabled,
    #[serde(rename = "unread")]
    Unread,
    #[serde(rename = "all")]
    All,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// Follow the host's locale setting
    #[serde(rename = "system")]
    #[default]
    System,
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "12h")]
    H12,
}

impl TimeFormat {
    pub fn is_24_hour(&self, host_default: bool) -> bool {
        match self {
            TimeFormat::System => host_default,
            TimeFormat::H24 => true,
            TimeFormat::H12 => false,
        }
    }
}

/// Effects applied to the background image; any combination may be set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BackgroundEffects {
    #[serde(default)]
    pub darken: bool,
    #[serde(default)]
    pub blur: bool,
    #[serde(default)]
    pub grayscale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default = "default_primary_color")]
    pub primary_color: Color,
    #[serde(default = "default_accent_color")]
    pub accent_color: Color,
    /// 0..=100
    #[serde(default = "default_accent_opacity")]
    pub accent_opacity_percent: u8,
    #[serde(default = "default_true")]
    pub complication_border: bool,
    #[serde(default)]
    pub style_mode: StyleMode,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default)]
    pub background_effects: BackgroundEffects,
    #[serde(default)]
    pub ambient_color: bool,
    #[serde(default)]
    pub notification_indicator: NotificationIndicator,
    #[serde(default)]
    pub time_format: TimeFormat,
}

fn default_primary_color() -> Color {
    Color::from_rgba8(0x18, 0xFF, 0xFF, 0xFF)
}

fn default_accent_color() -> Color {
    Color::WHITE
}

fn default_accent_opacity() -> u8 {
    60
}

fn default_background_color() -> Color {
    Color::BLACK
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            accent_color: default_accent_color(),
            accent_opacity_percent: default_accent_opacity(),
            complication_border: true,
            style_mode: StyleMode::default(),
            background_color: default_background_color(),
            background_effects: BackgroundEffects::default(),
            ambient_color: false,
            notification_indicator: NotificationIndicator::default(),
            time_format: TimeFormat::default(),
        }
    }
}

impl Preferences {
    /// Accent opacity as a 0.0..=1.0 factor
    pub fn accent_opacity(&self) -> f64 {
        f64::from(self.accent_opacity_percent.min(100)) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.primary_color.to_rgba8(), (0x18, 0xFF, 0xFF, 0xFF));
        assert_eq!(prefs.accent_opacity(), 0.6);
        assert!(prefs.complication_border);
        assert_eq!(prefs.style_mode, StyleMode::Digitalog);
        assert_eq!(prefs.background_effects, BackgroundEffects::default());
    }

    #[test]
    fn test_time_format_override() {
        assert!(TimeFormat::System.is_24_hour(true));
        assert!(!TimeFormat::System.is_24_hour(false));
        assert!(TimeFormat::H24.is_24_hour(false));
        assert!(!TimeFormat::H12.is_24_hour(true));
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{"style_mode":"digital","background_effects":{"darken":true,"blur":true},"time_format":"24h"}"#;
        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.style_mode, StyleMode::Digital);
        assert!(prefs.background_effects.darken);
        assert!(prefs.background_effects.blur);
        assert!(!prefs.background_effects.grayscale);
        assert_eq!(prefs.time_format, TimeFormat::H24);
    }
}
