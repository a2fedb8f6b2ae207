//! Style resolution
//!
//! [`resolve`] turns preferences, device capabilities and the ambient flag
//! into an immutable [`RenderState`]. Renderers never look at preferences or
//! capabilities directly, so every ambient and low-power rule lives here.

use crate::constants::*;
use line_watchface_types::{
    Color, DeviceCapabilities, NotificationIndicator, Preferences, StyleMode,
};

/// Four tier palette; the last three are the accent at decreasing alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub quaternary: Color,
}

/// Resolved color for each drawn role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleColors {
    pub hour_text: Color,
    pub minute_text: Color,
    pub second_text: Color,
    pub minute_hand: Color,
    pub second_sweep: Color,
    pub hour_ticks: Color,
    pub minor_ticks: Color,
    pub arc_value: Color,
    pub arc_track: Color,
    /// Short text body, long text body, value labels and icon tint
    pub complication_primary_text: Color,
    /// Titles and min/max labels
    pub complication_secondary_text: Color,
    pub complication_border: Color,
    pub notification_circle: Color,
    pub notification_text: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeWidths {
    pub ticks: f64,
    pub arc: f64,
    pub border: f64,
    pub minute_hand: f64,
    pub second_sweep: f64,
}

impl StrokeWidths {
    fn interactive() -> Self {
        Self {
            ticks: TICK_STROKE,
            arc: ARC_STROKE,
            border: BORDER_STROKE,
            minute_hand: MINUTE_HAND_STROKE,
            second_sweep: SECOND_SWEEP_STROKE,
        }
    }

    fn thin() -> Self {
        Self {
            ticks: THIN_STROKE,
            arc: THIN_STROKE,
            border: THIN_STROKE,
            minute_hand: THIN_STROKE,
            second_sweep: THIN_STROKE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleFlags {
    pub ambient: bool,
    pub style_mode: StyleMode,
    pub is_round: bool,
    pub anti_alias: bool,
    pub complication_border: bool,
    pub light_hour_font: bool,
    /// Stroke the notification circle instead of filling it
    pub notification_outlined: bool,
    pub prefer_burn_in_icons: bool,
    /// Small images and long text images are skipped
    pub suppress_photos: bool,
    /// Small images are desaturated
    pub grayscale_images: bool,
    pub show_second_sweep: bool,
    pub show_seconds_text: bool,
    pub notification_indicator: NotificationIndicator,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStyle {
    /// Solid fill drawn before anything else
    pub fill: Color,
    pub draw_image: bool,
    pub grayscale: bool,
    pub blur: bool,
    /// Overlay drawn on top of the image when darkening is on
    pub darken: Option<Color>,
}

/// Everything a renderer needs to know about the current look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub palette: Palette,
    pub colors: RoleColors,
    pub strokes: StrokeWidths,
    pub flags: StyleFlags,
    pub background: BackgroundStyle,
}

impl RenderState {
    pub fn is_ambient(&self) -> bool {
        self.flags.ambient
    }
}

/// Pure; identical inputs give bit-identical output
pub fn resolve(prefs: &Preferences, caps: &DeviceCapabilities, ambient: bool) -> RenderState {
    let opacity = prefs.accent_opacity();
    let accent = prefs.accent_color;
    let palette = Palette {
        primary: prefs.primary_color,
        secondary: accent.with_alpha(opacity),
        tertiary: accent.with_alpha(opacity * TERTIARY_ALPHA_FACTOR),
        quaternary: accent.with_alpha(opacity * QUATERNARY_ALPHA_FACTOR),
    };

    let low_bit = ambient && caps.low_bit_ambient;
    let burn_in = ambient && caps.burn_in_protection;

    let background_fill = if ambient && (caps.burn_in_protection || !prefs.ambient_color) {
        Color::BLACK
    } else {
        prefs.background_color.opaque()
    };

    let (secondary, tertiary, quaternary) = if low_bit {
        (Color::WHITE, Color::WHITE, Color::WHITE)
    } else {
        (palette.secondary, palette.tertiary, palette.quaternary)
    };
    let primary = if ambient { Color::WHITE } else { palette.primary };

    let colors = RoleColors {
        hour_text: primary,
        minute_text: secondary,
        second_text: tertiary,
        minute_hand: primary,
        second_sweep: secondary,
        hour_ticks: secondary,
        minor_ticks: tertiary,
        arc_value: secondary,
        arc_track: tertiary,
        complication_primary_text: secondary,
        complication_secondary_text: tertiary,
        complication_border: quaternary,
        notification_circle: Color::WHITE,
        notification_text: if burn_in {
            Color::WHITE
        } else {
            background_fill
        },
    };

    let strokes = if low_bit || burn_in {
        StrokeWidths::thin()
    } else {
        StrokeWidths::interactive()
    };

    let grayscale_images = ambient && !prefs.ambient_color;

    let flags = StyleFlags {
        ambient,
        style_mode: prefs.style_mode,
        is_round: caps.is_round,
        anti_alias: !low_bit,
        complication_border: prefs.complication_border,
        light_hour_font: burn_in,
        notification_outlined: burn_in,
        prefer_burn_in_icons: burn_in,
        suppress_photos: burn_in,
        grayscale_images,
        show_second_sweep: !ambient && prefs.style_mode != StyleMode::Digital,
        show_seconds_text: !ambient,
        notification_indicator: prefs.notification_indicator,
    };

    let effects = prefs.background_effects;
    let background = BackgroundStyle {
        fill: background_fill,
        draw_image: !(burn_in || low_bit),
        grayscale: effects.grayscale || grayscale_images,
        blur: effects.blur,
        darken: effects
            .darken
            .then(|| prefs.background_color.with_alpha(f64::from(DARKEN_OVERLAY_ALPHA) / 255.0)),
    };

    RenderState {
        palette,
        colors,
        strokes,
        flags,
        background,
    }
}
