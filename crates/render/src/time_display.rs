//! Time renderer: bezel ticks, minute and hour hands, the second sweep,
//! digital time text and the notification badge.
//!
//! Every angle here is measured clockwise from 12 o'clock. Round bezels
//! project an angle onto a circle; square bezels project it onto the edge of
//! the screen, so the same angular spacing holds on both shapes.

use cairo::{Context, LineCap, LinearGradient};
use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use line_watchface_core::constants::DARKEN_OVERLAY_ALPHA;
use line_watchface_types::{NotificationIndicator, Point, StyleMode};
use std::f64::consts::PI;

use crate::frame::DrawContext;
use crate::pango_text::{get_font_metrics, show_text_at, FontSpec, TextAlign};
use crate::path_measure::MeasuredPath;

const TICK_COUNT: u32 = 60;
const ROUND_TICK_OUTER_INSET: f64 = 6.0;
const ROUND_TICK_INNER_FACTOR: f64 = 0.9;
const SQUARE_TICK_INNER_FACTOR: f64 = 0.1;
/// Extra length of every fifth tick, fraction of `cx`
const HOUR_TICK_EXTRA_FACTOR: f64 = 0.05;
const MINUTE_HAND_OUTER_INSET: f64 = 7.0;
const HOUR_HAND_INNER_FACTOR: f64 = 0.3;
const HOUR_HAND_OUTER_FACTOR: f64 = 0.65;
/// Sweep runs one pixel inside the screen edge
const SWEEP_INSET: f64 = 1.0;
const SWEEP_LEAD_IN: f64 = 2.0;
const BADGE_RADIUS_FACTOR: f64 = 0.08;
const BADGE_LIFT_FACTOR: f64 = 0.1;
const BADGE_BOTTOM_INSET: f64 = 6.0;
const BADGE_OUTLINE_WIDTH: f64 = 2.0;

/// Wall clock fields of one frame in the face's time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millis: u32,
}

impl ClockReading {
    pub fn at(render_millis: i64, tz: &Tz) -> Self {
        let local = DateTime::from_timestamp_millis(render_millis)
            .unwrap_or_default()
            .with_timezone(tz);
        Self {
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
            // Leap seconds report 1000..2000
            millis: (local.timestamp_subsec_millis()).min(999),
        }
    }

    /// Elapsed share of the current minute, 0..1
    pub fn minute_fraction(&self) -> f64 {
        f64::from(self.second * 1000 + self.millis) / 60_000.0
    }
}

/// Unread and total notification counts reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationCounts {
    pub unread: u32,
    pub total: u32,
}

impl NotificationCounts {
    /// Count shown for an indicator mode; zero hides the badge
    pub fn shown(&self, indicator: NotificationIndicator) -> u32 {
        match indicator {
            NotificationIndicator::Disabled => 0,
            NotificationIndicator::Unread => self.unread,
            NotificationIndicator::All => self.total,
        }
    }
}

/// Strings of the digital time block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalTime {
    pub hour: String,
    pub minute: String,
    pub seconds: Option<String>,
}

pub fn digital_time(clock: &ClockReading, use_24_hour: bool, show_seconds: bool) -> DigitalTime {
    let hour = if use_24_hour {
        clock.hour
    } else {
        match clock.hour % 12 {
            0 => 12,
            h => h,
        }
    };
    DigitalTime {
        hour: hour.to_string(),
        minute: format!("{:02}", clock.minute),
        seconds: show_seconds.then(|| format!("{:02}", clock.second)),
    }
}

/// Point at `distance` from the centre along `degrees`.
///
/// On a square bezel `distance` is measured perpendicular to the nearest
/// edge, so every point with the same distance lies on one inset square.
fn bezel_point(ctx: &DrawContext, degrees: f64, distance: f64) -> Point {
    let center = ctx.center();
    let radians = degrees.to_radians();
    let (dx, dy) = (radians.sin(), -radians.cos());
    let scale = if ctx.state.flags.is_round {
        distance
    } else {
        distance / dx.abs().max(dy.abs())
    };
    Point::new(center.x + dx * scale, center.y + dy * scale)
}

fn stroke_radial(cr: &Context, ctx: &DrawContext, degrees: f64, inner: f64, outer: f64) {
    let from = bezel_point(ctx, degrees, inner);
    let to = bezel_point(ctx, degrees, outer);
    cr.move_to(from.x, from.y);
    cr.line_to(to.x, to.y);
}

/// Inner and outer distance of tick `index`
fn tick_span(ctx: &DrawContext, index: u32) -> (f64, f64) {
    let Point { x: cx, y: cy } = ctx.center();
    let extra = if index % 5 == 0 {
        HOUR_TICK_EXTRA_FACTOR * cx
    } else {
        0.0
    };
    if ctx.state.flags.is_round {
        (ROUND_TICK_INNER_FACTOR * cx - extra, cx - ROUND_TICK_OUTER_INSET)
    } else {
        (cy - SQUARE_TICK_INNER_FACTOR * cx - extra, cy - ROUND_TICK_OUTER_INSET)
    }
}

/// The 60 bezel ticks; every fifth is longer and uses the hour tick color
pub fn render_ticks(cr: &Context, ctx: &DrawContext) -> Result<(), cairo::Error> {
    let colors = &ctx.state.colors;
    cr.save()?;
    cr.set_line_width(ctx.state.strokes.ticks);
    cr.set_line_cap(LineCap::Square);

    for hour_ticks in [false, true] {
        cr.new_path();
        for index in (0..TICK_COUNT).filter(|i| (i % 5 == 0) == hour_ticks) {
            let (inner, outer) = tick_span(ctx, index);
            stroke_radial(cr, ctx, f64::from(index) * 6.0, inner, outer);
        }
        if hour_ticks {
            colors.hour_ticks.apply_to_cairo(cr);
        } else {
            colors.minor_ticks.apply_to_cairo(cr);
        }
        cr.stroke()?;
    }

    cr.restore()?;
    Ok(())
}

pub fn render_minute_hand(cr: &Context, ctx: &DrawContext, clock: &ClockReading) -> Result<(), cairo::Error> {
    let Point { x: cx, y: cy } = ctx.center();
    let (inner, outer) = if ctx.state.flags.is_round {
        (cx / 2.0, cx - MINUTE_HAND_OUTER_INSET)
    } else {
        (cy / 2.0, cy - MINUTE_HAND_OUTER_INSET)
    };
    cr.save()?;
    ctx.state.colors.minute_hand.apply_to_cairo(cr);
    cr.set_line_width(ctx.state.strokes.minute_hand);
    cr.set_line_cap(LineCap::Square);
    cr.new_path();
    stroke_radial(cr, ctx, f64::from(clock.minute) * 6.0, inner, outer);
    cr.stroke()?;
    cr.restore()?;
    Ok(())
}

/// Hour hand of the analog style, always a plain polar line
pub fn render_hour_hand(cr: &Context, ctx: &DrawContext, clock: &ClockReading) -> Result<(), cairo::Error> {
    let center = ctx.center();
    let degrees = (f64::from(clock.hour % 12) + f64::from(clock.minute) / 60.0) * 30.0;
    let radians = degrees.to_radians();
    let (dx, dy) = (radians.sin(), -radians.cos());
    let inner = HOUR_HAND_INNER_FACTOR * center.x;
    let outer = HOUR_HAND_OUTER_FACTOR * center.x;

    cr.save()?;
    ctx.state.colors.hour_text.apply_to_cairo(cr);
    cr.set_line_width(ctx.state.strokes.minute_hand);
    cr.set_line_cap(LineCap::Square);
    cr.new_path();
    cr.move_to(center.x + dx * inner, center.y + dy * inner);
    cr.line_to(center.x + dx * outer, center.y + dy * outer);
    cr.stroke()?;
    cr.restore()?;
    Ok(())
}

/// Closed path tracing the bezel clockwise from 12 o'clock
pub fn sweep_path(ctx: &DrawContext) -> MeasuredPath {
    let Point { x: cx, y: cy } = ctx.center();
    let lead_in = Point::new(cx - SWEEP_LEAD_IN, SWEEP_INSET);
    let top = Point::new(cx, SWEEP_INSET);
    if ctx.state.flags.is_round {
        MeasuredPath::new()
            .line(lead_in, top)
            .arc(Point::new(cx, cy), cy - SWEEP_INSET, -PI / 2.0, 2.0 * PI)
    } else {
        let right = ctx.layout.width() - SWEEP_INSET;
        let bottom = ctx.layout.height() - SWEEP_INSET;
        MeasuredPath::new().polyline(&[
            lead_in,
            Point::new(right, SWEEP_INSET),
            Point::new(right, bottom),
            Point::new(SWEEP_INSET, bottom),
            Point::new(SWEEP_INSET, SWEEP_INSET),
            top,
        ])
    }
}

/// Continuous seconds indicator: the leading part of the bezel outline
pub fn render_second_sweep(cr: &Context, ctx: &DrawContext, clock: &ClockReading) -> Result<(), cairo::Error> {
    let prefix = sweep_path(ctx).fraction(clock.minute_fraction());
    if prefix.segments().is_empty() {
        return Ok(());
    }
    cr.save()?;
    ctx.state.colors.second_sweep.apply_to_cairo(cr);
    cr.set_line_width(ctx.state.strokes.second_sweep);
    cr.set_line_cap(LineCap::Butt);
    prefix.append_to(cr);
    cr.stroke()?;
    cr.restore()?;
    Ok(())
}

/// Hour text of the digitalog style, centred on the screen
pub fn render_centered_hour(cr: &Context, ctx: &DrawContext, time: &DigitalTime) -> Result<(), cairo::Error> {
    let center = ctx.center();
    let font = ctx.hour_font();
    let metrics = get_font_metrics(cr, font);
    cr.save()?;
    ctx.state.colors.hour_text.apply_to_cairo(cr);
    show_text_at(
        cr,
        center.x,
        metrics.centered_baseline(center.y),
        &time.hour,
        font,
        TextAlign::Center,
    );
    cr.restore()?;
    Ok(())
}

/// Digital style block: hour on the left of centre, minute top-aligned and
/// seconds bottom-aligned to its right
pub fn render_digital_time(cr: &Context, ctx: &DrawContext, time: &DigitalTime) -> Result<(), cairo::Error> {
    let Point { x: cx, y: cy } = ctx.center();
    let colors = &ctx.state.colors;
    let hour_font = ctx.hour_font();
    let minute_font = FontSpec::bold(ctx.sizes.minute);
    let hour_metrics = get_font_metrics(cr, hour_font);
    let minute_metrics = get_font_metrics(cr, minute_font);
    let hour_baseline = hour_metrics.centered_baseline(cy);
    let hour_half = (hour_metrics.ascent - hour_metrics.descent) / 2.0;
    let column_x = cx + cx / 9.0;

    cr.save()?;
    colors.hour_text.apply_to_cairo(cr);
    show_text_at(cr, cx + cx / 12.0, hour_baseline, &time.hour, hour_font, TextAlign::Right);

    colors.minute_text.apply_to_cairo(cr);
    show_text_at(
        cr,
        column_x,
        cy - hour_half + minute_metrics.ascent - minute_metrics.descent,
        &time.minute,
        minute_font,
        TextAlign::Left,
    );

    if let Some(seconds) = &time.seconds {
        colors.second_text.apply_to_cairo(cr);
        show_text_at(
            cr,
            column_x,
            hour_baseline,
            seconds,
            FontSpec::bold(ctx.sizes.second),
            TextAlign::Left,
        );
    }
    cr.restore()?;
    Ok(())
}

/// Ticks, hands and time text for the current style mode; Digital has no ticks
pub fn render_time(cr: &Context, ctx: &DrawContext, use_24_hour: bool) -> Result<(), cairo::Error> {
    let clock = ClockReading::at(ctx.render_millis, &ctx.tz);
    let flags = &ctx.state.flags;
    let time = digital_time(&clock, use_24_hour, flags.show_seconds_text);

    match flags.style_mode {
        StyleMode::Digitalog => {
            render_ticks(cr, ctx)?;
            render_minute_hand(cr, ctx, &clock)?;
            render_centered_hour(cr, ctx, &time)?;
        }
        StyleMode::Analog => {
            render_ticks(cr, ctx)?;
            render_minute_hand(cr, ctx, &clock)?;
            render_hour_hand(cr, ctx, &clock)?;
        }
        StyleMode::Digital => render_digital_time(cr, ctx, &time)?,
    }
    Ok(())
}

/// Seconds sweep, drawn above the complications when enabled
pub fn render_seconds(cr: &Context, ctx: &DrawContext) -> Result<(), cairo::Error> {
    if !ctx.state.flags.show_second_sweep {
        return Ok(());
    }
    let clock = ClockReading::at(ctx.render_millis, &ctx.tz);
    render_second_sweep(cr, ctx, &clock)
}

/// Bottom strip and count circle; nothing when the selected count is zero
pub fn render_notification_badge(
    cr: &Context,
    ctx: &DrawContext,
    counts: &NotificationCounts,
) -> Result<(), cairo::Error> {
    let count = counts.shown(ctx.state.flags.notification_indicator);
    if count == 0 {
        return Ok(());
    }
    let Point { x: cx, y: cy } = ctx.center();
    let width = ctx.layout.width();
    let height = ctx.layout.height();
    let colors = &ctx.state.colors;

    cr.save()?;
    let strip_top = height - height / 4.0;
    let shade = ctx
        .state
        .background
        .fill
        .with_alpha(f64::from(DARKEN_OVERLAY_ALPHA) / 255.0);
    let gradient = LinearGradient::new(0.0, strip_top, 0.0, height);
    gradient.add_color_stop_rgba(0.0, shade.r, shade.g, shade.b, 0.0);
    gradient.add_color_stop_rgba(1.0, shade.r, shade.g, shade.b, shade.a);
    cr.set_source(&gradient)?;
    cr.rectangle(0.0, strip_top, width, height - strip_top);
    cr.fill()?;

    let center = Point::new(cx, 2.0 * cy - BADGE_BOTTOM_INSET - BADGE_LIFT_FACTOR * cx);
    colors.notification_circle.apply_to_cairo(cr);
    cr.new_path();
    cr.arc(center.x, center.y, BADGE_RADIUS_FACTOR * cx, 0.0, 2.0 * PI);
    if ctx.state.flags.notification_outlined {
        cr.set_line_width(BADGE_OUTLINE_WIDTH);
        cr.stroke()?;
    } else {
        cr.fill()?;
    }

    let font = FontSpec::bold(ctx.sizes.notification);
    let metrics = get_font_metrics(cr, font);
    colors.notification_text.apply_to_cairo(cr);
    show_text_at(
        cr,
        center.x,
        metrics.centered_baseline(center.y),
        &count.to_string(),
        font,
        TextAlign::Center,
    );
    cr.restore()?;
    Ok(())
}
