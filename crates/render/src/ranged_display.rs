//! Ranged value ring: a 270 degree gauge starting at the top

use cairo::{Context, LineCap, Operator};
use line_watchface_core::constants::{
    RANGED_ARC_GAP_DEG, RANGED_ARC_START_DEG, RANGED_ARC_STEPS, RANGED_ARC_SWEEP_DEG,
};
use line_watchface_types::{Anchor, IconSet, Point, TapShape};

use crate::frame::DrawContext;
use crate::pango_text::{get_font_metrics, show_text_at, TextAlign};
use crate::surface::{draw_tinted, SurfaceError};

/// Indicator inset toward the centre, fraction of `cx`
const INDICATOR_INSET_FACTOR: f64 = 0.15;
/// Tick length, fraction of `cx`
const TICK_LENGTH_FACTOR: f64 = 0.05;
const TICK_INSET: f64 = 4.0;

/// Angles of the ring for one value, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSweeps {
    /// Clamped position of the value within the range, 0..=1
    pub fraction: f64,
    pub elapsed_start: f64,
    pub elapsed_sweep: f64,
    pub indicator_angle: f64,
    pub remaining_start: f64,
    pub remaining_sweep: f64,
}

impl ArcSweeps {
    pub fn new(min: f64, max: f64, value: f64) -> Self {
        let fraction = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let usable = usable_sweep();
        let elapsed_sweep = fraction * usable;
        let tip = RANGED_ARC_START_DEG + elapsed_sweep;
        Self {
            fraction,
            elapsed_start: RANGED_ARC_START_DEG,
            elapsed_sweep,
            indicator_angle: tip + RANGED_ARC_GAP_DEG,
            remaining_start: tip + 2.0 * RANGED_ARC_GAP_DEG,
            remaining_sweep: usable - elapsed_sweep,
        }
    }
}

fn usable_sweep() -> f64 {
    RANGED_ARC_SWEEP_DEG - 2.0 * RANGED_ARC_GAP_DEG
}

/// Angle (degrees) at which a fraction of the range sits, matching the indicator
fn fraction_angle(fraction: f64) -> f64 {
    RANGED_ARC_START_DEG + fraction * usable_sweep() + RANGED_ARC_GAP_DEG
}

/// Tick indices `1..=steps`, minus the one nearest the value
pub fn visible_ticks(fraction: f64) -> Vec<u32> {
    let nearest = ((fraction * f64::from(RANGED_ARC_STEPS)).round() as u32).clamp(1, RANGED_ARC_STEPS);
    (1..=RANGED_ARC_STEPS).filter(|&k| k != nearest).collect()
}

/// Compact label: `1.5m`, `12k`, `25`
pub fn format_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        let millions = format!("{:.1}", value / 1_000_000.0);
        let trimmed = millions.strip_suffix(".0").unwrap_or(&millions);
        format!("{}m", trimmed)
    } else if value > 1_000.0 {
        format!("{}k", (value / 1_000.0).round())
    } else {
        // Adding zero folds -0 into 0
        format!("{}", value.round() + 0.0)
    }
}

fn polar(center: Point, radius: f64, degrees: f64) -> Point {
    let radians = degrees.to_radians();
    Point::new(center.x + radius * radians.cos(), center.y + radius * radians.sin())
}

/// Render a ranged value complication
pub fn render_ranged_value(
    cr: &Context,
    ctx: &DrawContext,
    anchor: &Anchor,
    min: f64,
    max: f64,
    value: f64,
    icon: Option<&IconSet>,
) -> Result<Option<TapShape>, SurfaceError> {
    let sweeps = ArcSweeps::new(min, max, value);
    let center = anchor.center;
    let radius = anchor.radius;
    let cx = ctx.center().x;
    let colors = &ctx.state.colors;

    // Track and value go into a group so clearing under the value path
    // only cuts the ring, not the face below it
    cr.push_group();
    cr.set_line_width(ctx.state.strokes.arc);
    cr.set_line_cap(LineCap::Square);

    colors.arc_track.apply_to_cairo(cr);
    cr.new_path();
    cr.arc(
        center.x,
        center.y,
        radius,
        sweeps.remaining_start.to_radians(),
        (sweeps.remaining_start + sweeps.remaining_sweep).to_radians(),
    );
    cr.stroke()?;

    let outer = radius - TICK_INSET;
    let inner = outer - TICK_LENGTH_FACTOR * cx;
    for k in visible_ticks(sweeps.fraction) {
        let angle = fraction_angle(f64::from(k) / f64::from(RANGED_ARC_STEPS));
        let from = polar(center, inner, angle);
        let to = polar(center, outer, angle);
        cr.move_to(from.x, from.y);
        cr.line_to(to.x, to.y);
    }
    cr.stroke()?;

    let value_path = |cr: &Context| {
        cr.new_path();
        if sweeps.elapsed_sweep > 0.0 {
            cr.arc(
                center.x,
                center.y,
                radius,
                sweeps.elapsed_start.to_radians(),
                (sweeps.elapsed_start + sweeps.elapsed_sweep).to_radians(),
            );
            cr.new_sub_path();
        }
        let tip = polar(center, radius, sweeps.indicator_angle);
        let base = polar(center, radius - INDICATOR_INSET_FACTOR * cx, sweeps.indicator_angle);
        cr.move_to(tip.x, tip.y);
        cr.line_to(base.x, base.y);
    };

    cr.set_operator(Operator::Clear);
    cr.set_line_width(ctx.state.strokes.arc * 2.0);
    value_path(cr);
    cr.stroke()?;

    cr.set_operator(Operator::Over);
    cr.set_line_width(ctx.state.strokes.arc);
    colors.arc_value.apply_to_cairo(cr);
    value_path(cr);
    cr.stroke()?;

    cr.pop_group_to_source()?;
    cr.paint()?;

    // Range labels just outside both ends of the ring
    let label_font = ctx.secondary_font();
    let metrics = get_font_metrics(cr, label_font);
    colors.complication_secondary_text.apply_to_cairo(cr);
    show_text_at(
        cr,
        center.x - 6.0,
        center.y - radius + metrics.ascent - metrics.descent,
        &format_number(min),
        label_font,
        TextAlign::Right,
    );
    show_text_at(
        cr,
        center.x - radius - 4.0,
        center.y - 6.0,
        &format_number(max),
        label_font,
        TextAlign::Left,
    );

    match icon.and_then(|icons| ctx.icon(icons)) {
        Some(bitmap) => draw_tinted(cr, &bitmap, &ctx.icon_rect(center), colors.arc_value)?,
        None => {
            // The label shows the true value even when the ring is clamped
            let font = ctx.primary_font();
            let metrics = get_font_metrics(cr, font);
            colors.complication_primary_text.apply_to_cairo(cr);
            show_text_at(
                cr,
                center.x,
                metrics.centered_baseline(center.y),
                &format_number(value),
                font,
                TextAlign::Center,
            );
        }
    }

    Ok(Some(TapShape::Circle { center, radius }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweeps_sum_is_constant() {
        for value in [0.0, 1.0, 25.0, 50.0, 99.5, 100.0] {
            let sweeps = ArcSweeps::new(0.0, 100.0, value);
            let total = sweeps.elapsed_sweep + sweeps.remaining_sweep;
            assert!((total - (270.0 - 2.0 * RANGED_ARC_GAP_DEG)).abs() < 1e-9);
            // Remaining arc always ends at the bottom-left end of the ring
            assert!((sweeps.remaining_start + sweeps.remaining_sweep - 180.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_quarter_value_scenario() {
        let sweeps = ArcSweeps::new(0.0, 100.0, 25.0);
        assert_eq!(sweeps.elapsed_start, -90.0);
        assert!((sweeps.elapsed_sweep - 0.25 * 262.0).abs() < 1e-9);
        assert!((sweeps.indicator_angle - (-90.0 + 65.5 + 4.0)).abs() < 1e-9);
        assert_eq!(format_number(25.0), "25");
    }

    #[test]
    fn test_out_of_range_clamps_arc_only() {
        let over = ArcSweeps::new(0.0, 100.0, 150.0);
        assert_eq!(over.fraction, 1.0);
        assert_eq!(over.remaining_sweep, 0.0);
        assert_eq!(format_number(150.0), "150");

        let under = ArcSweeps::new(10.0, 20.0, -5.0);
        assert_eq!(under.fraction, 0.0);

        let degenerate = ArcSweeps::new(5.0, 5.0, 5.0);
        assert_eq!(degenerate.fraction, 0.0);
    }

    #[test]
    fn test_tick_nearest_value_skipped() {
        assert_eq!(visible_ticks(0.25), vec![1, 2, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(visible_ticks(0.0), (2..=10).collect::<Vec<_>>());
        assert_eq!(visible_ticks(1.0), (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999.4), "999");
        assert_eq!(format_number(1_000.0), "1000");
        assert_eq!(format_number(12_400.0), "12k");
        assert_eq!(format_number(100_000.0), "100k");
        assert_eq!(format_number(250_000.0), "250k");
        assert_eq!(format_number(999_000.0), "999k");
        assert_eq!(format_number(1_000_000.0), "1m");
        assert_eq!(format_number(1_500_000.0), "1.5m");
        assert_eq!(format_number(2_000_000.0), "2m");
    }
}
