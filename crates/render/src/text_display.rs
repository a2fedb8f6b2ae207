//! Text complications: short text circles, long text pills and the
//! no-permission placeholder.

use cairo::Context;
use line_watchface_core::PillLayout;
use line_watchface_types::{Anchor, Bitmap, ComplicationText, IconSet, Point, Rect, StyledImage, TapShape};
use std::f64::consts::PI;
use std::sync::Arc;

use crate::frame::DrawContext;
use crate::image_display::processed_image;
use crate::pango_text::{
    get_font_metrics, show_text_at, show_text_ellipsized, text_width, FontSpec, TextAlign,
};
use crate::surface::{draw_bitmap, draw_tinted, SurfaceError};

/// Gap between the centre line and the two stacked lines
const LINE_GAP: f64 = 4.0;
/// Space between a circular image and the text after it
const IMAGE_GAP: f64 = 8.0;

/// Stroke the complication circle outline
pub fn stroke_border_circle(cr: &Context, ctx: &DrawContext, anchor: &Anchor) -> Result<(), cairo::Error> {
    cr.save()?;
    ctx.state.colors.complication_border.apply_to_cairo(cr);
    cr.set_line_width(ctx.state.strokes.border);
    cr.new_path();
    cr.arc(anchor.center.x, anchor.center.y, anchor.radius, 0.0, 2.0 * PI);
    cr.stroke()?;
    cr.restore()?;
    Ok(())
}

/// Circle content shared by short text and no-permission
fn render_circle_text(
    cr: &Context,
    ctx: &DrawContext,
    anchor: &Anchor,
    title: Option<String>,
    text: &str,
    icon: Option<Arc<Bitmap>>,
) -> Result<(), SurfaceError> {
    let colors = &ctx.state.colors;
    let center = anchor.center;
    let font = ctx.primary_font();
    let metrics = get_font_metrics(cr, font);

    let baseline = if let Some(bitmap) = icon {
        let size = ctx.icon_size();
        let icon_rect = Rect::new(
            center.x - size / 2.0,
            center.y - size - 2.0,
            center.x + size / 2.0,
            center.y - 2.0,
        );
        draw_tinted(cr, &bitmap, &icon_rect, colors.complication_primary_text)?;
        center.y + metrics.ascent - metrics.descent + LINE_GAP
    } else if let Some(title) = title {
        let title_font = ctx.secondary_font();
        colors.complication_secondary_text.apply_to_cairo(cr);
        show_text_at(
            cr,
            center.x,
            center.y - LINE_GAP,
            &title.to_uppercase(),
            title_font,
            TextAlign::Center,
        );
        center.y + metrics.ascent - metrics.descent + LINE_GAP
    } else {
        metrics.centered_baseline(center.y)
    };

    colors.complication_primary_text.apply_to_cairo(cr);
    show_text_at(cr, center.x, baseline, text, font, TextAlign::Center);
    Ok(())
}

/// Render a short text complication: icon or title above the text
pub fn render_short_text(
    cr: &Context,
    ctx: &DrawContext,
    anchor: &Anchor,
    title: Option<&ComplicationText>,
    text: &ComplicationText,
    icon: Option<&IconSet>,
) -> Result<Option<TapShape>, SurfaceError> {
    if ctx.state.flags.complication_border {
        stroke_border_circle(cr, ctx, anchor)?;
    }
    let title = title.map(|t| ctx.text(t));
    let icon = icon.and_then(|icons| ctx.icon(icons));
    render_circle_text(cr, ctx, anchor, title, &ctx.text(text), icon)?;

    Ok(Some(TapShape::Circle {
        center: anchor.center,
        radius: anchor.radius,
    }))
}

/// Render the placeholder shown when a provider lacks permission.
///
/// Always bordered so the permission request has a visible target.
pub fn render_no_permission(
    cr: &Context,
    ctx: &DrawContext,
    anchor: &Anchor,
    title: Option<&ComplicationText>,
    text: Option<&ComplicationText>,
    icon: Option<&IconSet>,
) -> Result<Option<TapShape>, SurfaceError> {
    stroke_border_circle(cr, ctx, anchor)?;
    let text = text.map(|t| ctx.text(t)).unwrap_or_else(|| "?".to_string());
    let title = title.map(|t| ctx.text(t));
    let icon = icon.and_then(|icons| ctx.icon(icons));
    render_circle_text(cr, ctx, anchor, title, &text, icon)?;

    Ok(Some(TapShape::Circle {
        center: anchor.center,
        radius: anchor.radius,
    }))
}

/// What sits at the start of a pill
enum Leading {
    Image(Arc<Bitmap>),
    Icon(Arc<Bitmap>),
    Nothing,
}

/// Width of a pill before clamping: widest line plus leading allowance
pub fn pill_width(text_width: f64, title_width: f64, height: f64, leading_allowance: f64) -> f64 {
    text_width.max(title_width) + height / 2.0 + leading_allowance
}

fn pill_path(cr: &Context, rect: &Rect) {
    let radius = rect.height() / 2.0;
    let mid_y = rect.top + radius;
    cr.new_path();
    cr.move_to(rect.left + radius, rect.top);
    cr.line_to(rect.right - radius, rect.top);
    cr.arc(rect.right - radius, mid_y, radius, -PI / 2.0, PI / 2.0);
    cr.line_to(rect.left + radius, rect.bottom);
    cr.arc(rect.left + radius, mid_y, radius, PI / 2.0, 3.0 * PI / 2.0);
    cr.close_path();
}

/// Render a long text complication as a pill sized to its text
pub fn render_long_text(
    cr: &Context,
    ctx: &DrawContext,
    pill: &PillLayout,
    title: Option<&ComplicationText>,
    text: &ComplicationText,
    icon: Option<&IconSet>,
    image: Option<&StyledImage>,
) -> Result<Option<TapShape>, SurfaceError> {
    let colors = &ctx.state.colors;
    let flags = &ctx.state.flags;
    let body_font = FontSpec::bold(ctx.sizes.long_text_body);
    let title_font = FontSpec::bold(ctx.sizes.long_text_title);
    let height = pill.height;

    let body = ctx.text(text);
    let title = title.map(|t| ctx.text(t));

    let image = image
        .filter(|_| !flags.suppress_photos)
        .and_then(|styled| styled.image.load());
    let leading = match (image, icon.and_then(|icons| ctx.icon(icons))) {
        (Some(bitmap), _) => Leading::Image(bitmap),
        (None, Some(bitmap)) => Leading::Icon(bitmap),
        (None, None) => Leading::Nothing,
    };
    let allowance = match leading {
        Leading::Image(_) => height + IMAGE_GAP,
        Leading::Icon(_) => height,
        Leading::Nothing => 0.0,
    };

    let body_width = text_width(cr, &body, body_font);
    let title_width = title
        .as_deref()
        .map(|t| text_width(cr, t, title_font))
        .unwrap_or(0.0);
    let natural = pill_width(body_width, title_width, height, allowance);
    let ellipsize = natural > pill.max_width;
    let width = natural.min(pill.max_width);
    let rect = pill.rect(width);

    if flags.complication_border {
        cr.save()?;
        colors.complication_border.apply_to_cairo(cr);
        cr.set_line_width(ctx.state.strokes.border);
        pill_path(cr, &rect);
        cr.stroke()?;
        cr.restore()?;
    }

    let text_x = match &leading {
        Leading::Image(bitmap) => {
            let disc = processed_image(bitmap.clone(), flags.grayscale_images, true);
            let dest = Rect::new(
                rect.left + 2.0,
                rect.top + 2.0,
                rect.left + height - 2.0,
                rect.bottom - 2.0,
            );
            draw_bitmap(cr, &disc, &dest)?;
            rect.left + height + IMAGE_GAP
        }
        Leading::Icon(bitmap) => {
            let icon_center = Point::new(rect.left + height / 2.0, rect.top + height / 2.0);
            draw_tinted(cr, bitmap, &ctx.icon_rect(icon_center), colors.complication_primary_text)?;
            rect.left + height
        }
        Leading::Nothing => rect.left + height / 4.0,
    };
    let text_max = width - (text_x - rect.left) - height / 4.0;

    let center_y = pill.center.y;
    let body_metrics = get_font_metrics(cr, body_font);
    let body_baseline = match &title {
        Some(title) => {
            colors.complication_secondary_text.apply_to_cairo(cr);
            draw_line(cr, text_x, center_y - LINE_GAP, title, title_font, ellipsize, text_max);
            center_y + body_metrics.ascent - body_metrics.descent + LINE_GAP
        }
        None => body_metrics.centered_baseline(center_y),
    };
    colors.complication_primary_text.apply_to_cairo(cr);
    draw_line(cr, text_x, body_baseline, &body, body_font, ellipsize, text_max);

    Ok(Some(TapShape::Pill(rect)))
}

fn draw_line(
    cr: &Context,
    x: f64,
    baseline: f64,
    text: &str,
    font: FontSpec,
    ellipsize: bool,
    max_width: f64,
) {
    if ellipsize {
        show_text_ellipsized(cr, x, baseline, text, font, max_width);
    } else {
        show_text_at(cr, x, baseline, text, font, TextAlign::Left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::surface_to_bitmap;
    use cairo::{Format, ImageSurface};
    use chrono_tz::Tz;
    use line_watchface_core::{resolve, LayoutEngine};
    use line_watchface_types::{DeviceCapabilities, ImageRef, Preferences};

    const SIZE: u32 = 200;

    /// Draw onto a transparent surface without complication borders
    fn paint(draw: impl FnOnce(&Context, &DrawContext)) -> Bitmap {
        let caps = DeviceCapabilities::default().with_surface(SIZE, SIZE);
        let layout = LayoutEngine::new(&caps, SIZE, SIZE);
        let prefs = Preferences {
            complication_border: false,
            ..Default::default()
        };
        let state = resolve(&prefs, &caps, false);
        let ctx = DrawContext::new(&state, &layout, 0, Tz::UTC);
        let mut surface = ImageSurface::create(Format::ARgb32, SIZE as i32, SIZE as i32).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, &ctx);
        }
        surface_to_bitmap(&mut surface).unwrap()
    }

    fn icon() -> IconSet {
        IconSet::new(ImageRef::ready("icon", Bitmap::filled(16, 16, [255, 255, 255, 255])))
    }

    #[test]
    fn test_pill_width_uses_widest_line() {
        assert_eq!(pill_width(100.0, 60.0, 40.0, 0.0), 120.0);
        assert_eq!(pill_width(60.0, 100.0, 40.0, 0.0), 120.0);
        // Icon allowance is the pill height, images add a gap
        assert_eq!(pill_width(100.0, 0.0, 40.0, 40.0), 160.0);
        assert_eq!(pill_width(100.0, 0.0, 40.0, 48.0), 168.0);
    }

    #[test]
    fn test_short_text_icon_sits_above_centre() {
        let anchor = Anchor::new(100.0, 100.0, 25.0);
        let text = ComplicationText::plain("");
        let icon = icon();

        let frame = paint(|cr, ctx| {
            render_short_text(cr, ctx, &anchor, None, &text, Some(&icon)).unwrap();
        });
        // Icon square spans y = 83..98
        assert!(frame.pixel(100, 90)[3] > 0);
        assert_eq!(frame.pixel(100, 110)[3], 0);

        // With an icon the title is not drawn
        let title = ComplicationText::plain("UV");
        let with_title = paint(|cr, ctx| {
            render_short_text(cr, ctx, &anchor, Some(&title), &text, Some(&icon)).unwrap();
        });
        assert!(with_title.pixels() == frame.pixels());
    }

    #[test]
    fn test_short_text_title_replaces_centred_text() {
        let anchor = Anchor::new(100.0, 100.0, 25.0);
        let text = ComplicationText::plain("72");
        let title = ComplicationText::plain("hr");

        let alone = paint(|cr, ctx| {
            render_short_text(cr, ctx, &anchor, None, &text, None).unwrap();
        });
        let titled = paint(|cr, ctx| {
            render_short_text(cr, ctx, &anchor, Some(&title), &text, None).unwrap();
        });
        assert!(alone.pixels() != titled.pixels());
    }

    #[test]
    fn test_long_text_clamps_to_max_width() {
        let pill = PillLayout {
            center: Point::new(100.0, 150.0),
            height: 25.0,
            max_width: 120.0,
        };
        let long = ComplicationText::plain(
            "Quarterly planning review with the whole design team in the large room",
        );
        let short = ComplicationText::plain("Hi");
        let mut shapes = Vec::new();

        let frame = paint(|cr, ctx| {
            shapes.push(render_long_text(cr, ctx, &pill, None, &long, None, None).unwrap());
        });
        let Some(Some(TapShape::Pill(rect))) = shapes.pop() else {
            panic!("long text registers a pill");
        };
        assert_eq!(rect.width(), 120.0);
        // Ellipsized text stays inside the pill
        for x in (rect.right as u32 + 2)..SIZE {
            assert_eq!(frame.pixel(x, 150)[3], 0, "ink at x = {x}");
        }

        paint(|cr, ctx| {
            shapes.push(render_long_text(cr, ctx, &pill, None, &short, None, None).unwrap());
        });
        let Some(Some(TapShape::Pill(rect))) = shapes.pop() else {
            panic!("short text registers a pill");
        };
        assert!(rect.width() < 120.0);
    }
}
