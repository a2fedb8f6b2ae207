//! Icon and small image complications

use cairo::Context;
use line_watchface_types::{Anchor, Bitmap, IconSet, ImageStyle, Rect, StyledImage, TapShape};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::frame::DrawContext;
use crate::image_transform::{crop_to_disc, grayscale};
use crate::surface::{draw_bitmap, draw_tinted, SurfaceError};
use crate::text_display::stroke_border_circle;

/// Room for every foreground slot plus a burn-in variant or two
const IMAGE_CACHE_CAPACITY: usize = 8;

/// A transformed complication image and the inputs it was made from
struct ProcessedImage {
    source: Arc<Bitmap>,
    grayscale: bool,
    disc: bool,
    output: Arc<Bitmap>,
}

thread_local! {
    static IMAGE_CACHE: RefCell<VecDeque<ProcessedImage>> = const { RefCell::new(VecDeque::new()) };
}

/// Grayscale and/or disc-cropped copy of `source`, reused across frames
/// until the source bitmap or the requested effects change
pub fn processed_image(source: Arc<Bitmap>, to_grayscale: bool, to_disc: bool) -> Arc<Bitmap> {
    if !to_grayscale && !to_disc {
        return source;
    }
    IMAGE_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(hit) = cache.iter().find(|c| {
            Arc::ptr_eq(&c.source, &source) && c.grayscale == to_grayscale && c.disc == to_disc
        }) {
            return hit.output.clone();
        }
        log::trace!(
            "Processing {}x{} image (grayscale={}, disc={})",
            source.width(),
            source.height(),
            to_grayscale,
            to_disc
        );
        let output = Arc::new(match (to_grayscale, to_disc) {
            (true, true) => crop_to_disc(&grayscale(&source)),
            (true, false) => grayscale(&source),
            _ => crop_to_disc(&source),
        });
        if cache.len() == IMAGE_CACHE_CAPACITY {
            cache.pop_front();
        }
        cache.push_back(ProcessedImage {
            source,
            grayscale: to_grayscale,
            disc: to_disc,
            output: output.clone(),
        });
        output
    })
}

fn circle_shape(anchor: &Anchor) -> TapShape {
    TapShape::Circle {
        center: anchor.center,
        radius: anchor.radius,
    }
}

/// Render an icon complication, tinted with the complication text color.
///
/// Nothing is drawn until the icon has loaded, border included.
pub fn render_icon(
    cr: &Context,
    ctx: &DrawContext,
    anchor: &Anchor,
    icon: &IconSet,
) -> Result<Option<TapShape>, SurfaceError> {
    if let Some(bitmap) = ctx.icon(icon) {
        if ctx.state.flags.complication_border {
            stroke_border_circle(cr, ctx, anchor)?;
        }
        let size = ctx.icon_size();
        let dest = Rect::from_center(anchor.center, size * 2.0, size * 2.0);
        draw_tinted(cr, &bitmap, &dest, ctx.state.colors.complication_primary_text)?;
    }
    Ok(Some(circle_shape(anchor)))
}

/// Destination square for a small image of the given style
pub fn small_image_rect(ctx: &DrawContext, anchor: &Anchor, style: ImageStyle) -> Rect {
    let half = match style {
        ImageStyle::Photo => anchor.radius - ctx.state.strokes.border / 2.0,
        ImageStyle::Icon => ctx.icon_size(),
    };
    Rect::from_center(anchor.center, half * 2.0, half * 2.0)
}

/// Render a small image: photos fill the circle, icon-style images sit inside it
pub fn render_small_image(
    cr: &Context,
    ctx: &DrawContext,
    anchor: &Anchor,
    image: &StyledImage,
) -> Result<Option<TapShape>, SurfaceError> {
    let flags = &ctx.state.flags;
    if flags.suppress_photos {
        return Ok(Some(circle_shape(anchor)));
    }
    if flags.complication_border {
        stroke_border_circle(cr, ctx, anchor)?;
    }

    if let Some(bitmap) = image.image.load() {
        let pixels = processed_image(
            bitmap,
            flags.grayscale_images,
            image.style == ImageStyle::Photo,
        );
        draw_bitmap(cr, &pixels, &small_image_rect(ctx, anchor, image.style))?;
    }
    Ok(Some(circle_shape(anchor)))
}
