//! Full-screen background: solid fill, optional image and its effects

use cairo::Context;
use line_watchface_core::constants::BACKGROUND_BLUR_RADIUS;
use line_watchface_types::{Bitmap, ImageRef, Rect};
use std::cell::RefCell;
use std::sync::Arc;

use crate::frame::DrawContext;
use crate::image_transform::{blur, grayscale};
use crate::surface::{draw_bitmap, SurfaceError};

/// Last processed background, reused while source and effects are unchanged
struct ProcessedBackground {
    source: Arc<Bitmap>,
    grayscale: bool,
    blur: bool,
    output: Arc<Bitmap>,
}

thread_local! {
    static BACKGROUND_CACHE: RefCell<Option<ProcessedBackground>> = const { RefCell::new(None) };
}

/// Apply grayscale then blur, the order the effects must compose in
pub fn process_background(source: &Bitmap, to_grayscale: bool, to_blur: bool) -> Bitmap {
    let mut out = if to_grayscale {
        grayscale(source)
    } else {
        source.clone()
    };
    if to_blur {
        out = blur(&out, BACKGROUND_BLUR_RADIUS);
    }
    out
}

fn processed(source: Arc<Bitmap>, to_grayscale: bool, to_blur: bool) -> Arc<Bitmap> {
    if !to_grayscale && !to_blur {
        return source;
    }
    BACKGROUND_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(hit) = cache.as_ref().filter(|c| {
            Arc::ptr_eq(&c.source, &source) && c.grayscale == to_grayscale && c.blur == to_blur
        }) {
            return hit.output.clone();
        }
        log::debug!(
            "Processing {}x{} background (grayscale={}, blur={})",
            source.width(),
            source.height(),
            to_grayscale,
            to_blur
        );
        let output = Arc::new(process_background(&source, to_grayscale, to_blur));
        *cache = Some(ProcessedBackground {
            source,
            grayscale: to_grayscale,
            blur: to_blur,
            output: output.clone(),
        });
        output
    })
}

/// Paint the whole surface with the resolved background color
pub fn fill_background(cr: &Context, ctx: &DrawContext) -> Result<(), cairo::Error> {
    cr.save()?;
    ctx.state.background.fill.apply_to_cairo(cr);
    cr.paint()?;
    cr.restore()?;
    Ok(())
}

/// Draw the background image stretched to the screen, then the darken overlay.
///
/// The background never registers a tap region.
pub fn render_background_image(
    cr: &Context,
    ctx: &DrawContext,
    image: &ImageRef,
) -> Result<(), SurfaceError> {
    let style = &ctx.state.background;
    if !style.draw_image {
        return Ok(());
    }
    let Some(source) = image.load() else {
        return Ok(());
    };

    let pixels = processed(source, style.grayscale, style.blur);
    let screen = Rect::new(0.0, 0.0, ctx.layout.width(), ctx.layout.height());
    draw_bitmap(cr, &pixels, &screen)?;

    if let Some(overlay) = style.darken {
        cr.save()?;
        overlay.apply_to_cairo(cr);
        cr.rectangle(screen.left, screen.top, screen.width(), screen.height());
        cr.fill()?;
        cr.restore()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::surface_to_bitmap;
    use cairo::{Format, ImageSurface};
    use chrono_tz::Tz;
    use line_watchface_core::{resolve, LayoutEngine};
    use line_watchface_types::{BackgroundEffects, Color, DeviceCapabilities, Preferences};

    fn render(prefs: &Preferences, caps: &DeviceCapabilities, ambient: bool, image: &ImageRef) -> Bitmap {
        let layout = LayoutEngine::new(caps, 40, 40);
        let state = resolve(prefs, caps, ambient);
        let ctx = DrawContext::new(&state, &layout, 0, Tz::UTC);
        let mut surface = ImageSurface::create(Format::ARgb32, 40, 40).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            fill_background(&cr, &ctx).unwrap();
            render_background_image(&cr, &ctx, image).unwrap();
        }
        surface_to_bitmap(&mut surface).unwrap()
    }

    #[test]
    fn test_ambient_darken_blur_pipeline() {
        let prefs = Preferences {
            background_color: Color::from_rgba8(0, 0, 64, 255),
            background_effects: BackgroundEffects {
                darken: true,
                blur: true,
                grayscale: false,
            },
            ..Default::default()
        };
        let caps = DeviceCapabilities::default().with_surface(40, 40);
        let source = Bitmap::filled(40, 40, [200, 40, 10, 255]);
        let image = ImageRef::ready("bg", source.clone());

        let out = render(&prefs, &caps, true, &image);

        // Ambient forces grayscale ahead of the blur; a flat source stays flat
        let gray = process_background(&source, true, true);
        let [g, _, _, _] = gray.pixel(5, 5);
        let overlay = prefs.background_color.with_alpha(128.0 / 255.0);
        let expected = overlay.over(&Color::from_rgba8(g, g, g, 255)).to_rgba8();

        let [r, gr, b, a] = out.pixel(20, 20);
        assert_eq!(a, 255);
        for (actual, wanted) in [(r, expected.0), (gr, expected.1), (b, expected.2)] {
            assert!(
                (i32::from(actual) - i32::from(wanted)).abs() <= 2,
                "{actual} vs {wanted}"
            );
        }
    }

    #[test]
    fn test_burn_in_ambient_skips_image() {
        let caps = DeviceCapabilities {
            burn_in_protection: true,
            ..Default::default()
        }
        .with_surface(40, 40);
        let image = ImageRef::ready("bg", Bitmap::filled(4, 4, [255, 255, 255, 255]));
        let out = render(&Preferences::default(), &caps, true, &image);
        assert_eq!(out.pixel(20, 20), [0, 0, 0, 255]);
    }

    #[test]
    fn test_pending_image_leaves_fill() {
        let prefs = Preferences {
            background_color: Color::from_rgba8(10, 20, 30, 255),
            ..Default::default()
        };
        let caps = DeviceCapabilities::default().with_surface(40, 40);
        let out = render(&prefs, &caps, false, &ImageRef::pending("later"));
        assert_eq!(out.pixel(3, 3), [10, 20, 30, 255]);
    }
}
