//! One full frame: background, complications in slot order, then the time,
//! the second sweep and the notification badge on top.

use cairo::{Antialias, Context, FontOptions};
use chrono_tz::Tz;
use line_watchface_core::{
    ComplicationDataStore, LayoutEngine, RenderState, TapRegions, BACKGROUND_SLOT, BOTTOM_SLOT,
    DRAW_ORDER,
};
use line_watchface_types::{ComplicationContent, ComplicationSlot, SlotRole, TapShape};
use log::{trace, warn};

use crate::background_display::{fill_background, render_background_image};
use crate::frame::DrawContext;
use crate::image_display::{render_icon, render_small_image};
use crate::ranged_display::render_ranged_value;
use crate::surface::SurfaceError;
use crate::text_display::{render_long_text, render_no_permission, render_short_text};
use crate::time_display::{render_notification_badge, render_seconds, render_time, NotificationCounts};

/// Everything a frame reads; nothing here is mutated while drawing
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub state: &'a RenderState,
    pub layout: &'a LayoutEngine,
    pub store: &'a ComplicationDataStore,
    /// Unix epoch milliseconds this frame represents
    pub render_millis: i64,
    pub tz: Tz,
    pub use_24_hour: bool,
    pub notifications: NotificationCounts,
}

fn disable_antialias(cr: &Context) -> Result<(), cairo::Error> {
    cr.set_antialias(Antialias::None);
    let mut options = FontOptions::new()?;
    options.set_antialias(Antialias::None);
    cr.set_font_options(&options);
    Ok(())
}

/// Draw one content record for `slot`; returns the shape to register
fn render_content(
    cr: &Context,
    ctx: &DrawContext,
    slot: &ComplicationSlot,
    content: &ComplicationContent,
    bottom_occupied: bool,
) -> Result<Option<TapShape>, SurfaceError> {
    let mode = ctx.state.flags.style_mode;
    let anchor = ctx.layout.anchor_for(slot.role, mode);

    match content {
        ComplicationContent::Empty | ComplicationContent::NoData => Ok(None),
        ComplicationContent::LargeImage { image, .. } => {
            render_background_image(cr, ctx, image)?;
            Ok(None)
        }
        ComplicationContent::ShortText {
            title, text, icon, ..
        } => match anchor {
            Some(anchor) => render_short_text(cr, ctx, &anchor, title.as_ref(), text, icon.as_ref()),
            None => Ok(None),
        },
        ComplicationContent::LongText {
            title,
            text,
            icon,
            small_image,
            ..
        } => match ctx.layout.pill(slot.role, mode) {
            Some(pill) => render_long_text(
                cr,
                ctx,
                &pill,
                title.as_ref(),
                text,
                icon.as_ref(),
                small_image.as_ref(),
            ),
            None => Ok(None),
        },
        ComplicationContent::RangedValue {
            min,
            max,
            value,
            icon,
            ..
        } => match ctx.layout.ranged_anchor(slot.role, mode, bottom_occupied) {
            Some(anchor) => render_ranged_value(cr, ctx, &anchor, *min, *max, *value, icon.as_ref()),
            None => Ok(None),
        },
        ComplicationContent::Icon { icon, .. } => match anchor {
            Some(anchor) => render_icon(cr, ctx, &anchor, icon),
            None => Ok(None),
        },
        ComplicationContent::SmallImage { image, .. } => match anchor {
            Some(anchor) => render_small_image(cr, ctx, &anchor, image),
            None => Ok(None),
        },
        ComplicationContent::NoPermission { text, title, icon } => match anchor {
            Some(anchor) => {
                render_no_permission(cr, ctx, &anchor, title.as_ref(), text.as_ref(), icon.as_ref())
            }
            None => Ok(None),
        },
    }
}

/// Draw a slot if it holds drawable content and register its shape
fn render_slot(
    cr: &Context,
    ctx: &DrawContext,
    store: &ComplicationDataStore,
    slot: &ComplicationSlot,
    regions: &mut TapRegions,
) {
    let Some(data) = store.drawable(slot.id, ctx.render_millis) else {
        return;
    };
    let bottom_occupied = store.is_drawable(BOTTOM_SLOT, ctx.render_millis);

    // A failed renderer must not leak its cairo state into the next slot
    if let Err(e) = cr.save() {
        warn!("Slot {} skipped, context unusable: {}", slot.id, e);
        return;
    }
    let result = render_content(cr, ctx, slot, &data.content, bottom_occupied);
    if let Err(e) = cr.restore() {
        warn!("Failed to restore context after slot {}: {}", slot.id, e);
    }

    match result {
        Ok(Some(shape)) if slot.role != SlotRole::Background => regions.register(slot.id, shape),
        Ok(_) => {}
        Err(e) => warn!("Failed to render {:?} in slot {}: {}", data.content_type(), slot.id, e),
    }
}

/// Render a complete frame and return the tap regions it produced.
///
/// Errors are logged per layer; a frame always completes.
pub fn render_frame(cr: &Context, input: &FrameInput) -> TapRegions {
    let ctx = DrawContext::new(input.state, input.layout, input.render_millis, input.tz);
    let mut regions = TapRegions::new();
    trace!(
        "Rendering frame at {} (ambient={})",
        input.render_millis,
        input.state.is_ambient()
    );

    if !input.state.flags.anti_alias {
        if let Err(e) = disable_antialias(cr) {
            warn!("Failed to disable antialiasing: {}", e);
        }
    }

    if let Err(e) = fill_background(cr, &ctx) {
        warn!("Failed to fill background: {}", e);
    }
    if let Some(slot) = input.store.slot(BACKGROUND_SLOT) {
        render_slot(cr, &ctx, input.store, slot, &mut regions);
    }

    for id in DRAW_ORDER.iter().filter(|id| **id != BACKGROUND_SLOT) {
        if let Some(slot) = input.store.slot(*id) {
            render_slot(cr, &ctx, input.store, slot, &mut regions);
        }
    }

    if let Err(e) = render_time(cr, &ctx, input.use_24_hour) {
        warn!("Failed to render time: {}", e);
    }

    if let Err(e) = render_seconds(cr, &ctx) {
        warn!("Failed to render second sweep: {}", e);
    }
    if let Err(e) = render_notification_badge(cr, &ctx, &input.notifications) {
        warn!("Failed to render notification badge: {}", e);
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::surface_to_bitmap;
    use cairo::{Format, ImageSurface};
    use line_watchface_core::{resolve, standard_slots, LEFT_SLOT, RIGHT_SLOT, TOP_SLOT};
    use line_watchface_types::{
        Bitmap, Color, ComplicationData, ComplicationText, DeviceCapabilities, ImageRef, Point,
        Preferences, StyleMode, ValidityWindow,
    };

    const SIZE: u32 = 200;

    fn short_text(text: &str) -> ComplicationData {
        ComplicationData::new(ComplicationContent::ShortText {
            title: None,
            text: ComplicationText::plain(text),
            icon: None,
            tap_action: None,
        })
    }

    fn render(
        prefs: &Preferences,
        store: &ComplicationDataStore,
        render_millis: i64,
    ) -> (TapRegions, Bitmap) {
        let caps = DeviceCapabilities::default().with_surface(SIZE, SIZE);
        let layout = LayoutEngine::new(&caps, SIZE, SIZE);
        let state = resolve(prefs, &caps, false);
        let mut surface = ImageSurface::create(Format::ARgb32, SIZE as i32, SIZE as i32).unwrap();
        let regions = {
            let cr = Context::new(&surface).unwrap();
            render_frame(
                &cr,
                &FrameInput {
                    state: &state,
                    layout: &layout,
                    store,
                    render_millis,
                    tz: Tz::UTC,
                    use_24_hour: true,
                    notifications: NotificationCounts::default(),
                },
            )
        };
        (regions, surface_to_bitmap(&mut surface).unwrap())
    }

    fn draw(store: &ComplicationDataStore, render_millis: i64) -> TapRegions {
        render(&Preferences::default(), store, render_millis).0
    }

    #[test]
    fn test_empty_store_registers_nothing() {
        let store = ComplicationDataStore::new(standard_slots());
        assert!(draw(&store, 0).is_empty());
    }

    #[test]
    fn test_non_drawable_slots_register_no_region() {
        let mut store = ComplicationDataStore::new(standard_slots());
        store.update(TOP_SLOT, ComplicationData::new(ComplicationContent::NoData));
        store.update(
            LEFT_SLOT,
            short_text("old").with_validity(ValidityWindow::between(0, 1_000)),
        );
        store.update(RIGHT_SLOT, short_text("now"));

        let regions = draw(&store, 5_000);
        assert_eq!(regions.len(), 1);
        assert!(regions.get(RIGHT_SLOT).is_some());
        assert!(regions.get(LEFT_SLOT).is_none());
    }

    #[test]
    fn test_registration_follows_slot_order() {
        let mut store = ComplicationDataStore::new(standard_slots());
        store.update(BOTTOM_SLOT, short_text("b"));
        store.update(RIGHT_SLOT, short_text("r"));
        store.update(TOP_SLOT, short_text("t"));
        store.update(
            BACKGROUND_SLOT,
            ComplicationData::new(ComplicationContent::LargeImage {
                image: ImageRef::ready("bg", Bitmap::filled(8, 8, [90, 90, 90, 255])),
                tap_action: None,
            }),
        );

        let regions = draw(&store, 0);
        let order: Vec<_> = regions.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![TOP_SLOT, RIGHT_SLOT, BOTTOM_SLOT]);
        // Top circle sits at (cx, cy / 2)
        assert_eq!(regions.hit(&Point::new(100.0, 50.0)), Some(TOP_SLOT));
    }

    #[test]
    fn test_unsupported_content_is_skipped() {
        let mut store = ComplicationDataStore::new(standard_slots());
        store.update(
            TOP_SLOT,
            ComplicationData::new(ComplicationContent::RangedValue {
                min: 0.0,
                max: 1.0,
                value: 0.5,
                icon: None,
                text: None,
                title: None,
                tap_action: None,
            }),
        );
        assert!(draw(&store, 0).is_empty());
    }

    #[test]
    fn test_non_drawable_slots_leave_no_pixels() {
        let empty = ComplicationDataStore::new(standard_slots());
        let mut stale = ComplicationDataStore::new(standard_slots());
        stale.update(
            TOP_SLOT,
            short_text("old").with_validity(ValidityWindow::between(0, 1_000)),
        );
        stale.update(LEFT_SLOT, ComplicationData::new(ComplicationContent::Empty));
        stale.update(RIGHT_SLOT, ComplicationData::new(ComplicationContent::NoData));

        let prefs = Preferences::default();
        let (_, expected) = render(&prefs, &empty, 5_000);
        let (_, actual) = render(&prefs, &stale, 5_000);
        assert!(actual.pixels() == expected.pixels());
    }

    #[test]
    fn test_minute_hand_drawn_over_complications() {
        // 00:00 UTC: the hand points straight up through the top circle,
        // crossing its border at (cx, cy / 2 - cx / 4)
        let prefs = Preferences {
            primary_color: Color::from_rgba8(255, 0, 0, 255),
            ..Default::default()
        };
        let mut store = ComplicationDataStore::new(standard_slots());
        store.update(TOP_SLOT, short_text(""));

        let (_, frame) = render(&prefs, &store, 0);
        assert_eq!(frame.pixel(100, 25), [255, 0, 0, 255]);
    }

    #[test]
    fn test_digital_mode_has_no_ticks() {
        let store = ComplicationDataStore::new(standard_slots());
        // The three o'clock tick spans x = 85..94 from the centre
        let tick = (190, 100);

        let (_, digitalog) = render(&Preferences::default(), &store, 0);
        assert_ne!(digitalog.pixel(tick.0, tick.1), [0, 0, 0, 255]);

        let digital = Preferences {
            style_mode: StyleMode::Digital,
            ..Default::default()
        };
        let (_, frame) = render(&digital, &store, 0);
        assert_eq!(frame.pixel(tick.0, tick.1), [0, 0, 0, 255]);
    }
}
