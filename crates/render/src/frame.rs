//! Per-frame inputs shared by every renderer

use chrono_tz::Tz;
use line_watchface_core::constants::ICON_SIZE_FACTOR;
use line_watchface_core::{LayoutEngine, RenderState, TextSizes};
use line_watchface_types::{Bitmap, ComplicationText, IconSet, Point, Rect};
use std::sync::Arc;

use crate::pango_text::{FontSpec, FontWeight};

/// Read-only view of one frame: style, geometry and the clock
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub state: &'a RenderState,
    pub layout: &'a LayoutEngine,
    pub sizes: TextSizes,
    /// Unix epoch milliseconds this frame represents
    pub render_millis: i64,
    pub tz: Tz,
}

impl<'a> DrawContext<'a> {
    pub fn new(state: &'a RenderState, layout: &'a LayoutEngine, render_millis: i64, tz: Tz) -> Self {
        Self {
            state,
            layout,
            sizes: layout.text_sizes(),
            render_millis,
            tz,
        }
    }

    pub fn center(&self) -> Point {
        self.layout.center()
    }

    /// Edge length of tinted icon glyphs
    pub fn icon_size(&self) -> f64 {
        (ICON_SIZE_FACTOR * self.center().x).round()
    }

    /// Square of `icon_size` centred on `center`
    pub fn icon_rect(&self, center: Point) -> Rect {
        let size = self.icon_size();
        Rect::from_center(center, size, size)
    }

    pub fn text(&self, text: &ComplicationText) -> String {
        text.text_at(self.render_millis, &self.tz)
    }

    /// Icon pixels for this frame, honoring burn-in variants; `None` while pending
    pub fn icon(&self, icons: &IconSet) -> Option<Arc<Bitmap>> {
        icons.pick(self.state.flags.prefer_burn_in_icons).load()
    }

    /// Bold body text of circular complications
    pub fn primary_font(&self) -> FontSpec {
        FontSpec::bold(self.sizes.complication_primary)
    }

    /// Bold titles and labels of circular complications
    pub fn secondary_font(&self) -> FontSpec {
        FontSpec::bold(self.sizes.complication_secondary)
    }

    pub fn hour_font(&self) -> FontSpec {
        let weight = if self.state.flags.light_hour_font {
            FontWeight::Light
        } else {
            FontWeight::Regular
        };
        FontSpec::new(weight, self.sizes.hour)
    }
}
