//! Pango text helpers
//!
//! All face text goes through Pango rather than Cairo's toy font API, whose
//! font caches grow without bound. Sizes are absolute pixels since every
//! size is derived from the surface width.
//!
//! Positions follow Cairo conventions: `y` is the baseline.

use cairo::Context;
use pango::{EllipsizeMode, FontDescription, Layout, Weight as PangoWeight};
use pangocairo::functions::{create_layout, show_layout};
use std::cell::RefCell;
use std::collections::HashMap;

/// Font family used for every label on the face
pub const FACE_FONT_FAMILY: &str = "Sans";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Light,
    Regular,
    Bold,
}

impl FontWeight {
    fn to_pango(self) -> PangoWeight {
        match self {
            FontWeight::Light => PangoWeight::Light,
            FontWeight::Regular => PangoWeight::Normal,
            FontWeight::Bold => PangoWeight::Bold,
        }
    }
}

/// Weight plus pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub weight: FontWeight,
    pub size: f64,
}

impl FontSpec {
    pub fn new(weight: FontWeight, size: f64) -> Self {
        Self { weight, size }
    }

    pub fn bold(size: f64) -> Self {
        Self::new(FontWeight::Bold, size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Cache for FontDescription objects to avoid repeated allocations
struct FontDescriptionCache {
    cache: HashMap<FontKey, FontDescription>,
    max_entries: usize,
}

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
struct FontKey {
    weight: FontWeight,
    size_pango: i32, // Size in Pango units (pixels * PANGO_SCALE)
}

impl FontDescriptionCache {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            max_entries: 32,
        }
    }

    fn get_or_create(&mut self, font: FontSpec) -> FontDescription {
        let key = FontKey {
            weight: font.weight,
            size_pango: (font.size * pango::SCALE as f64) as i32,
        };

        if let Some(desc) = self.cache.get(&key) {
            return desc.clone();
        }

        // A resize produces a whole new set of sizes, so start over
        if self.cache.len() >= self.max_entries {
            self.cache.clear();
        }

        let mut desc = FontDescription::new();
        desc.set_family(FACE_FONT_FAMILY);
        desc.set_weight(font.weight.to_pango());
        desc.set_absolute_size(f64::from(key.size_pango));

        self.cache.insert(key, desc.clone());
        desc
    }
}

thread_local! {
    static FONT_DESC_CACHE: RefCell<FontDescriptionCache> = RefCell::new(FontDescriptionCache::new());
}

/// Drop cached font descriptions, e.g. after a surface resize
pub fn clear_pango_caches() {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().cache.clear());
    log::debug!("Pango font cache cleared");
}

fn font_description(font: FontSpec) -> FontDescription {
    FONT_DESC_CACHE.with(|cache| cache.borrow_mut().get_or_create(font))
}

fn layout_for(cr: &Context, text: &str, font: FontSpec) -> Layout {
    let layout = create_layout(cr);
    layout.set_font_description(Some(&font_description(font)));
    layout.set_text(text);
    layout
}

/// Font metrics for baseline positioning
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMetrics {
    /// Distance from top of logical rect to baseline
    pub ascent: f64,
    /// Distance from baseline to bottom of logical rect
    pub descent: f64,
    pub height: f64,
}

impl FontMetrics {
    /// Baseline that vertically centres a line on `center_y`
    pub fn centered_baseline(&self, center_y: f64) -> f64 {
        center_y + (self.ascent - self.descent) / 2.0
    }
}

pub fn get_font_metrics(cr: &Context, font: FontSpec) -> FontMetrics {
    let layout = layout_for(cr, "Xg", font);
    let scale = pango::SCALE as f64;
    let baseline = layout.baseline() as f64 / scale;
    let (_, logical_rect) = layout.extents();
    let height = logical_rect.height() as f64 / scale;

    FontMetrics {
        ascent: baseline,
        descent: height - baseline,
        height,
    }
}

/// Logical advance width of `text`
pub fn text_width(cr: &Context, text: &str, font: FontSpec) -> f64 {
    let layout = layout_for(cr, text, font);
    let (_, logical_rect) = layout.extents();
    logical_rect.width() as f64 / pango::SCALE as f64
}

fn show(cr: &Context, layout: &Layout, x: f64, baseline_y: f64, align: TextAlign) {
    let scale = pango::SCALE as f64;
    let (_, logical_rect) = layout.extents();
    let width = logical_rect.width() as f64 / scale;
    let baseline = layout.baseline() as f64 / scale;

    let left = match align {
        TextAlign::Left => x,
        TextAlign::Center => x - width / 2.0,
        TextAlign::Right => x - width,
    };
    cr.move_to(left, baseline_y - baseline);
    show_layout(cr, layout);
    cr.new_path();
}

/// Draw one line with its baseline at `baseline_y`, aligned on `x`
pub fn show_text_at(
    cr: &Context,
    x: f64,
    baseline_y: f64,
    text: &str,
    font: FontSpec,
    align: TextAlign,
) {
    let layout = layout_for(cr, text, font);
    show(cr, &layout, x, baseline_y, align);
}

/// Left aligned line truncated with an ellipsis past `max_width`
pub fn show_text_ellipsized(
    cr: &Context,
    x: f64,
    baseline_y: f64,
    text: &str,
    font: FontSpec,
    max_width: f64,
) {
    let layout = layout_for(cr, text, font);
    layout.set_width((max_width.max(0.0) * pango::SCALE as f64) as i32);
    layout.set_ellipsize(EllipsizeMode::End);
    show(cr, &layout, x, baseline_y, TextAlign::Left);
}

/// Whether `text` would be truncated at `max_width`
pub fn would_ellipsize(cr: &Context, text: &str, font: FontSpec, max_width: f64) -> bool {
    text_width(cr, text, font) > max_width
}
