//! Slot placement and text sizing
//!
//! All geometry derives from the screen centre `(cx, cy)` and the surface
//! width, so a resize only needs a new [`LayoutEngine`].

use line_watchface_types::{Anchor, DeviceCapabilities, Point, Rect, SlotRole, StyleMode};

/// Horizontal/vertical push applied in Digital mode, fraction of `cx`
const DIGITAL_OFFSET_FACTOR: f64 = 0.13;
/// Same push for the ranged value ring
const RANGED_DIGITAL_OFFSET_FACTOR: f64 = 0.1;
/// Enlarged ring grows into the corner on square bezels
const SQUARE_RANGED_SCALE: f64 = 1.2;

/// Font sizes in pixels, fractions of surface width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSizes {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
    pub long_text_body: f64,
    pub complication_primary: f64,
    pub long_text_title: f64,
    pub complication_secondary: f64,
    pub notification: f64,
}

impl TextSizes {
    pub fn for_width(width: f64) -> Self {
        Self {
            hour: width / 6.0,
            minute: width / 15.0,
            second: width / 15.0,
            long_text_body: width / 23.0,
            complication_primary: width / 18.0,
            long_text_title: width / 25.0,
            complication_secondary: width / 20.0,
            notification: width / 25.0,
        }
    }
}

/// Bounds available to a long text pill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillLayout {
    pub center: Point,
    pub height: f64,
    pub max_width: f64,
}

impl PillLayout {
    /// Pill rectangle for a given (already clamped) width
    pub fn rect(&self, width: f64) -> Rect {
        Rect::from_center(self.center, width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    center: Point,
    width: f64,
    height: f64,
    is_round: bool,
}

impl LayoutEngine {
    pub fn new(caps: &DeviceCapabilities, width: u32, height: u32) -> Self {
        Self {
            center: caps.screen_center,
            width: f64::from(width),
            height: f64::from(height),
            is_round: caps.is_round,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_round(&self) -> bool {
        self.is_round
    }

    pub fn text_sizes(&self) -> TextSizes {
        TextSizes::for_width(self.width)
    }

    pub fn digital_offset(&self, mode: StyleMode) -> f64 {
        match mode {
            StyleMode::Digital => self.center.x * DIGITAL_OFFSET_FACTOR,
            _ => 0.0,
        }
    }

    /// Radius of the foreground complication circles
    pub fn circle_radius(&self) -> f64 {
        self.center.x / 4.0
    }

    /// Circle anchor of a foreground slot; the background has none
    pub fn anchor_for(&self, role: SlotRole, mode: StyleMode) -> Option<Anchor> {
        self.circle_anchor(role, self.digital_offset(mode))
    }

    fn circle_anchor(&self, role: SlotRole, offset: f64) -> Option<Anchor> {
        let Point { x: cx, y: cy } = self.center;
        let radius = self.circle_radius();
        let anchor = match role {
            SlotRole::Top => Anchor::new(cx, cy / 2.0 - offset, radius),
            SlotRole::Left => Anchor::new(cx / 2.0 - offset, cy, radius),
            SlotRole::Right => Anchor::new(cx * 1.5 + offset, cy, radius),
            SlotRole::Bottom => Anchor::new(cx, cy * 1.5 + offset, radius),
            SlotRole::Background => return None,
        };
        Some(anchor)
    }

    /// Ranged value ring placement.
    ///
    /// With the bottom slot drawable only the slot's own circle is free;
    /// otherwise the ring grows into the bottom-right quadrant.
    pub fn ranged_anchor(
        &self,
        role: SlotRole,
        mode: StyleMode,
        bottom_occupied: bool,
    ) -> Option<Anchor> {
        let offset = match mode {
            StyleMode::Digital => self.center.x * RANGED_DIGITAL_OFFSET_FACTOR,
            _ => 0.0,
        };
        if bottom_occupied || role != SlotRole::Right {
            return self.circle_anchor(role, offset);
        }

        let Point { x: cx, y: cy } = self.center;
        let mut radius = cx / 2.0;
        if !self.is_round {
            radius *= SQUARE_RANGED_SCALE;
        }
        radius -= 20.0;
        Some(Anchor::new(
            cx + cx / 4.0 + 10.0 + offset * 1.3,
            cy + cy / 4.0 + 10.0 + offset * 0.3,
            radius,
        ))
    }

    /// Long text pill around the slot's anchor
    pub fn pill(&self, role: SlotRole, mode: StyleMode) -> Option<PillLayout> {
        let anchor = self.anchor_for(role, mode)?;
        let Point { x: cx, y: cy } = self.center;
        let mut center = anchor.center;
        let max_width = if self.is_round {
            cx * 1.2
        } else {
            center.y += cy / 16.0;
            cx * 1.5
        };
        Some(PillLayout {
            center,
            height: cy / 4.0,
            max_width,
        })
    }
}
