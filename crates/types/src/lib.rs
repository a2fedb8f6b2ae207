//! line-watchface-types: Shared data types for the line watch face.
//!
//! This crate contains pure data types (complication content, preferences,
//! device capabilities, geometry, images) shared by every other crate in the
//! workspace. Cairo is an optional dependency used only for color helpers.

pub mod color;
pub mod complication;
pub mod device;
pub mod geometry;
pub mod image;
pub mod preferences;
pub mod text;

// Re-export commonly used types at the crate root for convenience
pub use color::Color;
pub use complication::{
    ActionError, ComplicationContent, ComplicationData, ComplicationSlot, ContentType, IconSet,
    ImageStyle, SlotId, SlotRole, StyledImage, TapAction, ValidityWindow, WatchFaceAction,
};
pub use device::DeviceCapabilities;
pub use geometry::{Anchor, Point, Rect, TapShape};
pub use image::{Bitmap, BitmapError, ImageRef};
pub use preferences::{BackgroundEffects, NotificationIndicator, Preferences, StyleMode, TimeFormat};
pub use text::{ComplicationText, TimeDifferenceStyle};
