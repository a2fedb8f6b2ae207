//! line-watchface-core: Engine logic for the line watch face.
//!
//! This crate holds everything that decides *what* to draw without drawing
//! it: the complication data store, style resolution, slot layout, tap
//! dispatch and the frame scheduler. It has no graphics dependencies.

pub mod constants;
pub mod data_store;
pub mod layout;
pub mod scheduler;
pub mod slots;
pub mod style;
pub mod tap;

pub use constants::{FRAME_INTERVAL, FRAME_INTERVAL_MS};
pub use data_store::ComplicationDataStore;
pub use layout::{LayoutEngine, PillLayout, TextSizes};
pub use scheduler::{
    delay_until_next_tick, next_frame_delay, FrameScheduler, ManualTicker, SchedulerEffects,
    Ticker, VisibilityState,
};
pub use slots::{
    standard_slots, BACKGROUND_SLOT, BOTTOM_SLOT, DRAW_ORDER, LEFT_SLOT, RIGHT_SLOT, TOP_SLOT,
};
pub use style::{resolve, BackgroundStyle, Palette, RenderState, RoleColors, StrokeWidths, StyleFlags};
pub use tap::{dispatch, TapRegions};

// Re-export types used in public signatures for convenience
pub use line_watchface_types as types;
