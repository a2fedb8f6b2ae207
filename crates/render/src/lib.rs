//! line-watchface-render: Cairo rendering functions for the watch face,
//! complication types, the time display and image transforms.

pub mod background_display;
pub mod frame;
pub mod image_display;
pub mod image_transform;
pub mod pango_text;
pub mod path_measure;
pub mod ranged_display;
pub mod surface;
pub mod text_display;
pub mod time_display;
pub mod watch_face;

pub use frame::DrawContext;
pub use pango_text::clear_pango_caches;
pub use surface::{bitmap_to_surface, surface_to_bitmap, SurfaceError};
pub use time_display::NotificationCounts;
pub use watch_face::{render_frame, FrameInput};
