//! line-watchface: rendering and state engine for a minimal line-style
//! watch face.
//!
//! This library ties the workspace crates together:
//! - `line-watchface-types` for complication content and preferences
//! - `line-watchface-core` for style, layout, taps and scheduling
//! - `line-watchface-render` for drawing frames with Cairo
//!
//! [`WatchFaceEngine`] owns the state and is driven by a [`WatchFaceHost`].

pub mod config;
pub mod core;

// Re-export commonly used types
pub use config::{AppConfig, ComplicationsFile};
pub use core::{EngineHandle, HeadlessHost, RedrawRequester, TokioTicker, WatchFaceEngine, WatchFaceHost};
pub use line_watchface_core as engine_core;
pub use line_watchface_render as render;
pub use line_watchface_types as types;
