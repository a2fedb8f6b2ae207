//! Engine, host seam and event plumbing for the watch face

mod engine;
mod events;
mod host;
mod ticker;

pub use engine::WatchFaceEngine;
pub use events::{EngineEvent, EngineHandle};
pub use host::{HeadlessHost, RedrawRequester, WatchFaceHost};
pub use ticker::TokioTicker;
