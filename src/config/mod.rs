//! Configuration management

mod complications;
mod settings;

pub use complications::{load_images, ComplicationsFile};
pub use settings::{AppConfig, SurfaceConfig};
