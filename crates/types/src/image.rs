//! Decoded image buffers and the shared references complications carry.
//!
//! Decoding belongs to whoever feeds complication data. An [`ImageRef`]
//! starts out pending and is fulfilled from any thread once the bitmap is
//! available; renderers simply skip a pending image and pick it up on a
//! later frame.

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BitmapError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("bitmap dimensions must be non-zero")]
    Empty,
}

/// Straight-alpha RGBA8 pixels, row major, no padding
#[derive(Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(BitmapError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Uniformly colored bitmap (at least 1x1)
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Named, possibly still pending, decoded image
#[derive(Clone)]
pub struct ImageRef {
    key: Arc<str>,
    slot: Arc<ArcSwapOption<Bitmap>>,
}

impl ImageRef {
    /// Reference whose pixels arrive later via [`ImageRef::fulfil`]
    pub fn pending(key: impl Into<Arc<str>>) -> Self {
        Self {
            key: key.into(),
            slot: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn ready(key: impl Into<Arc<str>>, bitmap: Bitmap) -> Self {
        Self {
            key: key.into(),
            slot: Arc::new(ArcSwapOption::new(Some(Arc::new(bitmap)))),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current pixels, `None` while decoding is pending or failed
    pub fn load(&self) -> Option<Arc<Bitmap>> {
        self.slot.load_full()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Publish decoded pixels to every clone of this reference
    pub fn fulfil(&self, bitmap: Bitmap) {
        self.slot.store(Some(Arc::new(bitmap)));
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("key", &self.key)
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(ImageRef::pending(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_rejects_short_buffer() {
        let err = Bitmap::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, BitmapError::BufferSize { expected: 16, .. }));
        assert_eq!(Bitmap::new(0, 2, vec![]).unwrap_err(), BitmapError::Empty);
    }

    #[test]
    fn test_pixel_access() {
        let mut bitmap = Bitmap::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(bitmap.pixel(2, 1), [1, 2, 3, 4]);
        bitmap.set_pixel(1, 1, [9, 9, 9, 9]);
        assert_eq!(bitmap.pixel(1, 1), [9, 9, 9, 9]);
        assert_eq!(bitmap.pixel(0, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn test_pending_image_is_shared_between_clones() {
        let image = ImageRef::pending("weather");
        let held_by_renderer = image.clone();
        assert!(held_by_renderer.load().is_none());

        image.fulfil(Bitmap::filled(1, 1, [255, 0, 0, 255]));
        let bitmap = held_by_renderer.load().unwrap();
        assert_eq!(bitmap.pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_serializes_as_key() {
        let image = ImageRef::ready("photo.png", Bitmap::filled(1, 1, [0; 4]));
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, "\"photo.png\"");

        let back: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back.key(), "photo.png");
        assert!(!back.is_ready());
    }
}
