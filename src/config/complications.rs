//! Complication payloads loaded from JSON, for offline rendering

use anyhow::{Context as _, Result};
use cairo::ImageSurface;
use line_watchface_core::{BACKGROUND_SLOT, BOTTOM_SLOT, LEFT_SLOT, RIGHT_SLOT, TOP_SLOT};
use line_watchface_render::surface_to_bitmap;
use line_watchface_types::{ComplicationData, SlotId, SlotRole};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Slot role to content, e.g. `{"top": {"content": {"type": "short_text", ...}}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ComplicationsFile {
    pub slots: BTreeMap<SlotRole, ComplicationData>,
}

impl ComplicationsFile {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading complications from {}", path.display()))?;
        let file = serde_json::from_str(&content)?;
        Ok(file)
    }

    /// Entries with their slot ids, foreground roles first
    pub fn entries(&self) -> impl Iterator<Item = (SlotId, &ComplicationData)> {
        self.slots.iter().map(|(role, data)| (slot_id(*role), data))
    }
}

fn slot_id(role: SlotRole) -> SlotId {
    match role {
        SlotRole::Top => TOP_SLOT,
        SlotRole::Left => LEFT_SLOT,
        SlotRole::Right => RIGHT_SLOT,
        SlotRole::Bottom => BOTTOM_SLOT,
        SlotRole::Background => BACKGROUND_SLOT,
    }
}

fn decode_png(path: &Path) -> Result<line_watchface_types::Bitmap> {
    let mut file = File::open(path)?;
    let mut surface = ImageSurface::create_from_png(&mut file)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(surface_to_bitmap(&mut surface)?)
}

/// Fulfil every image key as a PNG path relative to `base`.
///
/// Images that fail to decode stay pending and are simply not drawn.
pub fn load_images(file: &ComplicationsFile, base: &Path) -> usize {
    let mut loaded = 0;
    for data in file.slots.values() {
        for image in data.content.images() {
            let path = base.join(image.key());
            match decode_png(&path) {
                Ok(bitmap) => {
                    debug!("Loaded {} ({}x{})", path.display(), bitmap.width(), bitmap.height());
                    image.fulfil(bitmap);
                    loaded += 1;
                }
                Err(e) => warn!("Image {} left pending: {:#}", path.display(), e),
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use line_watchface_types::ContentType;

    #[test]
    fn test_parse_by_role() {
        let json = r#"{
            "right": {"content": {"type": "ranged_value", "min": 0, "max": 100, "value": 25}},
            "top": {"content": {"type": "short_text", "text": {"type": "plain", "text": "12°"}}},
            "background": {"content": {"type": "large_image", "image": "bg.png"}}
        }"#;
        let file: ComplicationsFile = serde_json::from_str(json).unwrap();
        let entries: Vec<_> = file
            .entries()
            .map(|(id, data)| (id, data.content_type()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (TOP_SLOT, ContentType::ShortText),
                (RIGHT_SLOT, ContentType::RangedValue),
                (BACKGROUND_SLOT, ContentType::LargeImage),
            ]
        );
    }

    #[test]
    fn test_missing_png_stays_pending() {
        let json = r#"{"background": {"content": {"type": "large_image", "image": "nope.png"}}}"#;
        let file: ComplicationsFile = serde_json::from_str(json).unwrap();
        assert_eq!(load_images(&file, &std::env::temp_dir()), 0);
        assert!(!file.slots[&SlotRole::Background].content.images()[0].is_ready());
    }
}
