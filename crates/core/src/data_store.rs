//! Latest complication payload per slot

use line_watchface_types::{ComplicationData, ComplicationSlot, ContentType, SlotId};
use log::debug;
use std::collections::HashMap;

/// Exclusive owner of complication content.
///
/// Updates replace whatever a slot held before; nothing is merged.
#[derive(Debug, Clone)]
pub struct ComplicationDataStore {
    slots: Vec<ComplicationSlot>,
    data: HashMap<SlotId, ComplicationData>,
}

impl ComplicationDataStore {
    pub fn new(slots: Vec<ComplicationSlot>) -> Self {
        Self {
            slots,
            data: HashMap::new(),
        }
    }

    pub fn slots(&self) -> &[ComplicationSlot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Option<&ComplicationSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// Store `data` for `slot`. Returns false when the slot id is unknown,
    /// in which case nothing changes and no redraw is needed.
    pub fn update(&mut self, slot: SlotId, data: ComplicationData) -> bool {
        if self.slot(slot).is_none() {
            debug!("Ignoring complication update for unknown slot {}", slot);
            return false;
        }
        self.data.insert(slot, data);
        true
    }

    pub fn get(&self, slot: SlotId) -> Option<&ComplicationData> {
        self.data.get(&slot)
    }

    /// Present, inside its validity window, and carrying something to draw
    pub fn is_drawable(&self, slot: SlotId, now_millis: i64) -> bool {
        self.get(slot).is_some_and(|data| {
            data.is_active(now_millis)
                && !matches!(data.content_type(), ContentType::Empty | ContentType::NoData)
        })
    }

    /// Drawable content the slot is declared to support
    pub fn drawable(&self, slot: SlotId, now_millis: i64) -> Option<&ComplicationData> {
        if !self.is_drawable(slot, now_millis) {
            return None;
        }
        let data = self.get(slot)?;
        let supported = self
            .slot(slot)
            .is_some_and(|s| s.supports(data.content_type()));
        if !supported {
            debug!(
                "Slot {} does not support {:?}, skipping",
                slot,
                data.content_type()
            );
            return None;
        }
        Some(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{standard_slots, BACKGROUND_SLOT, BOTTOM_SLOT, TOP_SLOT};
    use line_watchface_types::{
        ComplicationContent, ComplicationText, ImageRef, ValidityWindow,
    };

    fn short_text(text: &str) -> ComplicationData {
        ComplicationData::new(ComplicationContent::ShortText {
            title: None,
            text: ComplicationText::plain(text),
            icon: None,
            tap_action: None,
        })
    }

    #[test]
    fn test_update_replaces() {
        let mut store = ComplicationDataStore::new(standard_slots());
        assert!(store.update(TOP_SLOT, short_text("1")));
        assert!(store.update(TOP_SLOT, ComplicationData::new(ComplicationContent::Empty)));
        assert_eq!(
            store.get(TOP_SLOT).map(|d| d.content_type()),
            Some(ContentType::Empty)
        );
    }

    #[test]
    fn test_unknown_slot_ignored() {
        let mut store = ComplicationDataStore::new(standard_slots());
        assert!(!store.update(42, short_text("x")));
        assert!(store.get(42).is_none());
        assert!(!store.is_drawable(42, 0));
    }

    #[test]
    fn test_is_drawable() {
        let mut store = ComplicationDataStore::new(standard_slots());
        assert!(!store.is_drawable(TOP_SLOT, 0));

        store.update(TOP_SLOT, ComplicationData::new(ComplicationContent::NoData));
        assert!(!store.is_drawable(TOP_SLOT, 0));

        store.update(
            TOP_SLOT,
            short_text("7").with_validity(ValidityWindow::between(100, 200)),
        );
        assert!(!store.is_drawable(TOP_SLOT, 50));
        assert!(store.is_drawable(TOP_SLOT, 150));
        assert!(!store.is_drawable(TOP_SLOT, 200));
    }

    #[test]
    fn test_drawable_skips_unsupported_types() {
        let mut store = ComplicationDataStore::new(standard_slots());
        store.update(
            BACKGROUND_SLOT,
            ComplicationData::new(ComplicationContent::LargeImage {
                image: ImageRef::pending("bg"),
                tap_action: None,
            }),
        );
        store.update(BOTTOM_SLOT, ComplicationData::new(ComplicationContent::LargeImage {
            image: ImageRef::pending("bg"),
            tap_action: None,
        }));
        assert!(store.drawable(BACKGROUND_SLOT, 0).is_some());
        assert!(store.is_drawable(BOTTOM_SLOT, 0));
        assert!(store.drawable(BOTTOM_SLOT, 0).is_none());
    }
}
