//! Tap regions and dispatch
//!
//! A frame produces a fresh [`TapRegions`] value which replaces the previous
//! one only after the frame completes. Dispatch never sees a half-built set.

use crate::data_store::ComplicationDataStore;
use line_watchface_types::{ContentType, Point, SlotId, TapShape, WatchFaceAction};
use log::debug;

/// Regions in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TapRegions {
    regions: Vec<(SlotId, TapShape)>,
}

impl TapRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, slot: SlotId, shape: TapShape) {
        self.regions.push((slot, shape));
    }

    pub fn get(&self, slot: SlotId) -> Option<&TapShape> {
        self.regions
            .iter()
            .find(|(id, _)| *id == slot)
            .map(|(_, shape)| shape)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SlotId, TapShape)> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// First registered slot whose shape contains `point`
    pub fn hit(&self, point: &Point) -> Option<SlotId> {
        self.regions
            .iter()
            .find(|(_, shape)| shape.contains(point))
            .map(|(id, _)| *id)
    }
}

/// Resolve a tap to the action the host should perform, if any
pub fn dispatch(
    point: &Point,
    regions: &TapRegions,
    store: &ComplicationDataStore,
) -> Option<WatchFaceAction> {
    let slot = regions.hit(point)?;
    let data = store.get(slot)?;

    if let Some(action) = data.content.tap_action() {
        return Some(WatchFaceAction::Tap {
            slot,
            action: action.clone(),
        });
    }
    if data.content_type() == ContentType::NoPermission {
        return Some(WatchFaceAction::RequestPermission { slot });
    }
    debug!("Tap on slot {} has no action", slot);
    None
}
