//! Inbound events and the thread-safe handle that posts them

use chrono_tz::Tz;
use crossbeam::channel::Sender;
use line_watchface_render::NotificationCounts;
use line_watchface_types::{ComplicationData, DeviceCapabilities, Point, Preferences, SlotId};
use log::debug;

use super::host::RedrawRequester;

/// Everything the host can tell the engine. Applied only between frames.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    ComplicationUpdated { slot: SlotId, data: ComplicationData },
    /// `timestamp_millis` is when the touch happened, Unix epoch milliseconds
    Tap { point: Point, timestamp_millis: i64 },
    AmbientModeChanged(bool),
    VisibilityChanged(bool),
    CapabilitiesChanged(DeviceCapabilities),
    SurfaceResized { width: u32, height: u32 },
    PreferencesChanged(Preferences),
    TimeZoneChanged(Tz),
    NotificationCountsChanged(NotificationCounts),
}

/// Cloneable sender usable from any thread
#[derive(Clone)]
pub struct EngineHandle {
    sender: Sender<EngineEvent>,
    redraw: RedrawRequester,
}

impl EngineHandle {
    pub(crate) fn new(sender: Sender<EngineEvent>, redraw: RedrawRequester) -> Self {
        Self { sender, redraw }
    }

    /// Queue an event and ask for a frame to apply it
    pub fn post(&self, event: EngineEvent) {
        if let Err(e) = self.sender.send(event) {
            debug!("Engine gone, dropping {:?}", e.into_inner());
            return;
        }
        self.redraw.request();
    }

    pub fn update_complication(&self, slot: SlotId, data: ComplicationData) {
        self.post(EngineEvent::ComplicationUpdated { slot, data });
    }

    pub fn on_tap(&self, x: f64, y: f64, timestamp_millis: i64) {
        self.post(EngineEvent::Tap {
            point: Point::new(x, y),
            timestamp_millis,
        });
    }

    pub fn on_ambient_mode_changed(&self, ambient: bool) {
        self.post(EngineEvent::AmbientModeChanged(ambient));
    }

    pub fn on_visibility_changed(&self, visible: bool) {
        self.post(EngineEvent::VisibilityChanged(visible));
    }

    pub fn on_capabilities_changed(&self, capabilities: DeviceCapabilities) {
        self.post(EngineEvent::CapabilitiesChanged(capabilities));
    }

    pub fn on_surface_resized(&self, width: u32, height: u32) {
        self.post(EngineEvent::SurfaceResized { width, height });
    }

    pub fn on_preferences_changed(&self, preferences: Preferences) {
        self.post(EngineEvent::PreferencesChanged(preferences));
    }

    pub fn on_time_zone_changed(&self, tz: Tz) {
        self.post(EngineEvent::TimeZoneChanged(tz));
    }

    pub fn on_notification_counts_changed(&self, unread: u32, total: u32) {
        self.post(EngineEvent::NotificationCountsChanged(NotificationCounts {
            unread,
            total,
        }));
    }
}
