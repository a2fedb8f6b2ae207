//! The watch face engine: owns all state and applies events between frames

use cairo::Context;
use chrono_tz::Tz;
use crossbeam::channel::{unbounded, Receiver, Sender};
use line_watchface_core::{
    dispatch, resolve, standard_slots, ComplicationDataStore, FrameScheduler, LayoutEngine,
    RenderState, SchedulerEffects, TapRegions, Ticker,
};
use line_watchface_render::{clear_pango_caches, render_frame, FrameInput, NotificationCounts};
use line_watchface_types::{ComplicationData, DeviceCapabilities, Point, Preferences, SlotId};
use log::{debug, info, trace};
use std::sync::Arc;

use super::events::{EngineEvent, EngineHandle};
use super::host::{RedrawRequester, WatchFaceHost};
use crate::config::AppConfig;

/// Rendering and state engine for one watch face instance.
///
/// Drawing takes `&mut self`, so events posted through an [`EngineHandle`]
/// can only be applied between frames.
pub struct WatchFaceEngine<H: WatchFaceHost + 'static, T: Ticker> {
    host: Arc<H>,
    redraw: RedrawRequester,
    sender: Sender<EngineEvent>,
    events: Receiver<EngineEvent>,
    scheduler: FrameScheduler<T>,
    store: ComplicationDataStore,
    preferences: Preferences,
    capabilities: DeviceCapabilities,
    width: u32,
    height: u32,
    layout: LayoutEngine,
    state: RenderState,
    tz: Tz,
    notifications: NotificationCounts,
    /// Regions of the last completed frame
    regions: TapRegions,
    /// Render time of the last completed frame
    frame_millis: i64,
    /// Set while a draw applies queued events; the frame covers them
    in_frame: bool,
}

impl<H: WatchFaceHost + 'static, T: Ticker> WatchFaceEngine<H, T> {
    /// `redraw` must wrap the same host; the ticker usually shares it too
    pub fn new(host: Arc<H>, redraw: RedrawRequester, ticker: T, config: &AppConfig) -> Self {
        let (sender, events) = unbounded();
        let width = config.surface.width;
        let height = config.surface.height;
        let capabilities = config.capabilities();
        let scheduler = FrameScheduler::new(ticker);
        let state = resolve(&config.preferences, &capabilities, scheduler.is_ambient());

        info!(
            "Watch face engine created: {}x{} {}, {:?}",
            width,
            height,
            if capabilities.is_round { "round" } else { "square" },
            config.preferences.style_mode
        );

        Self {
            host,
            redraw,
            sender,
            events,
            scheduler,
            store: ComplicationDataStore::new(standard_slots()),
            preferences: config.preferences.clone(),
            capabilities,
            width,
            height,
            layout: LayoutEngine::new(&capabilities, width, height),
            state,
            tz: config.time_zone,
            notifications: NotificationCounts::default(),
            regions: TapRegions::new(),
            frame_millis: 0,
            in_frame: false,
        }
    }

    /// Handle for posting events from other threads
    pub fn handle(&self) -> EngineHandle {
        EngineHandle::new(self.sender.clone(), self.redraw.clone())
    }

    pub fn render_state(&self) -> &RenderState {
        &self.state
    }

    pub fn store(&self) -> &ComplicationDataStore {
        &self.store
    }

    pub fn scheduler(&self) -> &FrameScheduler<T> {
        &self.scheduler
    }

    /// Tap regions of the last completed frame
    pub fn tap_regions(&self) -> &TapRegions {
        &self.regions
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Apply every queued event; returns how many were applied
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
            applied += 1;
        }
        if applied > 0 {
            trace!("Applied {} queued events", applied);
        }
        applied
    }

    /// Draw one frame for `now_millis` and publish its tap regions
    pub fn draw(&mut self, cr: &Context, now_millis: i64) -> &TapRegions {
        self.redraw.begin_frame();
        self.in_frame = true;
        self.pump();
        self.in_frame = false;

        let use_24_hour = self
            .preferences
            .time_format
            .is_24_hour(self.host.uses_24_hour_format());
        let input = FrameInput {
            state: &self.state,
            layout: &self.layout,
            store: &self.store,
            render_millis: now_millis,
            tz: self.tz,
            use_24_hour,
            notifications: self.notifications,
        };
        self.regions = render_frame(cr, &input);
        self.frame_millis = now_millis;
        &self.regions
    }

    pub fn update_complication(&mut self, slot: SlotId, data: ComplicationData) {
        self.apply(EngineEvent::ComplicationUpdated { slot, data });
    }

    pub fn on_tap(&mut self, x: f64, y: f64, timestamp_millis: i64) {
        self.apply(EngineEvent::Tap {
            point: Point::new(x, y),
            timestamp_millis,
        });
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) {
        self.apply(EngineEvent::AmbientModeChanged(ambient));
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        self.apply(EngineEvent::VisibilityChanged(visible));
    }

    pub fn on_capabilities_changed(&mut self, capabilities: DeviceCapabilities) {
        self.apply(EngineEvent::CapabilitiesChanged(capabilities));
    }

    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        self.apply(EngineEvent::SurfaceResized { width, height });
    }

    pub fn on_preferences_changed(&mut self, preferences: Preferences) {
        self.apply(EngineEvent::PreferencesChanged(preferences));
    }

    pub fn on_time_zone_changed(&mut self, tz: Tz) {
        self.apply(EngineEvent::TimeZoneChanged(tz));
    }

    pub fn on_notification_counts_changed(&mut self, unread: u32, total: u32) {
        self.apply(EngineEvent::NotificationCountsChanged(NotificationCounts {
            unread,
            total,
        }));
    }

    /// Stop the ticker and release the time zone listener
    pub fn shutdown(&mut self) {
        let effects = self.scheduler.shutdown();
        self.apply_effects(effects);
        info!("Watch face engine shut down");
    }

    fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::ComplicationUpdated { slot, data } => {
                debug!("Slot {} updated with {:?}", slot, data.content_type());
                if self.store.update(slot, data) {
                    self.request_redraw();
                }
            }
            EngineEvent::Tap {
                point,
                timestamp_millis,
            } => self.handle_tap(point, timestamp_millis),
            EngineEvent::AmbientModeChanged(ambient) => {
                let effects = self.scheduler.on_ambient_mode_changed(ambient);
                self.apply_effects(effects);
            }
            EngineEvent::VisibilityChanged(visible) => {
                let effects = self.scheduler.on_visibility_changed(visible);
                self.apply_effects(effects);
            }
            EngineEvent::CapabilitiesChanged(capabilities) => {
                self.capabilities = capabilities.with_surface(self.width, self.height);
                self.relayout();
            }
            EngineEvent::SurfaceResized { width, height } => {
                if (width, height) == (self.width, self.height) {
                    return;
                }
                info!("Surface resized to {}x{}", width, height);
                self.width = width;
                self.height = height;
                self.capabilities = self.capabilities.with_surface(width, height);
                clear_pango_caches();
                self.relayout();
            }
            EngineEvent::PreferencesChanged(preferences) => {
                self.preferences = preferences;
                self.restyle();
                self.request_redraw();
            }
            EngineEvent::TimeZoneChanged(tz) => {
                debug!("Time zone changed to {}", tz);
                self.tz = tz;
                self.request_redraw();
            }
            EngineEvent::NotificationCountsChanged(counts) => {
                self.notifications = counts;
                self.request_redraw();
            }
        }
    }

    fn handle_tap(&self, point: Point, timestamp_millis: i64) {
        trace!(
            "Tap at ({}, {}) at {}, {}ms after the frame it hit-tests against",
            point.x,
            point.y,
            timestamp_millis,
            timestamp_millis - self.frame_millis
        );
        let Some(action) = dispatch(&point, &self.regions, &self.store) else {
            trace!("Tap at ({}, {}) hit nothing", point.x, point.y);
            return;
        };
        debug!("Tap at ({}, {}) -> {:?}", point.x, point.y, action);
        if let Err(e) = self.host.invoke_action(&action) {
            debug!("Action failed: {}", e);
        }
    }

    fn apply_effects(&mut self, effects: SchedulerEffects) {
        if effects.register_time_zone_listener {
            self.host.register_time_zone_listener();
        }
        if effects.unregister_time_zone_listener {
            self.host.unregister_time_zone_listener();
        }
        if effects.restyle {
            self.restyle();
        }
        if effects.redraw {
            self.request_redraw();
        }
    }

    fn request_redraw(&self) {
        if !self.in_frame {
            self.redraw.request();
        }
    }

    fn restyle(&mut self) {
        self.state = resolve(&self.preferences, &self.capabilities, self.scheduler.is_ambient());
    }

    fn relayout(&mut self) {
        self.layout = LayoutEngine::new(&self.capabilities, self.width, self.height);
        self.restyle();
        self.request_redraw();
    }
}
