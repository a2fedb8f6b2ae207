//! Frame scheduling and the ambient/visibility state machine
//!
//! The scheduler owns the periodic ticker and decides when it runs. It does
//! not touch the host itself; every transition returns [`SchedulerEffects`]
//! for the engine to carry out.

use crate::constants::{FRAME_INTERVAL, FRAME_INTERVAL_MS};
use log::{debug, info};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    VisibleInteractive,
    VisibleAmbient,
}

/// Periodic redraw source. Implementations fire their own callback.
///
/// Starting a running ticker and stopping a stopped one are no-ops.
pub trait Ticker: Send {
    fn start(&mut self, interval: Duration);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Ticker driven by hand, for tests and offline rendering
#[derive(Debug, Default)]
pub struct ManualTicker {
    running: bool,
    interval: Option<Duration>,
    starts: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// How many times the ticker actually went from stopped to running
    pub fn start_count(&self) -> usize {
        self.starts
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, interval: Duration) {
        if self.running {
            return;
        }
        self.running = true;
        self.interval = Some(interval);
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Work the engine must do after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerEffects {
    pub register_time_zone_listener: bool,
    pub unregister_time_zone_listener: bool,
    /// Re-resolve the render state
    pub restyle: bool,
    pub redraw: bool,
}

impl SchedulerEffects {
    pub fn is_noop(&self) -> bool {
        *self == SchedulerEffects::default()
    }
}

pub struct FrameScheduler<T: Ticker> {
    ticker: T,
    visible: bool,
    ambient: bool,
    listener_registered: bool,
}

impl<T: Ticker> FrameScheduler<T> {
    /// Starts hidden and interactive with the ticker stopped
    pub fn new(ticker: T) -> Self {
        Self {
            ticker,
            visible: false,
            ambient: false,
            listener_registered: false,
        }
    }

    pub fn state(&self) -> VisibilityState {
        match (self.visible, self.ambient) {
            (false, _) => VisibilityState::Hidden,
            (true, false) => VisibilityState::VisibleInteractive,
            (true, true) => VisibilityState::VisibleAmbient,
        }
    }

    pub fn is_ambient(&self) -> bool {
        self.ambient
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// The ticker runs only while visible and interactive
    pub fn should_tick(&self) -> bool {
        self.state() == VisibilityState::VisibleInteractive
    }

    pub fn on_visibility_changed(&mut self, visible: bool) -> SchedulerEffects {
        let mut effects = SchedulerEffects::default();
        if visible == self.visible {
            debug!("Visibility already {}, ignoring", visible);
            return effects;
        }
        let from = self.state();
        self.visible = visible;

        if visible {
            if !self.listener_registered {
                self.listener_registered = true;
                effects.register_time_zone_listener = true;
            }
            effects.restyle = true;
            effects.redraw = true;
        } else if self.listener_registered {
            self.listener_registered = false;
            effects.unregister_time_zone_listener = true;
        }
        self.sync_ticker();

        info!("Watch face {:?} -> {:?}", from, self.state());
        effects
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) -> SchedulerEffects {
        let mut effects = SchedulerEffects::default();
        if ambient == self.ambient {
            debug!("Ambient already {}, ignoring", ambient);
            return effects;
        }
        let from = self.state();
        self.ambient = ambient;
        effects.restyle = true;
        // A hidden face only records the flag
        effects.redraw = self.visible;
        self.sync_ticker();

        info!("Watch face {:?} -> {:?}", from, self.state());
        effects
    }

    /// Stop ticking and drop the listener, as when the face is torn down
    pub fn shutdown(&mut self) -> SchedulerEffects {
        let effects = self.on_visibility_changed(false);
        self.ticker.stop();
        effects
    }

    fn sync_ticker(&mut self) {
        if self.should_tick() {
            self.ticker.start(FRAME_INTERVAL);
        } else {
            self.ticker.stop();
        }
    }
}

/// Delay to the next wall-clock multiple of `interval_ms`
pub fn delay_until_next_tick(now_millis: i64, interval_ms: u64) -> Duration {
    let interval = interval_ms.max(1) as i64;
    let remainder = now_millis.rem_euclid(interval);
    Duration::from_millis((interval - remainder) as u64)
}

/// [`delay_until_next_tick`] at the standard frame interval
pub fn next_frame_delay(now_millis: i64) -> Duration {
    delay_until_next_tick(now_millis, FRAME_INTERVAL_MS)
}
