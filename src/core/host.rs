//! Outbound calls into the embedding host

use line_watchface_types::{ActionError, WatchFaceAction};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the watch face needs from the platform it runs on.
///
/// Every method may be called from the engine's thread or, for
/// `request_redraw`, from the ticker task.
pub trait WatchFaceHost: Send + Sync {
    /// Schedule a draw soon. The engine coalesces these.
    fn request_redraw(&self);

    /// Perform a complication's tap action or a permission request
    fn invoke_action(&self, action: &WatchFaceAction) -> Result<(), ActionError>;

    fn register_time_zone_listener(&self);

    fn unregister_time_zone_listener(&self);

    /// Locale default used when the time format preference is `System`
    fn uses_24_hour_format(&self) -> bool;
}

/// Collapses bursts of redraw requests into one host call per frame.
///
/// The flag is set by the first request and cleared when a draw starts, so
/// requests made while one is already pending never reach the host.
#[derive(Clone)]
pub struct RedrawRequester {
    pending: Arc<AtomicBool>,
    host: Arc<dyn WatchFaceHost>,
}

impl RedrawRequester {
    pub fn new(host: Arc<dyn WatchFaceHost>) -> Self {
        Self {
            pending: Arc::new(AtomicBool::new(false)),
            host,
        }
    }

    pub fn request(&self) {
        if !self.pending.swap(true, Ordering::AcqRel) {
            self.host.request_redraw();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Called as a frame begins; later requests schedule another frame
    pub(crate) fn begin_frame(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

/// Host without a platform behind it: actions are logged, never performed
#[derive(Debug, Default)]
pub struct HeadlessHost {
    use_24_hour: bool,
    redraws: AtomicUsize,
    actions: Mutex<Vec<WatchFaceAction>>,
    listener_registered: AtomicBool,
}

impl HeadlessHost {
    pub fn new(use_24_hour: bool) -> Self {
        Self {
            use_24_hour,
            ..Default::default()
        }
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws.load(Ordering::Relaxed)
    }

    /// Actions received so far, oldest first
    pub fn actions(&self) -> Vec<WatchFaceAction> {
        self.actions
            .lock()
            .map(|actions| actions.clone())
            .unwrap_or_default()
    }

    pub fn listener_registered(&self) -> bool {
        self.listener_registered.load(Ordering::Relaxed)
    }
}

impl WatchFaceHost for HeadlessHost {
    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::Relaxed);
    }

    fn invoke_action(&self, action: &WatchFaceAction) -> Result<(), ActionError> {
        info!("Action requested: {:?}", action);
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action.clone());
        }
        Ok(())
    }

    fn register_time_zone_listener(&self) {
        debug!("Time zone listener registered");
        self.listener_registered.store(true, Ordering::Relaxed);
    }

    fn unregister_time_zone_listener(&self) {
        debug!("Time zone listener unregistered");
        self.listener_registered.store(false, Ordering::Relaxed);
    }

    fn uses_24_hour_format(&self) -> bool {
        self.use_24_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redraw_requests_coalesce_until_frame() {
        let host = Arc::new(HeadlessHost::new(true));
        let redraw = RedrawRequester::new(host.clone());

        redraw.request();
        redraw.request();
        redraw.request();
        assert_eq!(host.redraw_count(), 1);
        assert!(redraw.is_pending());

        redraw.begin_frame();
        redraw.request();
        assert_eq!(host.redraw_count(), 2);
    }

    #[test]
    fn test_clones_share_pending_flag() {
        let host = Arc::new(HeadlessHost::new(true));
        let redraw = RedrawRequester::new(host.clone());
        let other = redraw.clone();

        redraw.request();
        other.request();
        assert_eq!(host.redraw_count(), 1);
    }
}
