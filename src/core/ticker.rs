//! Tokio-backed frame ticker

use chrono::Utc;
use line_watchface_core::{delay_until_next_tick, Ticker};
use log::{debug, trace};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::host::RedrawRequester;

/// Requests a redraw on every wall-clock multiple of the interval.
///
/// Aligning to the wall clock keeps the second sweep advancing in even
/// steps regardless of how long each frame took.
pub struct TokioTicker {
    runtime: Handle,
    redraw: RedrawRequester,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    pub fn new(runtime: Handle, redraw: RedrawRequester) -> Self {
        Self {
            runtime,
            redraw,
            task: None,
        }
    }
}

impl Ticker for TokioTicker {
    fn start(&mut self, interval: Duration) {
        if self.is_running() {
            return;
        }
        let interval_ms = interval.as_millis().max(1) as u64;
        let redraw = self.redraw.clone();
        debug!("Starting frame ticker at {}ms", interval_ms);

        self.task = Some(self.runtime.spawn(async move {
            loop {
                let delay = delay_until_next_tick(Utc::now().timestamp_millis(), interval_ms);
                tokio::time::sleep(delay).await;
                trace!("Frame tick");
                redraw.request();
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Frame ticker stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::HeadlessHost;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_ticker_requests_redraws_until_stopped() {
        let host = Arc::new(HeadlessHost::new(true));
        let redraw = RedrawRequester::new(host.clone());
        let mut ticker = TokioTicker::new(Handle::current(), redraw.clone());

        ticker.start(Duration::from_millis(5));
        assert!(ticker.is_running());
        // Starting twice keeps the one task
        ticker.start(Duration::from_millis(5));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(host.redraw_count() >= 1);

        ticker.stop();
        assert!(!ticker.is_running());
        ticker.stop();

        // Nothing fires after stop, even with the pending flag cleared
        redraw.begin_frame();
        let before = host.redraw_count();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(host.redraw_count(), before);
    }
}
