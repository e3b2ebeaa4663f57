//! Background redraw tick.
//!
//! Repaints the widget region on a fixed period from a worker thread. The
//! thread checks a stop flag around every sleep so teardown never waits more
//! than one period, and the handle joins on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::Shared;

/// Fixed redraw period.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

pub(crate) struct Ticker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub(crate) fn spawn(shared: Arc<Shared>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            while flag.load(Ordering::Relaxed) {
                thread::sleep(TICK_INTERVAL);
                if !flag.load(Ordering::Relaxed) {
                    break;
                }
                // The tick has no caller to report to; a closed stream just
                // stops producing output until the console is torn down.
                let _ = shared.repaint();
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    pub(crate) fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
