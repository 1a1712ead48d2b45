//! Single-slot debounce timer.
//!
//! Scheduling while a timer is pending replaces it; two timers never run at
//! once for the same synchronizer.

use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

use crate::types::SwapEvent;

#[derive(Default)]
pub struct DebounceTimer {
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    /// Arm the timer. Any previously pending timer is cancelled first.
    ///
    /// When the delay elapses, a [`SwapEvent::RetryElapsed`] carrying
    /// `generation` is sent on `events`; the receiver decides whether it is
    /// still current.
    pub fn schedule(&mut self, delay: Duration, generation: u64, events: Sender<SwapEvent>) {
        self.cancel();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(SwapEvent::RetryElapsed { generation }).await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
