// SPDX-License-Identifier: Apache-2.0

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default settle time for search-as-you-type recomputation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Runs only the most recent submission after a quiet period.
///
/// Each `submit` aborts whatever was previously scheduled, so a burst of
/// rapid inputs results in exactly one executed task and superseded work
/// never applies its result.
pub struct Debouncer {
    delay: Duration,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: Mutex::new(None),
        }
    }

    pub fn submit<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        if let Ok(mut slot) = self.current.lock() {
            if let Some(previous) = slot.take() {
                previous.abort();
            }
            *slot = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                work.await;
            }));
        }
    }

    /// Abort the pending submission, if any.
    pub fn cancel(&self) {
        if let Ok(mut slot) = self.current.lock() {
            if let Some(previous) = slot.take() {
                previous.abort();
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
