//! Background entitlement heartbeat.
//!
//! A spawned tokio task re-checks entitlement once per period. The first
//! tick fires one period after start. Results and failures are discarded.

use crate::entitlement::cache::EntitlementCache;
use crate::SyntekError;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Owned handle to the heartbeat task.
///
/// Stopped by [`Heartbeat::stop`] or on drop, whichever comes first.
#[derive(Debug)]
pub struct Heartbeat {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Heartbeat {
    /// Spawn the heartbeat on the current tokio runtime.
    ///
    /// # Errors
    /// `ConfigError` when called outside a tokio runtime or with a zero period.
    pub fn start(cache: Arc<EntitlementCache>, period: Duration) -> Result<Self, SyntekError> {
        if period.is_zero() {
            return Err(SyntekError::ConfigError(
                "heartbeat period cannot be zero".to_string(),
            ));
        }
        let runtime = Handle::try_current().map_err(|e| {
            SyntekError::ConfigError(format!("Heartbeat requires a tokio runtime: {}", e))
        })?;

        let handle = runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let entitled = cache.ensure_valid().await;
                trace!(entitled, "heartbeat tick");
            }
        });
        debug!(period_secs = period.as_secs(), "entitlement heartbeat started");

        Ok(Self {
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Cancel the task. Returns `false` if it was already stopped.
    pub fn stop(&self) -> bool {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(handle) => {
                handle.abort();
                debug!("entitlement heartbeat stopped");
                true
            }
            None => false,
        }
    }

    /// Whether the task is still scheduled.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}
