//! Entitlement cache and the ensure-valid gate.
//!
//! A positive check is trusted for the TTL without any I/O. Anything else
//! refreshes against the subscribe endpoint. Refresh failures fail open:
//! an entitled client stays entitled, but its timestamp is left alone so
//! the next call tries again right away.

use crate::client::http::GatewayClient;
use crate::clock::Clock;
use crate::entitlement::state::{is_entitled_response, EntitlementState};
use crate::protocol::endpoints;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

/// Cached entitlement state for one client.
///
/// Concurrent callers that both see a stale cache both refresh; the last
/// write wins.
pub struct EntitlementCache {
    gateway: Arc<GatewayClient>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Mutex<EntitlementState>,
}

impl EntitlementCache {
    /// Create an empty cache.
    pub fn new(gateway: Arc<GatewayClient>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            gateway,
            clock,
            ttl,
            state: Mutex::new(EntitlementState::default()),
        }
    }

    /// Return the cached answer if fresh, otherwise refresh.
    pub async fn ensure_valid(&self) -> bool {
        let now = self.clock.now_millis();
        if self.lock().is_fresh(now, self.ttl_millis()) {
            trace!("entitlement cache hit");
            return true;
        }
        self.refresh_at(now).await
    }

    /// Check entitlement against the gateway regardless of the cache.
    pub async fn refresh(&self) -> bool {
        let now = self.clock.now_millis();
        self.refresh_at(now).await
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> EntitlementState {
        self.lock().clone()
    }

    async fn refresh_at(&self, now: i64) -> bool {
        match self.gateway.get(endpoints::SUBSCRIBE).await {
            Ok(body) => {
                let entitled = is_entitled_response(&body);
                let mut state = self.lock();
                state.is_entitled = entitled;
                state.last_checked_at_millis = now;
                state.last_response = Some(body);
                debug!(entitled, "entitlement refreshed");
                entitled
            }
            Err(e) => {
                let entitled = self.lock().is_entitled;
                debug!(error = %e, entitled, "entitlement check failed, using cached state");
                entitled
            }
        }
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }

    // The guard is never held across an await.
    fn lock(&self) -> MutexGuard<'_, EntitlementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
