use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

use cryptotasks_core::SessionKey;

/// Session expiry and sweep cadence.
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// A session idle for at least this long is expired.
    pub session_ttl: TimeDelta,
    /// How often the background sweeper runs.
    pub sweep_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            session_ttl: TimeDelta::minutes(15),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Point-in-time copy of the visit counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisitorSnapshot {
    pub total_visits: u64,
    pub unique_visitors: u64,
    /// Live-session count as of the last track/sweep.
    pub online_now: usize,
    /// Sessions currently held.
    pub live_sessions: usize,
}

#[derive(Debug, Default)]
struct RegistryState {
    total_visits: u64,
    unique_visitors: u64,
    online_now: usize,
    sessions: HashMap<SessionKey, DateTime<Utc>>,
    seen: HashSet<SessionKey>,
}

impl RegistryState {
    /// Drop every session idle for `ttl` or longer and refresh `online_now`.
    fn evict_idle(&mut self, now: DateTime<Utc>, ttl: TimeDelta) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, last_seen| now - *last_seen < ttl);
        self.online_now = self.sessions.len();
        before - self.sessions.len()
    }

    fn snapshot(&self) -> VisitorSnapshot {
        VisitorSnapshot {
            total_visits: self.total_visits,
            unique_visitors: self.unique_visitors,
            online_now: self.online_now,
            live_sessions: self.sessions.len(),
        }
    }
}

/// Process-wide visitor tracker.
///
/// All state sits behind one mutex; every operation takes it once and does
/// O(live sessions) work at most.
#[derive(Debug, Default)]
pub struct VisitorRegistry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
}

impl VisitorRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        // Counters and maps are updated in place per call; a panic elsewhere
        // cannot leave them half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Account one page visit from `key`.
    pub fn track_visit(&self, key: SessionKey) {
        self.track_visit_at(key, Utc::now());
    }

    pub fn track_visit_at(&self, key: SessionKey, now: DateTime<Utc>) {
        let mut state = self.lock();

        state.total_visits += 1;
        if state.seen.insert(key.clone()) {
            state.unique_visitors += 1;
        }
        state.sessions.insert(key, now);
        state.evict_idle(now, self.config.session_ttl);

        debug!(
            total_visits = state.total_visits,
            unique_visitors = state.unique_visitors,
            online_now = state.online_now,
            "visit tracked"
        );
    }

    /// Expire idle sessions; returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        self.lock().evict_idle(now, self.config.session_ttl)
    }

    pub fn snapshot(&self) -> VisitorSnapshot {
        self.lock().snapshot()
    }
}
