//! Background task that expires idle visitor sessions (and, when attached,
//! idle ledger logins).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use super::registry::VisitorRegistry;
use crate::ledger::BalanceLedger;

/// Periodic sweeper for a `VisitorRegistry`.
///
/// Runs independently of request traffic so "online now" decays even when
/// nobody is browsing.
#[derive(Debug, Clone)]
pub struct SessionSweeper {
    pub interval: Duration,
    ledger: Option<Arc<BalanceLedger>>,
}

impl SessionSweeper {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ledger: None,
        }
    }

    /// Also expire idle logins of `ledger` on every tick.
    pub fn with_ledger(mut self, ledger: Arc<BalanceLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Sweeper using the registry's configured interval.
    pub fn for_registry(registry: &VisitorRegistry) -> Self {
        Self::new(registry.config().sweep_interval)
    }

    /// Spawn the sweep loop on the current tokio runtime.
    pub fn spawn(&self, registry: Arc<VisitorRegistry>) -> SessionSweeperHandle {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let period = self.interval;
        let ledger = self.ledger.clone();

        let join = tokio::spawn(async move {
            info!(interval_secs = period.as_secs_f64(), "session sweeper started");

            // First sweep one full period after start.
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = signal.notified() => {
                        info!("session sweeper received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let removed = registry.sweep_expired();
                        if removed > 0 {
                            let snap = registry.snapshot();
                            info!(
                                removed,
                                total_visits = snap.total_visits,
                                unique_visitors = snap.unique_visitors,
                                online_now = snap.online_now,
                                "expired idle sessions"
                            );
                        }
                        if let Some(ledger) = &ledger {
                            let logins = ledger.expire_sessions();
                            if logins > 0 {
                                info!(removed = logins, "expired idle logins");
                            }
                        }
                    }
                }
            }
        });

        SessionSweeperHandle { shutdown, join }
    }
}

/// Handle for a running sweeper (shutdown hook).
#[derive(Debug)]
pub struct SessionSweeperHandle {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

impl SessionSweeperHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal the loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        // `notify_one` stores a permit, so the signal is not lost if the loop
        // is mid-sweep.
        self.shutdown.notify_one();
        if let Err(e) = self.join.await {
            warn!("session sweeper task ended abnormally: {e}");
        }
    }
}
